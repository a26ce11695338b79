//! Fuzzy rules
//!
//! A [`FuzzyRule`] pairs antecedents with conclusions. Inputs are bound
//! positionally to the antecedents; matching measures how far each input
//! satisfies its antecedent and combines those degrees into one, and firing
//! hands that degree to a [`RuleExecutor`] for every conclusion.
//!
//! ```text
//! Idle --test_rule_matching--> Matched --fire--> Fired
//!   ^                                              |
//!   +------------- set_inputs / clear_inputs ------+
//! ```

mod executor;

pub use executor::{RuleExecution, RuleExecutor};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::FuzzyContext;
use crate::error::{FuzzyError, FuzzyResult};
use crate::operators::AntecedentCombineOperator;
use crate::value::{FuzzyValue, FuzzyValueVector};

/// How an input is scored against its antecedent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Height of the intersection of antecedent and input
    #[default]
    Maximum,
    /// The context's similarity operator
    Similarity,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Maximum => "maximum",
            MatchMethod::Similarity => "similarity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "maximum" | "max" | "maximum_of_intersection" => Some(MatchMethod::Maximum),
            "similarity" => Some(MatchMethod::Similarity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleState {
    #[default]
    Idle,
    Matched,
    Fired,
}

/// Outcome of matching a rule against its inputs
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    /// One degree per antecedent/input pair, in antecedent order
    pub degrees: Vec<f64>,
    /// The degrees combined into one
    pub combined: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FuzzyRule {
    name: Option<String>,
    antecedents: Vec<FuzzyValue>,
    conclusions: Vec<FuzzyValue>,
    inputs: Vec<FuzzyValue>,
    combine: Option<AntecedentCombineOperator>,
    executor: Option<RuleExecutor>,
    state: RuleState,
    last_match: Option<RuleMatch>,
}

impl FuzzyRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn add_antecedent(&mut self, antecedent: FuzzyValue) {
        self.antecedents.push(antecedent);
        self.reset();
    }

    pub fn add_conclusion(&mut self, conclusion: FuzzyValue) {
        self.conclusions.push(conclusion);
    }

    pub fn add_input(&mut self, input: FuzzyValue) {
        self.inputs.push(input);
        self.reset();
    }

    /// Replace all inputs; the rule returns to `Idle`
    pub fn set_inputs(&mut self, inputs: Vec<FuzzyValue>) {
        self.inputs = inputs;
        self.reset();
    }

    pub fn clear_inputs(&mut self) {
        self.inputs.clear();
        self.reset();
    }

    pub fn set_conclusions(&mut self, conclusions: Vec<FuzzyValue>) {
        self.conclusions = conclusions;
    }

    pub fn clear_conclusions(&mut self) {
        self.conclusions.clear();
    }

    /// Override the context's antecedent combination for this rule
    pub fn set_combine_operator(&mut self, combine: AntecedentCombineOperator) {
        self.combine = Some(combine);
    }

    /// Override the context's executor for this rule
    pub fn set_executor(&mut self, executor: RuleExecutor) {
        self.executor = Some(executor);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn antecedents(&self) -> &[FuzzyValue] {
        &self.antecedents
    }

    pub fn conclusions(&self) -> &[FuzzyValue] {
        &self.conclusions
    }

    pub fn inputs(&self) -> &[FuzzyValue] {
        &self.inputs
    }

    pub fn combine_operator(&self) -> Option<&AntecedentCombineOperator> {
        self.combine.as_ref()
    }

    pub fn executor(&self) -> Option<&RuleExecutor> {
        self.executor.as_ref()
    }

    pub fn state(&self) -> RuleState {
        self.state
    }

    /// The most recent match, cleared whenever inputs change
    pub fn last_match(&self) -> Option<&RuleMatch> {
        self.last_match.as_ref()
    }

    fn reset(&mut self) {
        self.state = RuleState::Idle;
        self.last_match = None;
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// Match the inputs against the antecedents without firing
    pub fn test_rule_matching(&mut self, ctx: &FuzzyContext) -> FuzzyResult<RuleMatch> {
        if !self.antecedents.is_empty() && self.inputs.is_empty() {
            return Err(FuzzyError::inputs_not_bound(self.display_name()));
        }
        if self.antecedents.len() != self.inputs.len() {
            return Err(FuzzyError::arity_mismatch(self.antecedents.len(), self.inputs.len()));
        }

        let mut degrees = Vec::with_capacity(self.antecedents.len());
        for (antecedent, input) in self.antecedents.iter().zip(&self.inputs) {
            let degree = match ctx.match_method {
                MatchMethod::Maximum => antecedent.maximum_of_intersection(input)?,
                MatchMethod::Similarity => antecedent.similarity(input, ctx)?,
            };
            degrees.push(degree);
        }
        let combined = self.combine.as_ref().unwrap_or(&ctx.combine).combine(&degrees);

        debug!(
            rule = self.display_name(),
            ?degrees,
            combined,
            method = ctx.match_method.as_str(),
            "matched rule"
        );
        let result = RuleMatch { degrees, combined };
        self.state = RuleState::Matched;
        self.last_match = Some(result.clone());
        Ok(result)
    }

    /// Fire with the rule's own executor, or the context's
    pub fn fire(&mut self, ctx: &FuzzyContext) -> FuzzyResult<FuzzyValueVector> {
        let executor = self.executor.clone().unwrap_or_else(|| ctx.executor.clone());
        self.fire_with(&executor, ctx)
    }

    /// Match, then apply `executor` to every conclusion in order.
    ///
    /// Conclusions are left untouched; any failure yields no output at all.
    pub fn fire_with(
        &mut self,
        executor: &RuleExecutor,
        ctx: &FuzzyContext,
    ) -> FuzzyResult<FuzzyValueVector> {
        let matched = self.test_rule_matching(ctx)?;
        let fired = self
            .conclusions
            .iter()
            .map(|conclusion| executor.execute(matched.combined, conclusion))
            .collect::<FuzzyResult<FuzzyValueVector>>()?;

        debug!(
            rule = self.display_name(),
            executor = executor.name(),
            degree = matched.combined,
            conclusions = fired.len(),
            "fired rule"
        );
        self.state = RuleState::Fired;
        Ok(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::shapes::{trapezoid, triangle};
    use crate::variable::FuzzyVariable;
    use std::sync::Arc;

    fn var(name: &str) -> Arc<FuzzyVariable> {
        let mut var = FuzzyVariable::new(name, 0.0, 100.0, "").unwrap();
        var.add_term("low", trapezoid(0.0, 0.0, 20.0, 50.0).unwrap()).unwrap();
        var.add_term("mid", triangle(25.0, 50.0, 75.0).unwrap()).unwrap();
        var.add_term("high", trapezoid(50.0, 80.0, 100.0, 100.0).unwrap()).unwrap();
        Arc::new(var)
    }

    fn term(var: &Arc<FuzzyVariable>, name: &str) -> FuzzyValue {
        FuzzyValue::from_term(var.clone(), name, &FuzzyContext::default()).unwrap()
    }

    fn reading(var: &Arc<FuzzyVariable>, x: f64) -> FuzzyValue {
        FuzzyValue::singleton(var.clone(), x, &FuzzyContext::default()).unwrap()
    }

    fn two_input_rule() -> (FuzzyRule, Arc<FuzzyVariable>, Arc<FuzzyVariable>) {
        let (a, b, out) = (var("a"), var("b"), var("out"));
        let mut rule = FuzzyRule::named("r1");
        rule.add_antecedent(term(&a, "mid"));
        rule.add_antecedent(term(&b, "high"));
        rule.add_conclusion(term(&out, "mid"));
        (rule, a, b)
    }

    #[test]
    fn test_state_machine() {
        let ctx = FuzzyContext::default();
        let (mut rule, a, b) = two_input_rule();
        assert_eq!(rule.state(), RuleState::Idle);

        rule.set_inputs(vec![reading(&a, 40.0), reading(&b, 65.0)]);
        let matched = rule.test_rule_matching(&ctx).unwrap();
        assert_eq!(rule.state(), RuleState::Matched);
        assert!((matched.degrees[0] - 0.6).abs() < 1e-12);
        assert!((matched.degrees[1] - 0.5).abs() < 1e-12);
        assert!((matched.combined - 0.5).abs() < 1e-12);

        let fired = rule.fire(&ctx).unwrap();
        assert_eq!(rule.state(), RuleState::Fired);
        assert_eq!(fired.len(), 1);
        assert!(rule.last_match().is_some());

        rule.clear_inputs();
        assert_eq!(rule.state(), RuleState::Idle);
        assert!(rule.last_match().is_none());
    }

    #[test]
    fn test_fire_leaves_conclusions_untouched() {
        let ctx = FuzzyContext::default();
        let (mut rule, a, b) = two_input_rule();
        let before = rule.conclusions()[0].set().clone();
        rule.set_inputs(vec![reading(&a, 40.0), reading(&b, 65.0)]);
        let fired = rule.fire(&ctx).unwrap();
        assert_eq!(rule.conclusions()[0].set(), &before);
        assert!((fired.get(0).unwrap().max_y() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_inputs_not_bound() {
        let ctx = FuzzyContext::default();
        let (mut rule, _, _) = two_input_rule();
        let err = rule.fire(&ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::InputsNotBound);
        assert_eq!(rule.state(), RuleState::Idle);
    }

    #[test]
    fn test_arity_mismatch() {
        let ctx = FuzzyContext::default();
        let (mut rule, a, _) = two_input_rule();
        rule.add_input(reading(&a, 40.0));
        let err = rule.test_rule_matching(&ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::ArityMismatch);
    }

    #[test]
    fn test_incompatible_input() {
        let ctx = FuzzyContext::default();
        let (mut rule, a, _) = two_input_rule();
        let narrow = Arc::new(FuzzyVariable::new("narrow", 0.0, 10.0, "").unwrap());
        rule.set_inputs(vec![reading(&a, 40.0), reading(&narrow, 5.0)]);
        let err = rule.fire(&ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::IncompatibleVariables);
    }

    #[test]
    fn test_no_antecedents_matches_fully() {
        let ctx = FuzzyContext::default();
        let out = var("out");
        let mut rule = FuzzyRule::new();
        rule.add_conclusion(term(&out, "mid"));
        let matched = rule.test_rule_matching(&ctx).unwrap();
        assert_eq!(matched.combined, 1.0);
        let fired = rule.fire(&ctx).unwrap();
        assert_eq!(fired.get(0).unwrap().max_y(), 1.0);
    }

    #[test]
    fn test_rule_overrides_context() {
        let ctx = FuzzyContext::default();
        let (mut rule, a, b) = two_input_rule();
        rule.set_combine_operator(AntecedentCombineOperator::Product);
        rule.set_executor(RuleExecutor::LarsenProductMaxMin);
        rule.set_inputs(vec![reading(&a, 40.0), reading(&b, 65.0)]);
        let fired = rule.fire(&ctx).unwrap();
        let out = fired.get(0).unwrap();
        // 0.6 * 0.5, applied by scaling
        assert!((out.max_y() - 0.3).abs() < 1e-12);
        assert!((out.membership(37.5) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_fire_with_tsukamoto_failure_yields_nothing() {
        let ctx = FuzzyContext::default();
        let (mut rule, a, b) = two_input_rule();
        rule.set_inputs(vec![reading(&a, 40.0), reading(&b, 65.0)]);
        let err = rule.fire_with(&RuleExecutor::Tsukamoto, &ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::NonMonotonicConclusion);
        assert_ne!(rule.state(), RuleState::Fired);
    }

    #[test]
    fn test_similarity_matching() {
        let ctx = FuzzyContext::default().with_match_method(MatchMethod::Similarity);
        let a = var("a");
        let mut rule = FuzzyRule::new();
        rule.add_antecedent(term(&a, "mid"));
        rule.set_inputs(vec![term(&a, "mid")]);
        let matched = rule.test_rule_matching(&ctx).unwrap();
        assert!((matched.combined - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_match_method_names() {
        assert_eq!(MatchMethod::from_str("MAX"), Some(MatchMethod::Maximum));
        assert_eq!(MatchMethod::Similarity.as_str(), "similarity");
        assert_eq!(MatchMethod::from_str("fuzzy"), None);
    }
}
