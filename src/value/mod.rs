//! Fuzzy values: a fuzzy set bound to a variable
//!
//! A [`FuzzyValue`] always covers exactly the universe of discourse of its
//! [`FuzzyVariable`]. Breakpoints outside the bounds are clipped when the
//! context confines values, and rejected otherwise. Binary operations demand
//! compatible variables and carry a combined linguistic label when both
//! operands have one.

pub mod vector;

pub use vector::FuzzyValueVector;

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::context::FuzzyContext;
use crate::error::{ErrorCode, FuzzyError, FuzzyResult};
use crate::operators::SimilarityOperator;
use crate::set::{
    validate_strict, DefuzzifyMethod, FuzzySet, Interval, IntervalVector, SetPoint, Strength,
};
use crate::shapes::singleton;
use crate::variable::FuzzyVariable;

#[derive(Debug, Clone)]
pub struct FuzzyValue {
    variable: Arc<FuzzyVariable>,
    set: FuzzySet,
    label: Option<String>,
}

impl FuzzyValue {
    /// Bind a set to a variable
    pub fn new(variable: Arc<FuzzyVariable>, set: FuzzySet, ctx: &FuzzyContext) -> FuzzyResult<Self> {
        Self::bind(variable, set, None, ctx)
    }

    /// Build from parallel coordinates; `x` must strictly increase
    pub fn from_points(
        variable: Arc<FuzzyVariable>,
        xs: &[f64],
        ys: &[f64],
        ctx: &FuzzyContext,
    ) -> FuzzyResult<Self> {
        if xs.len() != ys.len() {
            return Err(FuzzyError::new(
                ErrorCode::LengthMismatch,
                format!("{} x values but {} y values", xs.len(), ys.len()),
            ));
        }
        if xs.is_empty() {
            return Err(FuzzyError::new(
                ErrorCode::EmptyInput,
                "a fuzzy value needs at least one point",
            ));
        }
        let points: Vec<SetPoint> = xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| SetPoint::new(x, y))
            .collect();
        validate_strict(&points)?;
        Self::bind(variable, FuzzySet::from_points(points)?, None, ctx)
    }

    /// Evaluate a linguistic expression over the variable's terms
    pub fn from_expression(
        variable: Arc<FuzzyVariable>,
        expression: &str,
        ctx: &FuzzyContext,
    ) -> FuzzyResult<Self> {
        let set = variable.parse_expression_with(expression, &ctx.modifiers)?;
        let label = expression.split_whitespace().collect::<Vec<_>>().join(" ");
        Self::bind(variable, set, Some(label), ctx)
    }

    /// The value of a single registered term
    pub fn from_term(variable: Arc<FuzzyVariable>, term: &str, ctx: &FuzzyContext) -> FuzzyResult<Self> {
        let set = variable
            .term(term)
            .cloned()
            .ok_or_else(|| FuzzyError::unknown_term(term, variable.name(), 0))?;
        Self::bind(variable, set, Some(term.to_string()), ctx)
    }

    /// A crisp reading: membership 1 at `x`, 0 elsewhere
    pub fn singleton(variable: Arc<FuzzyVariable>, x: f64, ctx: &FuzzyContext) -> FuzzyResult<Self> {
        Self::bind(variable, singleton(x, 1.0)?, None, ctx)
    }

    /// Zero membership over the whole universe
    pub fn empty(variable: Arc<FuzzyVariable>) -> Self {
        let (min, max) = variable.uod();
        let set = FuzzySet::from_points_unchecked(vec![SetPoint::new(min, 0.0), SetPoint::new(max, 0.0)]);
        Self {
            variable,
            set,
            label: None,
        }
    }

    fn bind(
        variable: Arc<FuzzyVariable>,
        set: FuzzySet,
        label: Option<String>,
        ctx: &FuzzyContext,
    ) -> FuzzyResult<Self> {
        let (min, max) = variable.uod();
        if set.extends_beyond(min, max) {
            if !ctx.confine_to_uod {
                let outside = set
                    .points()
                    .iter()
                    .find(|p| p.x < min || p.x > max)
                    .map(|p| p.x)
                    .unwrap_or(min);
                return Err(FuzzyError::uod_violation(variable.name(), outside, min, max));
            }
            warn!(
                variable = %variable.name(),
                min,
                max,
                "clipping fuzzy set to the universe of discourse"
            );
        }
        let set = set.clip(min, max)?;
        Ok(Self {
            variable,
            set,
            label,
        })
    }

    /// A value on the same variable; `set` must already lie within the bounds
    pub(crate) fn derive(&self, set: FuzzySet, label: Option<String>) -> FuzzyResult<FuzzyValue> {
        let (min, max) = self.variable.uod();
        Ok(FuzzyValue {
            variable: Arc::clone(&self.variable),
            set: set.clip(min, max)?,
            label,
        })
    }

    pub(crate) fn ensure_compatible(&self, other: &FuzzyValue) -> FuzzyResult<()> {
        if self.variable.compatible_with(&other.variable) {
            Ok(())
        } else {
            Err(FuzzyError::incompatible(self.variable.name(), other.variable.name()))
        }
    }

    pub fn variable(&self) -> &FuzzyVariable {
        &self.variable
    }

    pub fn shared_variable(&self) -> Arc<FuzzyVariable> {
        Arc::clone(&self.variable)
    }

    pub fn set(&self) -> &FuzzySet {
        &self.set
    }

    pub fn into_set(self) -> FuzzySet {
        self.set
    }

    /// Linguistic provenance, if the value came from an expression
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    pub fn union(&self, other: &FuzzyValue) -> FuzzyResult<FuzzyValue> {
        self.ensure_compatible(other)?;
        self.derive(self.set.union(&other.set), join_labels(self.label(), "or", other.label()))
    }

    pub fn intersection(&self, other: &FuzzyValue) -> FuzzyResult<FuzzyValue> {
        self.ensure_compatible(other)?;
        self.derive(
            self.set.intersection(&other.set),
            join_labels(self.label(), "and", other.label()),
        )
    }

    pub fn fuzzy_sum(&self, other: &FuzzyValue) -> FuzzyResult<FuzzyValue> {
        self.ensure_compatible(other)?;
        self.derive(self.set.fuzzy_sum(&other.set), None)
    }

    pub fn complement(&self) -> FuzzyResult<FuzzyValue> {
        self.derive(self.set.complement(), prefix_label("not", self.label()))
    }

    pub fn horizontal_intersection(&self, level: f64) -> FuzzyResult<FuzzyValue> {
        self.derive(self.set.horizontal_intersection(level)?, None)
    }

    pub fn horizontal_union(&self, level: f64) -> FuzzyResult<FuzzyValue> {
        self.derive(self.set.horizontal_union(level)?, None)
    }

    pub fn scale(&self, factor: f64) -> FuzzyResult<FuzzyValue> {
        self.derive(self.set.scale(factor)?, None)
    }

    pub fn normalize(&self) -> FuzzyResult<FuzzyValue> {
        self.derive(self.set.normalize(), prefix_label("norm", self.label()))
    }

    /// Apply a named modifier from the context's registry
    pub fn modify(&self, modifier: &str, ctx: &FuzzyContext) -> FuzzyResult<FuzzyValue> {
        let set = ctx.modifiers.apply(modifier, &self.set)?;
        self.derive(set, prefix_label(&modifier.to_lowercase(), self.label()))
    }

    /// Merge a repeated assertion of the same fact into this value with the
    /// context's global contribution operator
    pub fn contribute(&self, asserted: &FuzzyValue, ctx: &FuzzyContext) -> FuzzyResult<FuzzyValue> {
        ctx.global_contribution.combine(self, asserted)
    }

    // ========================================================================
    // Defuzzification
    // ========================================================================

    pub fn defuzzify(&self, method: DefuzzifyMethod) -> FuzzyResult<f64> {
        self.set.defuzzify(method)
    }

    /// Defuzzify with the context's default method
    pub fn crisp(&self, ctx: &FuzzyContext) -> FuzzyResult<f64> {
        self.defuzzify(ctx.defuzzify)
    }

    pub fn moment_defuzzify(&self) -> FuzzyResult<f64> {
        self.set.moment_defuzzify()
    }

    pub fn center_of_area_defuzzify(&self) -> FuzzyResult<f64> {
        self.set.center_of_area_defuzzify()
    }

    pub fn maximum_defuzzify(&self) -> FuzzyResult<f64> {
        self.set.maximum_defuzzify()
    }

    pub fn weighted_average_defuzzify(&self) -> FuzzyResult<f64> {
        self.set.weighted_average_defuzzify()
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    pub fn similarity(&self, other: &FuzzyValue, ctx: &FuzzyContext) -> FuzzyResult<f64> {
        self.similarity_with(other, &ctx.similarity)
    }

    pub fn similarity_with(&self, other: &FuzzyValue, op: &SimilarityOperator) -> FuzzyResult<f64> {
        self.ensure_compatible(other)?;
        Ok(op.similarity(&self.set, &other.set))
    }

    /// Highest membership the two values share
    pub fn maximum_of_intersection(&self, other: &FuzzyValue) -> FuzzyResult<f64> {
        self.ensure_compatible(other)?;
        Ok(self.set.maximum_of_intersection(&other.set))
    }

    /// True when the values overlap at least up to the context threshold
    pub fn fuzzy_match(&self, other: &FuzzyValue, ctx: &FuzzyContext) -> FuzzyResult<bool> {
        self.fuzzy_match_with(other, ctx.match_threshold)
    }

    pub fn fuzzy_match_with(&self, other: &FuzzyValue, threshold: f64) -> FuzzyResult<bool> {
        Ok(self.maximum_of_intersection(other)? >= threshold)
    }

    /// Equality under the context's strength and tolerance
    pub fn equals(&self, other: &FuzzyValue, ctx: &FuzzyContext) -> bool {
        self.variable.compatible_with(&other.variable)
            && self.set.equals(&other.set, ctx.equality, ctx.equality_tolerance)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn membership(&self, x: f64) -> f64 {
        self.set.membership(x)
    }

    /// Alpha-cut restricted to the universe of discourse
    pub fn alpha_cut(&self, strength: Strength, level: f64) -> IntervalVector {
        self.set.alpha_cut(strength, level).clamp_to(&self.bounds())
    }

    pub fn support(&self) -> IntervalVector {
        self.set.support().clamp_to(&self.bounds())
    }

    pub fn core(&self) -> IntervalVector {
        self.set.core().clamp_to(&self.bounds())
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn is_normal(&self) -> bool {
        self.set.is_normal()
    }

    pub fn is_convex(&self) -> bool {
        self.set.is_convex()
    }

    pub fn max_y(&self) -> f64 {
        self.set.max_y()
    }

    /// ASCII chart over the universe of discourse
    pub fn plot(&self, width: usize, height: usize) -> String {
        let (min, max) = self.variable.uod();
        self.set.plot_range(min, max, width, height)
    }

    fn bounds(&self) -> Interval {
        let (min, max) = self.variable.uod();
        Interval::closed(min, max)
    }
}

impl fmt::Display for FuzzyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variable.name())?;
        if let Some(ref label) = self.label {
            write!(f, " is {}", label)?;
        }
        write!(f, " {}", self.set)
    }
}

fn parenthesize(label: &str) -> String {
    if label.contains(char::is_whitespace) {
        format!("({})", label)
    } else {
        label.to_string()
    }
}

fn join_labels(left: Option<&str>, op: &str, right: Option<&str>) -> Option<String> {
    match (left, right) {
        (Some(l), Some(r)) => Some(format!("{} {} {}", parenthesize(l), op, parenthesize(r))),
        _ => None,
    }
}

fn prefix_label(prefix: &str, label: Option<&str>) -> Option<String> {
    label.map(|l| format!("{} {}", prefix, parenthesize(l)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::GlobalContributionOperator;
    use crate::shapes::{trapezoid, triangle};

    fn temperature() -> Arc<FuzzyVariable> {
        let mut var = FuzzyVariable::new("temperature", 0.0, 100.0, "C").unwrap();
        var.add_term("cold", trapezoid(0.0, 0.0, 10.0, 30.0).unwrap()).unwrap();
        var.add_term("warm", triangle(20.0, 50.0, 80.0).unwrap()).unwrap();
        var.add_term("hot", trapezoid(70.0, 90.0, 100.0, 100.0).unwrap()).unwrap();
        Arc::new(var)
    }

    #[test]
    fn test_value_spans_uod() {
        let ctx = FuzzyContext::default();
        let value = FuzzyValue::from_term(temperature(), "warm", &ctx).unwrap();
        let points = value.set().points();
        assert_eq!(points.first().map(|p| p.x), Some(0.0));
        assert_eq!(points.last().map(|p| p.x), Some(100.0));
        assert_eq!(value.label(), Some("warm"));
        assert_eq!(value.membership(50.0), 1.0);
    }

    #[test]
    fn test_contribute_follows_context() {
        let var = temperature();
        let ctx = FuzzyContext::default();
        let half = FuzzyValue::new(var.clone(), triangle(40.0, 50.0, 60.0).unwrap().scale(0.5).unwrap(), &ctx)
            .unwrap();

        let merged = half.contribute(&half, &ctx).unwrap();
        assert_eq!(merged.membership(50.0), 0.5);

        let summing = ctx.clone().with_global_contribution(GlobalContributionOperator::Sum);
        let merged = half.contribute(&half, &summing).unwrap();
        assert!((merged.membership(50.0) - 0.75).abs() < 1e-12);

        let other = Arc::new(FuzzyVariable::new("humidity", 0.0, 1.0, "").unwrap());
        let foreign = FuzzyValue::singleton(other, 0.5, &ctx).unwrap();
        assert_eq!(
            half.contribute(&foreign, &ctx).unwrap_err().code,
            ErrorCode::IncompatibleVariables
        );
    }

    #[test]
    fn test_confinement_clips() {
        let ctx = FuzzyContext::default();
        let wide = triangle(-50.0, 50.0, 150.0).unwrap();
        let value = FuzzyValue::new(temperature(), wide, &ctx).unwrap();
        assert!(!value.set().extends_beyond(0.0, 100.0));
        assert!((value.membership(0.0) - 0.5).abs() < 1e-12);
        assert!((value.membership(100.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unconfined_rejects() {
        let ctx = FuzzyContext::default().with_confine_to_uod(false);
        let wide = triangle(-50.0, 50.0, 150.0).unwrap();
        let err = FuzzyValue::new(temperature(), wide, &ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::UodViolation);
    }

    #[test]
    fn test_from_points_validation() {
        let ctx = FuzzyContext::default();
        let var = temperature();
        let err = FuzzyValue::from_points(var.clone(), &[1.0, 2.0], &[0.5], &ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::LengthMismatch);
        let err = FuzzyValue::from_points(var.clone(), &[], &[], &ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyInput);
        let err = FuzzyValue::from_points(var.clone(), &[5.0, 5.0], &[0.0, 1.0], &ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnorderedBreakpoints);
        let err = FuzzyValue::from_points(var, &[5.0, 6.0], &[0.0, 1.5], &ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::MembershipOutOfRange);
    }

    #[test]
    fn test_from_expression_label() {
        let ctx = FuzzyContext::default();
        let value = FuzzyValue::from_expression(temperature(), "very  warm", &ctx).unwrap();
        assert_eq!(value.label(), Some("very warm"));
        assert!((value.membership(35.0) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_term() {
        let ctx = FuzzyContext::default();
        let err = FuzzyValue::from_term(temperature(), "tepid", &ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownTerm);
    }

    #[test]
    fn test_algebra_labels() {
        let ctx = FuzzyContext::default();
        let var = temperature();
        let cold = FuzzyValue::from_term(var.clone(), "cold", &ctx).unwrap();
        let hot = FuzzyValue::from_term(var, "hot", &ctx).unwrap();
        let either = cold.union(&hot).unwrap();
        assert_eq!(either.label(), Some("cold or hot"));
        let neither = either.complement().unwrap();
        assert_eq!(neither.label(), Some("not (cold or hot)"));
        assert_eq!(neither.membership(50.0), 1.0);
        let very = cold.modify("very", &ctx).unwrap();
        assert_eq!(very.label(), Some("very cold"));
    }

    #[test]
    fn test_incompatible_variables() {
        let ctx = FuzzyContext::default();
        let pressure = Arc::new(FuzzyVariable::new("pressure", 0.0, 10.0, "bar").unwrap());
        let a = FuzzyValue::from_term(temperature(), "warm", &ctx).unwrap();
        let b = FuzzyValue::singleton(pressure, 5.0, &ctx).unwrap();
        assert_eq!(a.union(&b).unwrap_err().code, ErrorCode::IncompatibleVariables);
        assert_eq!(a.similarity(&b, &ctx).unwrap_err().code, ErrorCode::IncompatibleVariables);
    }

    #[test]
    fn test_compatible_distinct_variables() {
        let ctx = FuzzyContext::default();
        let other = Arc::new(FuzzyVariable::new("other", 0.0, 100.0, "").unwrap());
        let a = FuzzyValue::from_term(temperature(), "warm", &ctx).unwrap();
        let b = FuzzyValue::singleton(other, 50.0, &ctx).unwrap();
        assert_eq!(a.maximum_of_intersection(&b).unwrap(), 1.0);
    }

    #[test]
    fn test_fuzzy_match() {
        let ctx = FuzzyContext::default();
        let var = temperature();
        let warm = FuzzyValue::from_term(var.clone(), "warm", &ctx).unwrap();
        let reading = FuzzyValue::singleton(var.clone(), 30.0, &ctx).unwrap();
        // warm(30) = 1/3
        assert!(!warm.fuzzy_match(&reading, &ctx).unwrap());
        assert!(warm.fuzzy_match_with(&reading, 0.3).unwrap());
    }

    #[test]
    fn test_alpha_cut_clamped() {
        let ctx = FuzzyContext::default();
        let cold = FuzzyValue::from_term(temperature(), "cold", &ctx).unwrap();
        let cut = cold.alpha_cut(Strength::Weak, 0.5);
        assert_eq!(cut.len(), 1);
        let interval = cut.get(0).unwrap();
        assert_eq!(interval.low(), 0.0);
        assert_eq!(interval.high(), 20.0);
    }

    #[test]
    fn test_empty_value() {
        let value = FuzzyValue::empty(temperature());
        assert!(value.is_empty());
        assert_eq!(
            value.moment_defuzzify().unwrap_err().code,
            ErrorCode::NoDefuzzifiedValue
        );
    }

    #[test]
    fn test_equals_uses_context() {
        let ctx = FuzzyContext::default();
        let var = temperature();
        let a = FuzzyValue::from_term(var.clone(), "warm", &ctx).unwrap();
        let b = FuzzyValue::from_points(var, &[0.0, 20.0, 35.0, 50.0, 80.0, 100.0], &[0.0, 0.0, 0.5, 1.0, 0.0, 0.0], &ctx)
            .unwrap();
        assert!(a.equals(&b, &ctx));
        let strict = FuzzyContext::default().with_equality(Strength::Strong, 0.0);
        assert!(!a.equals(&b, &strict));
    }

    #[test]
    fn test_display() {
        let ctx = FuzzyContext::default();
        let value = FuzzyValue::from_term(temperature(), "cold", &ctx).unwrap();
        let text = value.to_string();
        assert!(text.starts_with("temperature is cold {"));
    }
}
