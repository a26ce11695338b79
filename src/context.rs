//! Explicit policy for fuzzy operations
//!
//! A [`FuzzyContext`] bundles every default strategy and flag that value
//! construction, matching and rule firing consult. It is passed by
//! reference into each operation; nothing is read from global state.
//!
//! ```rust,ignore
//! let ctx = FuzzyContext::default()
//!     .with_executor(RuleExecutor::LarsenProductMaxMin)
//!     .with_match_threshold(0.4);
//! let out = rule.fire(&ctx)?;
//! ```

use std::sync::Arc;

use crate::config::{CombineKind, ContributionKind, ExecutorKind, FuzzyConfig, SimilarityKind};
use crate::error::FuzzyResult;
use crate::modifiers::{ModifierRegistry, DEFAULT_MODIFIER_RESOLUTION};
use crate::operators::{AntecedentCombineOperator, GlobalContributionOperator, SimilarityOperator};
use crate::rule::{MatchMethod, RuleExecutor};
use crate::set::{DefuzzifyMethod, Strength};
use crate::shapes::DEFAULT_CURVE_POINTS;

/// Default threshold for `fuzzy_match`
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.5;

/// Default tolerance for weak equality
pub const DEFAULT_EQUALITY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct FuzzyContext {
    /// Used by `FuzzyValue::similarity` and similarity-based matching
    pub similarity: SimilarityOperator,
    /// Executor for rules without their own
    pub executor: RuleExecutor,
    /// Antecedent combination for rules without their own
    pub combine: AntecedentCombineOperator,
    /// How repeated assertions of one fact merge
    pub global_contribution: GlobalContributionOperator,
    /// How each antecedent is matched against its input
    pub match_method: MatchMethod,
    /// Minimum degree for `fuzzy_match`
    pub match_threshold: f64,
    /// Clip values to their universe of discourse instead of rejecting them
    pub confine_to_uod: bool,
    /// Equality used by `FuzzyValue::equals`
    pub equality: Strength,
    pub equality_tolerance: f64,
    /// Samples per curved flank for shape factories
    pub curve_points: usize,
    /// Default method for crisp output
    pub defuzzify: DefuzzifyMethod,
    pub modifiers: Arc<ModifierRegistry>,
}

impl Default for FuzzyContext {
    fn default() -> Self {
        Self {
            similarity: SimilarityOperator::default(),
            executor: RuleExecutor::default(),
            combine: AntecedentCombineOperator::default(),
            global_contribution: GlobalContributionOperator::default(),
            match_method: MatchMethod::default(),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            confine_to_uod: true,
            equality: Strength::Weak,
            equality_tolerance: DEFAULT_EQUALITY_TOLERANCE,
            curve_points: DEFAULT_CURVE_POINTS,
            defuzzify: DefuzzifyMethod::default(),
            modifiers: Arc::new(
                ModifierRegistry::builtin().with_resolution(DEFAULT_MODIFIER_RESOLUTION),
            ),
        }
    }
}

impl FuzzyContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from validated configuration
    pub fn from_config(config: &FuzzyConfig) -> FuzzyResult<Self> {
        config.validate()?;
        let inference = &config.inference;
        Ok(Self {
            similarity: match inference.similarity {
                SimilarityKind::AreaRatio => SimilarityOperator::AreaRatio,
                SimilarityKind::PossibilityNecessity => SimilarityOperator::PossibilityNecessity,
            },
            executor: match inference.executor {
                ExecutorKind::Mamdani => RuleExecutor::MamdaniMinMaxMin,
                ExecutorKind::Larsen => RuleExecutor::LarsenProductMaxMin,
                ExecutorKind::Tsukamoto => RuleExecutor::Tsukamoto,
            },
            combine: match inference.combine {
                CombineKind::Minimum => AntecedentCombineOperator::Minimum,
                CombineKind::Product => AntecedentCombineOperator::Product,
                CombineKind::Compensatory => AntecedentCombineOperator::CompensatoryAnd,
            },
            global_contribution: match inference.global_contribution {
                ContributionKind::Union => GlobalContributionOperator::Union,
                ContributionKind::Sum => GlobalContributionOperator::Sum,
            },
            match_method: inference.match_method,
            match_threshold: inference.match_threshold,
            confine_to_uod: config.values.confine_to_uod,
            equality: config.values.equality,
            equality_tolerance: config.values.equality_tolerance,
            curve_points: config.shapes.curve_points,
            defuzzify: config.values.defuzzify,
            modifiers: Arc::new(
                ModifierRegistry::builtin().with_resolution(config.shapes.modifier_resolution),
            ),
        })
    }

    pub fn with_similarity(mut self, similarity: SimilarityOperator) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_executor(mut self, executor: RuleExecutor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_combine(mut self, combine: AntecedentCombineOperator) -> Self {
        self.combine = combine;
        self
    }

    pub fn with_global_contribution(mut self, global: GlobalContributionOperator) -> Self {
        self.global_contribution = global;
        self
    }

    pub fn with_match_method(mut self, method: MatchMethod) -> Self {
        self.match_method = method;
        self
    }

    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    pub fn with_confine_to_uod(mut self, confine: bool) -> Self {
        self.confine_to_uod = confine;
        self
    }

    pub fn with_equality(mut self, strength: Strength, tolerance: f64) -> Self {
        self.equality = strength;
        self.equality_tolerance = tolerance;
        self
    }

    pub fn with_curve_points(mut self, points: usize) -> Self {
        self.curve_points = points;
        self
    }

    pub fn with_defuzzify(mut self, method: DefuzzifyMethod) -> Self {
        self.defuzzify = method;
        self
    }

    pub fn with_modifiers(mut self, modifiers: ModifierRegistry) -> Self {
        self.modifiers = Arc::new(modifiers);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_context_is_send_sync() {
        assert_send_sync::<FuzzyContext>();
    }

    #[test]
    fn test_defaults() {
        let ctx = FuzzyContext::default();
        assert_eq!(ctx.match_threshold, DEFAULT_MATCH_THRESHOLD);
        assert!(ctx.confine_to_uod);
        assert_eq!(ctx.curve_points, DEFAULT_CURVE_POINTS);
        assert_eq!(ctx.executor.name(), "mamdani");
    }

    #[test]
    fn test_from_config() {
        let config = FuzzyConfig::load_from_str(
            r#"
            [inference]
            executor = "larsen"
            combine = "product"
            match_threshold = 0.8

            [values]
            confine_to_uod = false

            [shapes]
            modifier_resolution = 3
            "#,
        )
        .unwrap();
        let ctx = FuzzyContext::from_config(&config).unwrap();
        assert_eq!(ctx.executor.name(), "larsen");
        assert_eq!(ctx.combine.name(), "product");
        assert_eq!(ctx.match_threshold, 0.8);
        assert!(!ctx.confine_to_uod);
        assert_eq!(ctx.modifiers.resolution(), 3);
    }

    #[test]
    fn test_from_invalid_config() {
        let mut config = FuzzyConfig::default();
        config.inference.match_threshold = 1.5;
        assert!(FuzzyContext::from_config(&config).is_err());
    }

    #[test]
    fn test_builders() {
        let ctx = FuzzyContext::new()
            .with_executor(RuleExecutor::Tsukamoto)
            .with_match_threshold(0.25)
            .with_equality(Strength::Strong, 0.0);
        assert_eq!(ctx.executor.name(), "tsukamoto");
        assert_eq!(ctx.match_threshold, 0.25);
        assert_eq!(ctx.equality, Strength::Strong);
    }
}
