//! fuzzykit - Fuzzy sets, values and rules
//!
//! A toolkit for representing and reasoning with piecewise-linear fuzzy
//! sets.
//!
//! # Architecture
//!
//! - [`set::FuzzySet`] - ordered breakpoints and the algebra on them
//! - [`shapes`] - standard membership function factories
//! - [`modifiers::ModifierRegistry`] - linguistic hedges such as `very`
//! - [`variable::FuzzyVariable`] - a universe of discourse with named terms
//! - [`value::FuzzyValue`] - a fuzzy set bound to a variable
//! - [`rule::FuzzyRule`] - antecedents, conclusions and inputs, fired by a
//!   [`rule::RuleExecutor`]
//! - [`context::FuzzyContext`] - the policy every operation consults
//!
//! # Features
//!
//! - Union, intersection, complement, fuzzy sum, horizontal operations
//! - Alpha-cuts, support, core, convexity and normality tests
//! - Linguistic expressions with `and`, `or`, `not`, hedges and parentheses
//! - Moment, center-of-area, maximum and weighted-average defuzzification
//! - Mamdani, Larsen and Tsukamoto rule execution
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fuzzykit::{shapes, FuzzyContext, FuzzyRule, FuzzyValue, FuzzyVariable};
//!
//! let ctx = FuzzyContext::default();
//!
//! let mut temp = FuzzyVariable::new("temperature", 0.0, 40.0, "C")?;
//! temp.add_term("warm", shapes::triangle(15.0, 22.0, 30.0)?)?;
//! let temp = Arc::new(temp);
//!
//! let mut fan = FuzzyVariable::new("fan", 0.0, 100.0, "%")?;
//! fan.add_term("fast", shapes::right_linear(40.0, 90.0)?)?;
//! let fan = Arc::new(fan);
//!
//! let mut rule = FuzzyRule::named("warm-means-fast");
//! rule.add_antecedent(FuzzyValue::from_term(temp.clone(), "warm", &ctx)?);
//! rule.add_conclusion(FuzzyValue::from_term(fan, "fast", &ctx)?);
//! rule.set_inputs(vec![FuzzyValue::singleton(temp, 25.0, &ctx)?]);
//!
//! let speed = rule.fire(&ctx)?.union_all()?.map(|v| v.moment_defuzzify());
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod modifiers;
pub mod operators;
pub mod rule;
pub mod set;
pub mod shapes;
pub mod value;
pub mod variable;

// Re-export the main types
pub use crate::config::{
    CombineKind, ConfigError, ContributionKind, ExecutorKind, FuzzyConfig, LogLevel,
    SimilarityKind,
};
pub use crate::context::FuzzyContext;
pub use crate::error::{ErrorCategory, ErrorCode, FuzzyError, FuzzyResult};
pub use crate::modifiers::{Hedge, Modifier, ModifierRegistry};
pub use crate::operators::{AntecedentCombineOperator, GlobalContributionOperator, SimilarityOperator};
pub use crate::rule::{FuzzyRule, MatchMethod, RuleExecution, RuleExecutor, RuleMatch, RuleState};
pub use crate::set::{
    DefuzzifyMethod, FuzzySet, FuzzySetBuilder, Interval, IntervalVector, SetPoint, Strength,
};
pub use crate::shapes::Shape;
pub use crate::value::{FuzzyValue, FuzzyValueVector};
pub use crate::variable::{FuzzyVariable, LinguisticExpr};
