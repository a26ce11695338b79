//! Rule execution strategies
//!
//! An executor turns the combined match degree of a rule and one conclusion
//! into the value the rule asserts for that conclusion.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{ErrorCode, FuzzyError, FuzzyResult};
use crate::set::FuzzySet;
use crate::shapes::singleton;
use crate::value::FuzzyValue;

/// User-supplied rule execution
pub trait RuleExecution: Send + Sync {
    fn execute(&self, degree: f64, conclusion: &FuzzyValue) -> FuzzyResult<FuzzyValue>;

    fn name(&self) -> &str {
        "custom"
    }
}

#[derive(Clone, Default)]
pub enum RuleExecutor {
    /// Clip the conclusion at the match degree
    #[default]
    MamdaniMinMaxMin,
    /// Scale the conclusion by the match degree
    LarsenProductMaxMin,
    /// Singleton where a monotonic conclusion reaches the match degree
    Tsukamoto,
    Custom(Arc<dyn RuleExecution>),
}

impl RuleExecutor {
    pub fn custom<E: RuleExecution + 'static>(executor: E) -> Self {
        RuleExecutor::Custom(Arc::new(executor))
    }

    pub fn name(&self) -> &str {
        match self {
            RuleExecutor::MamdaniMinMaxMin => "mamdani",
            RuleExecutor::LarsenProductMaxMin => "larsen",
            RuleExecutor::Tsukamoto => "tsukamoto",
            RuleExecutor::Custom(executor) => executor.name(),
        }
    }

    pub fn execute(&self, degree: f64, conclusion: &FuzzyValue) -> FuzzyResult<FuzzyValue> {
        match self {
            RuleExecutor::MamdaniMinMaxMin => conclusion.derive(
                conclusion.set().horizontal_intersection(degree)?,
                conclusion.label().map(str::to_string),
            ),
            RuleExecutor::LarsenProductMaxMin => conclusion.derive(
                conclusion.set().scale(degree)?,
                conclusion.label().map(str::to_string),
            ),
            RuleExecutor::Tsukamoto => tsukamoto(degree, conclusion),
            RuleExecutor::Custom(executor) => executor.execute(degree, conclusion),
        }
    }
}

impl fmt::Debug for RuleExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleExecutor::{}", self.name())
    }
}

fn tsukamoto(degree: f64, conclusion: &FuzzyValue) -> FuzzyResult<FuzzyValue> {
    let set = conclusion.set();
    if !is_monotonic(set) {
        return Err(FuzzyError::new(
            ErrorCode::NonMonotonicConclusion,
            format!(
                "Tsukamoto execution needs a monotonic conclusion on '{}'",
                conclusion.variable().name()
            ),
        )
        .with_hint("use S, Z, left-linear or right-linear shapes for Tsukamoto conclusions"));
    }
    if degree == 0.0 {
        return Ok(FuzzyValue::empty(conclusion.shared_variable()));
    }

    let crossings = level_crossings(set, degree);
    let (lo, hi) = match (crossings.first(), crossings.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => {
            return Err(FuzzyError::new(
                ErrorCode::NoTsukamotoSolution,
                format!(
                    "conclusion on '{}' never reaches membership {}",
                    conclusion.variable().name(),
                    degree
                ),
            ))
        }
    };
    let x = (lo + hi) / 2.0;
    trace!(degree, x, "tsukamoto crossing");
    conclusion.derive(singleton(x, degree)?, conclusion.label().map(str::to_string))
}

/// Non-decreasing or non-increasing across all breakpoints
fn is_monotonic(set: &FuzzySet) -> bool {
    let points = set.points();
    let rising = points.windows(2).all(|w| w[1].y >= w[0].y);
    let falling = points.windows(2).all(|w| w[1].y <= w[0].y);
    rising || falling
}

/// Sorted x positions where the membership function takes the value `level`
fn level_crossings(set: &FuzzySet, level: f64) -> Vec<f64> {
    let points = set.points();
    let mut xs = Vec::new();
    for p in points {
        if p.y == level {
            xs.push(p.x);
        }
    }
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let (low, high) = (a.y.min(b.y), a.y.max(b.y));
        if low < level && level < high {
            if a.x == b.x {
                xs.push(a.x);
            } else {
                xs.push(a.x + (level - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
    }
    xs.sort_by(f64::total_cmp);
    xs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FuzzyContext;
    use crate::shapes::{right_linear, triangle};
    use crate::variable::FuzzyVariable;

    fn output() -> Arc<FuzzyVariable> {
        Arc::new(FuzzyVariable::new("output", 0.0, 10.0, "").unwrap())
    }

    fn value(set: FuzzySet) -> FuzzyValue {
        FuzzyValue::new(output(), set, &FuzzyContext::default()).unwrap()
    }

    #[test]
    fn test_mamdani_clips() {
        let conclusion = value(triangle(0.0, 5.0, 10.0).unwrap());
        let out = RuleExecutor::MamdaniMinMaxMin.execute(0.4, &conclusion).unwrap();
        assert!((out.max_y() - 0.4).abs() < 1e-12);
        assert!((out.membership(5.0) - 0.4).abs() < 1e-12);
        assert!((out.membership(1.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_larsen_scales() {
        let conclusion = value(triangle(0.0, 5.0, 10.0).unwrap());
        let out = RuleExecutor::LarsenProductMaxMin.execute(0.4, &conclusion).unwrap();
        assert!((out.membership(5.0) - 0.4).abs() < 1e-12);
        assert!((out.membership(2.5) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_degree_zero_gives_empty() {
        let conclusion = value(triangle(0.0, 5.0, 10.0).unwrap());
        let out = RuleExecutor::MamdaniMinMaxMin.execute(0.0, &conclusion).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_tsukamoto_interpolates() {
        let conclusion = value(right_linear(2.0, 6.0).unwrap());
        let out = RuleExecutor::Tsukamoto.execute(0.5, &conclusion).unwrap();
        assert_eq!(out.membership(4.0), 0.5);
        assert_eq!(out.membership(3.9), 0.0);
        assert!((out.moment_defuzzify().unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_tsukamoto_plateau_midpoint() {
        // saturates at 1 from x = 6 to the end of the universe
        let conclusion = value(right_linear(2.0, 6.0).unwrap());
        let out = RuleExecutor::Tsukamoto.execute(1.0, &conclusion).unwrap();
        assert!((out.moment_defuzzify().unwrap() - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_tsukamoto_rejects_non_monotonic() {
        let conclusion = value(triangle(0.0, 5.0, 10.0).unwrap());
        let err = RuleExecutor::Tsukamoto.execute(0.5, &conclusion).unwrap_err();
        assert_eq!(err.code, ErrorCode::NonMonotonicConclusion);
    }

    #[test]
    fn test_tsukamoto_unreachable_degree() {
        let conclusion = value(right_linear(2.0, 6.0).unwrap().scale(0.5).unwrap());
        let err = RuleExecutor::Tsukamoto.execute(0.8, &conclusion).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoTsukamotoSolution);
    }

    #[test]
    fn test_tsukamoto_degree_zero() {
        let conclusion = value(right_linear(2.0, 6.0).unwrap());
        let out = RuleExecutor::Tsukamoto.execute(0.0, &conclusion).unwrap();
        assert!(out.is_empty());
    }

    struct Constant;

    impl RuleExecution for Constant {
        fn execute(&self, _degree: f64, conclusion: &FuzzyValue) -> FuzzyResult<FuzzyValue> {
            Ok(conclusion.clone())
        }

        fn name(&self) -> &str {
            "constant"
        }
    }

    #[test]
    fn test_custom_executor() {
        let executor = RuleExecutor::custom(Constant);
        assert_eq!(executor.name(), "constant");
        let conclusion = value(triangle(0.0, 5.0, 10.0).unwrap());
        let out = executor.execute(0.1, &conclusion).unwrap();
        assert_eq!(out.max_y(), 1.0);
    }
}
