//! Combining repeated assertions of the same fuzzy fact

use std::fmt;
use std::sync::Arc;

use crate::error::FuzzyResult;
use crate::set::FuzzySet;
use crate::value::FuzzyValue;

/// User-supplied contribution rule
pub type GlobalContributionFn = Arc<dyn Fn(&FuzzySet, &FuzzySet) -> FuzzySet + Send + Sync>;

#[derive(Clone, Default)]
pub enum GlobalContributionOperator {
    /// Pointwise maximum
    #[default]
    Union,
    /// Probabilistic sum
    Sum,
    Custom(GlobalContributionFn),
}

impl GlobalContributionOperator {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&FuzzySet, &FuzzySet) -> FuzzySet + Send + Sync + 'static,
    {
        GlobalContributionOperator::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            GlobalContributionOperator::Union => "union",
            GlobalContributionOperator::Sum => "sum",
            GlobalContributionOperator::Custom(_) => "custom",
        }
    }

    pub fn combine_sets(&self, existing: &FuzzySet, new: &FuzzySet) -> FuzzySet {
        match self {
            GlobalContributionOperator::Union => existing.union(new),
            GlobalContributionOperator::Sum => existing.fuzzy_sum(new),
            GlobalContributionOperator::Custom(f) => f(existing, new),
        }
    }

    /// Merge a newly asserted value into an existing one on a compatible variable
    pub fn combine(&self, existing: &FuzzyValue, new: &FuzzyValue) -> FuzzyResult<FuzzyValue> {
        existing.ensure_compatible(new)?;
        let set = self.combine_sets(existing.set(), new.set());
        existing.derive(set, existing.label().map(str::to_string))
    }
}

impl fmt::Debug for GlobalContributionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlobalContributionOperator::{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::triangle;

    #[test]
    fn test_union_and_sum() {
        let a = triangle(0.0, 5.0, 10.0).unwrap();
        let b = triangle(0.0, 5.0, 10.0).unwrap().scale(0.5).unwrap();
        let union = GlobalContributionOperator::Union.combine_sets(&a, &b);
        assert_eq!(union.max_y(), 1.0);
        let sum = GlobalContributionOperator::Sum.combine_sets(&b, &b);
        assert!((sum.max_y() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_custom() {
        let keep_new = GlobalContributionOperator::custom(|_, new| new.clone());
        let a = triangle(0.0, 1.0, 2.0).unwrap();
        let b = triangle(1.0, 2.0, 3.0).unwrap();
        assert_eq!(keep_new.combine_sets(&a, &b), b);
    }
}
