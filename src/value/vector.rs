//! Ordered collections of fuzzy values

use std::fmt;

use crate::context::FuzzyContext;
use crate::error::{FuzzyError, FuzzyResult};
use crate::operators::GlobalContributionOperator;
use crate::value::FuzzyValue;

/// Insertion-ordered fuzzy values, as produced by firing a rule
#[derive(Debug, Clone, Default)]
pub struct FuzzyValueVector {
    values: Vec<FuzzyValue>,
}

impl FuzzyValueVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: FuzzyValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FuzzyValue> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FuzzyValue> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[FuzzyValue] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<FuzzyValue> {
        self.values
    }

    /// Fold every value into one with a global contribution operator.
    ///
    /// Returns `None` for an empty vector.
    pub fn aggregate(&self, op: &GlobalContributionOperator) -> FuzzyResult<Option<FuzzyValue>> {
        let mut values = self.values.iter();
        let Some(first) = values.next() else {
            return Ok(None);
        };
        let mut acc = first.clone();
        for value in values {
            acc = op.combine(&acc, value)?;
        }
        Ok(Some(acc))
    }

    /// Fold every value with the context's global contribution operator
    pub fn aggregate_with_context(&self, ctx: &FuzzyContext) -> FuzzyResult<Option<FuzzyValue>> {
        self.aggregate(&ctx.global_contribution)
    }

    /// Pointwise maximum of every value
    pub fn union_all(&self) -> FuzzyResult<Option<FuzzyValue>> {
        self.aggregate(&GlobalContributionOperator::Union)
    }

    /// Height-weighted mean of each value's maximum defuzzification.
    ///
    /// Values with no positive membership carry no weight; when none has
    /// any, there is no result.
    pub fn weighted_average_defuzzify(&self) -> FuzzyResult<f64> {
        let (mut weighted, mut total) = (0.0, 0.0);
        for value in self.values.iter().filter(|v| !v.is_empty()) {
            let height = value.max_y();
            weighted += height * value.maximum_defuzzify()?;
            total += height;
        }
        if total == 0.0 {
            return Err(FuzzyError::no_defuzzified_value("weighted average"));
        }
        Ok(weighted / total)
    }
}

impl From<Vec<FuzzyValue>> for FuzzyValueVector {
    fn from(values: Vec<FuzzyValue>) -> Self {
        Self { values }
    }
}

impl FromIterator<FuzzyValue> for FuzzyValueVector {
    fn from_iter<I: IntoIterator<Item = FuzzyValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FuzzyValueVector {
    type Item = FuzzyValue;
    type IntoIter = std::vec::IntoIter<FuzzyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a FuzzyValueVector {
    type Item = &'a FuzzyValue;
    type IntoIter = std::slice::Iter<'a, FuzzyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for FuzzyValueVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}
