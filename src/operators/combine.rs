//! Combining per-antecedent match degrees into one rule degree

use std::fmt;
use std::sync::Arc;

/// User-supplied combination of match degrees
pub type CombineFn = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

#[derive(Clone, Default)]
pub enum AntecedentCombineOperator {
    #[default]
    Minimum,
    Product,
    /// `(prod mu)^(1 - 1/n) * (1 - prod(1 - mu))^(1/n)`
    CompensatoryAnd,
    Custom(CombineFn),
}

impl AntecedentCombineOperator {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        AntecedentCombineOperator::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            AntecedentCombineOperator::Minimum => "minimum",
            AntecedentCombineOperator::Product => "product",
            AntecedentCombineOperator::CompensatoryAnd => "compensatory_and",
            AntecedentCombineOperator::Custom(_) => "custom",
        }
    }

    /// Combine degrees; no degrees at all combine to 1
    pub fn combine(&self, degrees: &[f64]) -> f64 {
        if degrees.is_empty() {
            return 1.0;
        }
        let combined = match self {
            AntecedentCombineOperator::Minimum => degrees.iter().copied().fold(1.0, f64::min),
            AntecedentCombineOperator::Product => degrees.iter().product(),
            AntecedentCombineOperator::CompensatoryAnd => {
                let n = degrees.len() as f64;
                let product: f64 = degrees.iter().product();
                let co_product = 1.0 - degrees.iter().map(|d| 1.0 - d).product::<f64>();
                product.powf(1.0 - 1.0 / n) * co_product.powf(1.0 / n)
            }
            AntecedentCombineOperator::Custom(f) => f(degrees),
        };
        if combined.is_nan() {
            0.0
        } else {
            combined.clamp(0.0, 1.0)
        }
    }
}

impl fmt::Debug for AntecedentCombineOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AntecedentCombineOperator::{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_and_product() {
        let degrees = [0.5, 0.8];
        assert_eq!(AntecedentCombineOperator::Minimum.combine(&degrees), 0.5);
        assert!((AntecedentCombineOperator::Product.combine(&degrees) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_empty_combines_to_one() {
        assert_eq!(AntecedentCombineOperator::Minimum.combine(&[]), 1.0);
        assert_eq!(AntecedentCombineOperator::CompensatoryAnd.combine(&[]), 1.0);
    }

    #[test]
    fn test_compensatory_and() {
        let op = AntecedentCombineOperator::CompensatoryAnd;
        // a single degree passes through unchanged
        assert!((op.combine(&[0.3]) - 0.3).abs() < 1e-12);
        // (0.25)^(1/2) * (1 - 0.25)^(1/2)
        let expected = 0.25f64.sqrt() * 0.75f64.sqrt();
        assert!((op.combine(&[0.5, 0.5]) - expected).abs() < 1e-12);
        assert_eq!(op.combine(&[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_custom() {
        let mean = AntecedentCombineOperator::custom(|d| d.iter().sum::<f64>() / d.len() as f64);
        assert!((mean.combine(&[0.2, 0.4]) - 0.3).abs() < 1e-12);
    }
}
