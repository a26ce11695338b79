//! Similarity between two fuzzy sets

use std::fmt;
use std::sync::Arc;

use crate::set::{FuzzySet, Strength};

/// User-supplied similarity measure; must return a degree in `[0, 1]`
pub type SimilarityFn = Arc<dyn Fn(&FuzzySet, &FuzzySet) -> f64 + Send + Sync>;

/// Tolerance for deciding that two zero-area sets coincide
const ZERO_AREA_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Default)]
pub enum SimilarityOperator {
    /// area(A and B) / area(A or B)
    #[default]
    AreaRatio,
    /// Possibility of A given B, discounted when necessity is low
    PossibilityNecessity,
    Custom(SimilarityFn),
}

impl SimilarityOperator {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&FuzzySet, &FuzzySet) -> f64 + Send + Sync + 'static,
    {
        SimilarityOperator::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            SimilarityOperator::AreaRatio => "area_ratio",
            SimilarityOperator::PossibilityNecessity => "possibility_necessity",
            SimilarityOperator::Custom(_) => "custom",
        }
    }

    /// Degree of resemblance of `a` and `b`, clamped to `[0, 1]`
    pub fn similarity(&self, a: &FuzzySet, b: &FuzzySet) -> f64 {
        let degree = match self {
            SimilarityOperator::AreaRatio => area_ratio(a, b),
            SimilarityOperator::PossibilityNecessity => possibility_necessity(a, b),
            SimilarityOperator::Custom(f) => f(a, b),
        };
        if degree.is_nan() {
            0.0
        } else {
            degree.clamp(0.0, 1.0)
        }
    }
}

fn area_ratio(a: &FuzzySet, b: &FuzzySet) -> f64 {
    let union = a.union(b).area();
    if union <= 0.0 {
        // spikes or empty sets: only identical shapes count as similar
        return if a.equals(b, Strength::Weak, ZERO_AREA_TOLERANCE) {
            1.0
        } else {
            0.0
        };
    }
    a.intersection(b).area() / union
}

fn possibility_necessity(a: &FuzzySet, b: &FuzzySet) -> f64 {
    let possibility = a.maximum_of_intersection(b);
    let necessity = 1.0 - a.complement().maximum_of_intersection(b);
    if necessity > 0.5 {
        possibility
    } else {
        (necessity + 0.5) * possibility
    }
}

impl fmt::Debug for SimilarityOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimilarityOperator::{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{singleton, triangle};

    #[test]
    fn test_area_ratio() {
        let a = triangle(0.0, 5.0, 10.0).unwrap();
        assert_eq!(SimilarityOperator::AreaRatio.similarity(&a, &a), 1.0);

        let far = triangle(20.0, 25.0, 30.0).unwrap();
        assert_eq!(SimilarityOperator::AreaRatio.similarity(&a, &far), 0.0);

        let shifted = triangle(5.0, 10.0, 15.0).unwrap();
        let s = SimilarityOperator::AreaRatio.similarity(&a, &shifted);
        // overlap is a triangle of area 1.25 over a union of 8.75
        assert!((s - 1.25 / 8.75).abs() < 1e-12);
    }

    #[test]
    fn test_area_ratio_of_spikes() {
        let a = singleton(3.0, 1.0).unwrap();
        let b = singleton(4.0, 1.0).unwrap();
        assert_eq!(SimilarityOperator::AreaRatio.similarity(&a, &a), 1.0);
        assert_eq!(SimilarityOperator::AreaRatio.similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_possibility_necessity() {
        let wide = triangle(0.0, 5.0, 10.0).unwrap();
        let spike = singleton(5.0, 1.0).unwrap();
        // a crisp point at the peak: possible and necessary
        let op = SimilarityOperator::PossibilityNecessity;
        assert_eq!(op.similarity(&wide, &spike), 1.0);

        let half = singleton(2.5, 1.0).unwrap();
        // possibility 0.5, necessity 0.5 -> discounted
        assert!((op.similarity(&wide, &half) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_custom_is_clamped() {
        let op = SimilarityOperator::custom(|_, _| 2.0);
        let a = triangle(0.0, 1.0, 2.0).unwrap();
        assert_eq!(op.similarity(&a, &a), 1.0);
        assert_eq!(op.name(), "custom");
    }
}
