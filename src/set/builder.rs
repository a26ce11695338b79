//! Point-by-point construction of fuzzy sets

use super::{FuzzySet, SetPoint};
use crate::error::FuzzyResult;

/// Mutable staging area for breakpoints; [`build`](Self::build) validates
/// and freezes it into an immutable [`FuzzySet`].
///
/// ```rust,ignore
/// let set = FuzzySetBuilder::new()
///     .point(0.0, 0.0)
///     .point(5.0, 1.0)
///     .point(10.0, 0.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FuzzySetBuilder {
    points: Vec<SetPoint>,
}

impl FuzzySetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Continue editing a copy of an existing set
    pub fn from_set(set: &FuzzySet) -> Self {
        Self {
            points: set.points().to_vec(),
        }
    }

    /// Append a point (chained form)
    pub fn point(mut self, x: f64, y: f64) -> Self {
        self.points.push(SetPoint::new(x, y));
        self
    }

    /// Append a point
    pub fn push(&mut self, x: f64, y: f64) -> &mut Self {
        self.points.push(SetPoint::new(x, y));
        self
    }

    /// Insert a point at its x position, after any points sharing that x
    pub fn insert(&mut self, x: f64, y: f64) -> &mut Self {
        let at = self.points.partition_point(|p| p.x <= x);
        self.points.insert(at, SetPoint::new(x, y));
        self
    }

    /// Remove every point at exactly `x`; returns how many were removed
    pub fn remove_at(&mut self, x: f64) -> usize {
        let before = self.points.len();
        self.points.retain(|p| p.x != x);
        before - self.points.len()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Validate and freeze
    pub fn build(self) -> FuzzyResult<FuzzySet> {
        FuzzySet::from_points(self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_chained_build() {
        let set = FuzzySetBuilder::new()
            .point(0.0, 0.0)
            .point(5.0, 1.0)
            .point(10.0, 0.0)
            .build()
            .unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.membership(5.0), 1.0);
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut builder = FuzzySetBuilder::new();
        builder.insert(10.0, 0.0).insert(0.0, 0.0).insert(5.0, 1.0);
        builder.insert(5.0, 0.5);
        let set = builder.build().unwrap();
        let xs: Vec<f64> = set.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 5.0, 10.0]);
        assert_eq!(set.left_limit(5.0), 1.0);
        assert_eq!(set.right_limit(5.0), 0.5);
    }

    #[test]
    fn test_build_rejects_bad_membership() {
        let err = FuzzySetBuilder::new().point(0.0, -0.1).build().unwrap_err();
        assert_eq!(err.code, ErrorCode::MembershipOutOfRange);

        let mut builder = FuzzySetBuilder::new();
        builder.push(1.0, 0.0).push(0.0, 0.0);
        assert_eq!(builder.build().unwrap_err().code, ErrorCode::UnorderedBreakpoints);
    }

    #[test]
    fn test_edit_existing_set() {
        let base = FuzzySetBuilder::new()
            .point(0.0, 0.0)
            .point(10.0, 1.0)
            .build()
            .unwrap();
        let mut builder = FuzzySetBuilder::from_set(&base);
        assert_eq!(builder.remove_at(10.0), 1);
        builder.insert(4.0, 1.0);
        let edited = builder.build().unwrap();
        assert_eq!(edited.membership(2.0), 0.5);
        // the original is untouched
        assert_eq!(base.len(), 2);
    }
}
