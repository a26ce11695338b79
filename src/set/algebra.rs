//! Pointwise and horizontal operations on fuzzy sets.
//!
//! Binary operations walk the merged breakpoints of both operands and emit
//! one encoded column per x. `union` and `intersection` also emit a point
//! wherever the two curves cross strictly inside a segment, so the result
//! is exact. `fuzzy_sum` is not piecewise linear in general; between aligned
//! breakpoints it takes the chord.

use tracing::trace;

use super::{merged_xs, Column, FuzzySet, SetPoint};
use crate::error::{ErrorCode, FuzzyError, FuzzyResult};

/// One side of a binary combination
#[derive(Clone, Copy)]
enum Operand<'a> {
    Set(&'a FuzzySet),
    Level(f64),
}

impl Operand<'_> {
    fn column(&self, x: f64) -> Column {
        match self {
            Operand::Set(set) => set.column(x),
            Operand::Level(level) => Column::flat(*level),
        }
    }

    fn xs(&self) -> Vec<f64> {
        match self {
            Operand::Set(set) => set.distinct_xs(),
            Operand::Level(_) => Vec::new(),
        }
    }
}

fn unit(y: f64) -> f64 {
    if y.is_nan() {
        0.0
    } else {
        y.clamp(0.0, 1.0)
    }
}

fn combine(a: Operand<'_>, b: Operand<'_>, op: fn(f64, f64) -> f64, crossings: bool) -> FuzzySet {
    let xs = match (a, b) {
        (Operand::Set(left), Operand::Set(right)) => merged_xs(left, right),
        (Operand::Set(_), Operand::Level(_)) => a.xs(),
        (Operand::Level(_), _) => b.xs(),
    };
    if xs.is_empty() {
        let y = unit(op(a.column(0.0).at, b.column(0.0).at));
        return if y == 0.0 {
            FuzzySet::empty()
        } else {
            FuzzySet::from_points_unchecked(vec![SetPoint::new(0.0, y)])
        };
    }

    let mut out = Vec::with_capacity(xs.len() * 2);
    let mut previous: Option<(f64, f64, f64)> = None;
    for x in xs {
        let (ca, cb) = (a.column(x), b.column(x));
        if crossings {
            if let Some((x0, ra, rb)) = previous {
                if let Some(point) = crossing(x0, ra, rb, x, ca.left, cb.left) {
                    out.push(point);
                }
            }
        }
        let column = Column {
            left: unit(op(ca.left, cb.left)),
            at: unit(op(ca.at, cb.at)),
            right: unit(op(ca.right, cb.right)),
        };
        column.encode_into(x, &mut out);
        previous = Some((x, ca.right, cb.right));
    }
    FuzzySet::from_points_unchecked(out)
}

/// Point where two lines over `(x0, x1)` cross strictly inside the segment
fn crossing(x0: f64, a0: f64, b0: f64, x1: f64, a1: f64, b1: f64) -> Option<SetPoint> {
    let d0 = a0 - b0;
    let d1 = a1 - b1;
    if !((d0 > 0.0 && d1 < 0.0) || (d0 < 0.0 && d1 > 0.0)) {
        return None;
    }
    let t = d0 / (d0 - d1);
    let x = x0 + t * (x1 - x0);
    if x <= x0 || x >= x1 {
        return None;
    }
    // average of both lines keeps the result symmetric in its operands
    let ya = a0 + t * (a1 - a0);
    let yb = b0 + t * (b1 - b0);
    Some(SetPoint::new(x, unit((ya + yb) / 2.0)))
}

fn check_unit(name: &str, value: f64) -> FuzzyResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(FuzzyError::new(
            ErrorCode::MembershipOutOfRange,
            format!("{} {} is outside [0, 1]", name, value),
        ));
    }
    Ok(())
}

impl FuzzySet {
    /// Pointwise maximum
    pub fn union(&self, other: &FuzzySet) -> FuzzySet {
        combine(Operand::Set(self), Operand::Set(other), f64::max, true)
    }

    /// Pointwise minimum
    pub fn intersection(&self, other: &FuzzySet) -> FuzzySet {
        combine(Operand::Set(self), Operand::Set(other), f64::min, true)
    }

    /// Probabilistic sum `a + b - a*b`, linear between aligned breakpoints
    pub fn fuzzy_sum(&self, other: &FuzzySet) -> FuzzySet {
        combine(
            Operand::Set(self),
            Operand::Set(other),
            |a, b| a + b - a * b,
            false,
        )
    }

    /// `1 - y` at every breakpoint
    pub fn complement(&self) -> FuzzySet {
        if self.points.is_empty() {
            return FuzzySet::from_points_unchecked(vec![SetPoint::new(0.0, 1.0)]);
        }
        let points = self
            .points
            .iter()
            .map(|p| SetPoint::new(p.x, 1.0 - p.y))
            .collect();
        FuzzySet::from_points_unchecked(points)
    }

    /// `min(y, level)` with crossing points inserted
    pub fn horizontal_intersection(&self, level: f64) -> FuzzyResult<FuzzySet> {
        check_unit("level", level)?;
        Ok(combine(Operand::Set(self), Operand::Level(level), f64::min, true))
    }

    /// `max(y, level)` with crossing points inserted
    pub fn horizontal_union(&self, level: f64) -> FuzzyResult<FuzzySet> {
        check_unit("level", level)?;
        Ok(combine(Operand::Set(self), Operand::Level(level), f64::max, true))
    }

    /// Multiply every membership value by `factor`
    pub fn scale(&self, factor: f64) -> FuzzyResult<FuzzySet> {
        check_unit("scale factor", factor)?;
        let points = self
            .points
            .iter()
            .map(|p| SetPoint::new(p.x, p.y * factor))
            .collect();
        Ok(FuzzySet::from_points_unchecked(points))
    }

    /// Scale so the highest membership becomes 1; empty sets are returned unchanged
    pub fn normalize(&self) -> FuzzySet {
        let max = self.max_y();
        if max == 0.0 || max == 1.0 {
            return self.clone();
        }
        let points = self
            .points
            .iter()
            .map(|p| SetPoint::new(p.x, unit(p.y / max)))
            .collect();
        FuzzySet::from_points_unchecked(points)
    }

    /// Apply a membership transform.
    ///
    /// Every sloped segment is first split into `resolution` pieces so a
    /// nonlinear `f` is followed closely; flat and vertical segments are
    /// mapped exactly.
    pub fn map_membership<F>(&self, f: F, resolution: usize) -> FuzzySet
    where
        F: Fn(f64) -> f64,
    {
        let mut out = Vec::with_capacity(self.points.len() * resolution.max(1));
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                let q = self.points[i - 1];
                if p.x > q.x && p.y != q.y {
                    for k in 1..resolution {
                        let t = k as f64 / resolution as f64;
                        let x = q.x + t * (p.x - q.x);
                        let y = q.y + t * (p.y - q.y);
                        out.push(SetPoint::new(x, unit(f(y))));
                    }
                }
            }
            out.push(SetPoint::new(p.x, unit(f(p.y))));
        }
        trace!(
            before = self.points.len(),
            after = out.len(),
            "mapped membership function"
        );
        FuzzySet::from_points_unchecked(out)
    }

    /// Restrict the set to `[lo, hi]`.
    ///
    /// The result always has explicit breakpoints at `lo` and `hi`; beyond
    /// them flat extension repeats the membership found there.
    pub fn clip(&self, lo: f64, hi: f64) -> FuzzyResult<FuzzySet> {
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(FuzzyError::new(
                ErrorCode::InvalidBounds,
                format!("cannot clip to [{}, {}]", lo, hi),
            ));
        }
        let mut out = Vec::with_capacity(self.points.len() + 4);
        if lo == hi {
            out.push(SetPoint::new(lo, self.membership(lo)));
            return Ok(FuzzySet::from_points_unchecked(out));
        }
        let start = self.column(lo);
        Column {
            left: start.at,
            ..start
        }
        .encode_into(lo, &mut out);
        out.extend(self.points.iter().filter(|p| p.x > lo && p.x < hi).copied());
        let end = self.column(hi);
        Column {
            right: end.at,
            ..end
        }
        .encode_into(hi, &mut out);
        Ok(FuzzySet::from_points_unchecked(out))
    }

    /// Drop redundant breakpoints without changing the membership function
    pub fn simplify(&self) -> FuzzySet {
        let mut canonical = Vec::with_capacity(self.points.len());
        for x in self.distinct_xs() {
            self.column(x).encode_into(x, &mut canonical);
        }

        let mut out: Vec<SetPoint> = Vec::with_capacity(canonical.len());
        for (i, p) in canonical.iter().enumerate() {
            let next = canonical.get(i + 1);
            let removable = match (out.last(), next) {
                (Some(prev), Some(next)) => {
                    prev.x < p.x && p.x < next.x && collinear(prev, p, next)
                }
                _ => false,
            };
            if !removable {
                out.push(*p);
            }
        }
        FuzzySet::from_points_unchecked(out)
    }

    /// Highest membership of the pointwise minimum
    pub fn maximum_of_intersection(&self, other: &FuzzySet) -> f64 {
        self.intersection(other).max_y()
    }

    /// True iff the closed supports of both sets are disjoint.
    ///
    /// Sets touching at a single zero-valued point are not disjoint here.
    pub fn non_intersection_test(&self, other: &FuzzySet) -> bool {
        !self
            .support()
            .closure()
            .intersects(&other.support().closure())
    }

    /// True iff the pointwise minimum is zero everywhere
    pub fn no_intersection_test(&self, other: &FuzzySet) -> bool {
        self.maximum_of_intersection(other) == 0.0
    }
}

fn collinear(a: &SetPoint, b: &SetPoint, c: &SetPoint) -> bool {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    cross.abs() <= 1e-12 * (c.x - a.x).abs().max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::Strength;

    fn set(points: &[(f64, f64)]) -> FuzzySet {
        FuzzySet::from_points(points.iter().map(|&p| p.into()).collect()).unwrap()
    }

    fn xy(s: &FuzzySet) -> Vec<(f64, f64)> {
        s.points().iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_union_inserts_crossing() {
        let a = set(&[(0.0, 0.0), (10.0, 1.0)]);
        let b = set(&[(0.0, 1.0), (10.0, 0.0)]);
        let u = a.union(&b);
        assert_eq!(xy(&u), vec![(0.0, 1.0), (5.0, 0.5), (10.0, 1.0)]);
        let i = a.intersection(&b);
        assert_eq!(xy(&i), vec![(0.0, 0.0), (5.0, 0.5), (10.0, 0.0)]);
    }

    #[test]
    fn test_binary_ops_are_commutative() {
        let a = set(&[(0.0, 0.0), (3.0, 0.7), (7.0, 0.1), (9.0, 0.0)]);
        let b = set(&[(1.0, 0.0), (4.0, 1.0), (8.0, 0.3)]);
        assert_eq!(a.union(&b), b.union(&a));
        assert_eq!(a.intersection(&b), b.intersection(&a));
        assert_eq!(a.fuzzy_sum(&b), b.fuzzy_sum(&a));
    }

    #[test]
    fn test_union_matches_pointwise_max_across_domains() {
        // different x ranges: flat extension applies
        let a = set(&[(0.0, 0.0), (5.0, 1.0), (10.0, 0.0)]);
        let b = set(&[(20.0, 0.4), (30.0, 0.9)]);
        let u = a.union(&b);
        let i = a.intersection(&b);
        for k in 0..=70 {
            let x = -5.0 + k as f64 * 0.5;
            let (ma, mb) = (a.membership(x), b.membership(x));
            assert!((u.membership(x) - ma.max(mb)).abs() < 1e-9, "x = {}", x);
            assert!((i.membership(x) - ma.min(mb)).abs() < 1e-9, "x = {}", x);
        }
    }

    #[test]
    fn test_vertical_segments_survive_union() {
        let step = set(&[(0.0, 0.0), (5.0, 0.0), (5.0, 1.0), (10.0, 1.0)]);
        let half = set(&[(0.0, 0.5), (10.0, 0.5)]);
        let u = step.union(&half);
        assert_eq!(u.left_limit(5.0), 0.5);
        assert_eq!(u.right_limit(5.0), 1.0);
        assert_eq!(u.membership(4.0), 0.5);
    }

    #[test]
    fn test_complement_involution() {
        let s = set(&[(0.0, 0.0), (1.0, 0.25), (2.0, 0.75), (2.0, 1.0), (3.0, 0.5)]);
        assert_eq!(s.complement().complement(), s);
        assert_eq!(s.complement().membership(1.0), 0.75);
    }

    #[test]
    fn test_horizontal_intersection() {
        let tri = set(&[(0.0, 0.0), (10.0, 1.0), (20.0, 0.0)]);
        let clipped = tri.horizontal_intersection(0.5).unwrap();
        assert_eq!(
            xy(&clipped),
            vec![(0.0, 0.0), (5.0, 0.5), (10.0, 0.5), (15.0, 0.5), (20.0, 0.0)]
        );
        assert_eq!(clipped.max_y(), 0.5);
        assert!(tri.horizontal_union(1.5).is_err());
    }

    #[test]
    fn test_complement_of_empty_is_full() {
        let full = FuzzySet::empty().complement();
        assert_eq!(full.membership(0.0), 1.0);
        assert_eq!(full.membership(-1e6), 1.0);
        assert_eq!(full.membership(1e6), 1.0);
        assert!(full.is_normal());
    }

    #[test]
    fn test_horizontal_union_of_empty_is_constant() {
        let u = FuzzySet::empty().horizontal_union(0.3).unwrap();
        assert_eq!(u.membership(-1e6), 0.3);
        assert_eq!(u.membership(1e6), 0.3);
    }

    #[test]
    fn test_scale_and_normalize() {
        let tri = set(&[(0.0, 0.0), (1.0, 0.5), (2.0, 0.0)]);
        assert_eq!(tri.scale(0.5).unwrap().max_y(), 0.25);
        assert!(tri.scale(2.0).is_err());
        assert_eq!(tri.normalize().max_y(), 1.0);
        assert!(FuzzySet::empty().normalize().is_empty());
    }

    #[test]
    fn test_fuzzy_sum() {
        let a = set(&[(0.0, 0.5), (10.0, 0.5)]);
        let s = a.fuzzy_sum(&a);
        assert!((s.membership(5.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_map_membership_subdivides() {
        let ramp = set(&[(0.0, 0.0), (4.0, 1.0)]);
        let squared = ramp.map_membership(|y| y * y, 4);
        assert_eq!(squared.len(), 5);
        assert!((squared.membership(2.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_clip_adds_explicit_bounds() {
        let tri = set(&[(0.0, 0.0), (10.0, 1.0), (20.0, 0.0)]);
        let c = tri.clip(5.0, 12.0).unwrap();
        let xs: Vec<f64> = c.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![5.0, 10.0, 12.0]);
        assert!((c.membership(12.0) - 0.8).abs() < 1e-12);
        assert_eq!(c.membership(20.0), c.membership(12.0));
        assert!(!c.extends_beyond(5.0, 12.0));

        let e = FuzzySet::empty().clip(0.0, 100.0).unwrap();
        assert_eq!(xy(&e), vec![(0.0, 0.0), (100.0, 0.0)]);
        assert!(tri.clip(3.0, 1.0).is_err());
    }

    #[test]
    fn test_simplify_keeps_function() {
        let s = set(&[(0.0, 0.0), (1.0, 0.5), (2.0, 1.0), (2.0, 1.0), (3.0, 1.0)]);
        let simple = s.simplify();
        assert_eq!(xy(&simple), vec![(0.0, 0.0), (2.0, 1.0), (3.0, 1.0)]);
        assert!(simple.equals(&s, Strength::Weak, 1e-12));
    }

    #[test]
    fn test_intersection_tests_differ_on_touching_supports() {
        let left = set(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]);
        let right = set(&[(2.0, 0.0), (3.0, 1.0), (4.0, 0.0)]);
        assert!(!left.non_intersection_test(&right));
        assert!(left.no_intersection_test(&right));

        let far = set(&[(5.0, 0.0), (6.0, 1.0), (7.0, 0.0)]);
        assert!(left.non_intersection_test(&far));
        assert!(left.no_intersection_test(&far));

        let overlapping = set(&[(1.0, 0.0), (2.0, 1.0), (3.0, 0.0)]);
        assert!(!left.no_intersection_test(&overlapping));
        assert!((left.maximum_of_intersection(&overlapping) - 0.5).abs() < 1e-12);
    }
}
