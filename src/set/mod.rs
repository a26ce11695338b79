//! Piecewise-linear fuzzy sets
//!
//! A [`FuzzySet`] is an ordered list of `(x, y)` breakpoints joined by
//! straight lines. Consecutive points may share an `x` value, which encodes
//! a vertical segment (a jump) or, with three points, an isolated spike.
//!
//! # Domain extension
//!
//! Outside its breakpoint range a set is held flat at the `y` of the nearest
//! endpoint. Every membership query, alpha-cut and binary operation uses this
//! rule, so two sets spanning different x-ranges combine without any special
//! casing. A single point is therefore a constant function and a set with no
//! points is zero everywhere.
//!
//! # Membership at a shared x
//!
//! With two points at one `x` the membership there is the larger `y` (jumps
//! are upper semicontinuous). With three or more, the interior points give
//! the value at `x`, while the first and last points are the left and right
//! limits.

mod algebra;
mod builder;
mod defuzzify;
pub mod interval;
mod render;

pub use builder::FuzzySetBuilder;
pub use defuzzify::DefuzzifyMethod;
pub use interval::{Interval, IntervalVector, Strength};

use crate::error::{FuzzyError, FuzzyResult};

/// One breakpoint of a membership function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPoint {
    pub x: f64,
    pub y: f64,
}

impl SetPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for SetPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Left limit, value and right limit of a membership function at one x
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Column {
    pub left: f64,
    pub at: f64,
    pub right: f64,
}

impl Column {
    pub fn flat(y: f64) -> Self {
        Self { left: y, at: y, right: y }
    }

    /// Append the fewest points at `x` that decode back to this column
    pub fn encode_into(&self, x: f64, out: &mut Vec<SetPoint>) {
        let Column { left, at, right } = *self;
        if left == at && at == right {
            out.push(SetPoint::new(x, left));
        } else if at == left.max(right) {
            // two points at one x read as their maximum
            out.push(SetPoint::new(x, left));
            out.push(SetPoint::new(x, right));
        } else {
            out.push(SetPoint::new(x, left));
            out.push(SetPoint::new(x, at));
            out.push(SetPoint::new(x, right));
        }
    }
}

/// A piecewise-linear membership function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuzzySet {
    points: Vec<SetPoint>,
}

impl FuzzySet {
    /// The empty set: membership zero everywhere
    pub fn empty() -> Self {
        Self::default()
    }

    /// A set with the same membership `y` everywhere
    pub fn constant(y: f64) -> FuzzyResult<Self> {
        Self::from_points(vec![SetPoint::new(0.0, y)])
    }

    /// Build a set from breakpoints, validating order and range.
    ///
    /// `x` values must be finite and non-decreasing; `y` values must lie in
    /// `[0, 1]`.
    pub fn from_points(points: Vec<SetPoint>) -> FuzzyResult<Self> {
        validate_points(&points, false)?;
        Ok(Self { points })
    }

    /// Build a set from parallel coordinate slices
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> FuzzyResult<Self> {
        if xs.len() != ys.len() {
            return Err(FuzzyError::new(
                crate::error::ErrorCode::LengthMismatch,
                format!("{} x values but {} y values", xs.len(), ys.len()),
            ));
        }
        Self::from_points(
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| SetPoint::new(x, y))
                .collect(),
        )
    }

    /// Points produced by the algebra are valid by construction
    pub(crate) fn from_points_unchecked(points: Vec<SetPoint>) -> Self {
        debug_assert!(validate_points(&points, false).is_ok());
        Self { points }
    }

    pub fn points(&self) -> &[SetPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// No breakpoints at all
    pub fn has_no_points(&self) -> bool {
        self.points.is_empty()
    }

    /// True iff there are no points or every `y` is exactly zero
    pub fn is_empty(&self) -> bool {
        self.points.iter().all(|p| p.y == 0.0)
    }

    /// True iff some `y` equals exactly 1.0
    pub fn is_normal(&self) -> bool {
        self.points.iter().any(|p| p.y == 1.0)
    }

    /// True iff there are no `x1 < x2 < x3` with `y(x2) < min(y(x1), y(x3))`.
    ///
    /// Breakpoints are read left to right: once the curve strictly falls it
    /// may never strictly rise again.
    pub fn is_convex(&self) -> bool {
        let mut falling = false;
        for pair in self.points.windows(2) {
            if pair[1].y < pair[0].y {
                falling = true;
            } else if pair[1].y > pair[0].y && falling {
                return false;
            }
        }
        true
    }

    /// Smallest and largest breakpoint x
    pub fn x_range(&self) -> Option<(f64, f64)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.x, last.x)),
            _ => None,
        }
    }

    /// Supremum of the membership function
    pub fn max_y(&self) -> f64 {
        self.points.iter().map(|p| p.y).fold(0.0, f64::max)
    }

    /// Infimum of the membership function
    pub fn min_y(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.y).fold(1.0, f64::min)
    }

    /// Degree of membership of `x`
    pub fn membership(&self, x: f64) -> f64 {
        self.column(x).at
    }

    /// Limit of the membership approaching `x` from the left
    pub fn left_limit(&self, x: f64) -> f64 {
        self.column(x).left
    }

    /// Limit of the membership approaching `x` from the right
    pub fn right_limit(&self, x: f64) -> f64 {
        self.column(x).right
    }

    pub(crate) fn column(&self, x: f64) -> Column {
        let points = &self.points;
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Column::flat(0.0),
        };
        if x < first.x {
            return Column::flat(first.y);
        }
        if x > last.x {
            return Column::flat(last.y);
        }

        let lo = points.partition_point(|p| p.x < x);
        let hi = points.partition_point(|p| p.x <= x);
        match hi - lo {
            0 => {
                // strictly inside a segment
                let (a, b) = (points[lo - 1], points[lo]);
                let t = (x - a.x) / (b.x - a.x);
                Column::flat(a.y + t * (b.y - a.y))
            }
            1 => Column::flat(points[lo].y),
            2 => Column {
                left: points[lo].y,
                at: points[lo].y.max(points[lo + 1].y),
                right: points[lo + 1].y,
            },
            _ => Column {
                left: points[lo].y,
                at: points[lo + 1..hi - 1]
                    .iter()
                    .map(|p| p.y)
                    .fold(0.0, f64::max),
                right: points[hi - 1].y,
            },
        }
    }

    /// Sorted distinct breakpoint x values
    pub(crate) fn distinct_xs(&self) -> Vec<f64> {
        let mut xs: Vec<f64> = self.points.iter().map(|p| p.x).collect();
        xs.dedup();
        xs
    }

    /// Area under the polyline between the first and last breakpoints
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| (w[1].x - w[0].x) * (w[0].y + w[1].y) / 2.0)
            .sum()
    }

    /// Any breakpoint strictly outside `[lo, hi]`?
    pub fn extends_beyond(&self, lo: f64, hi: f64) -> bool {
        self.points.iter().any(|p| p.x < lo || p.x > hi)
    }

    /// Alpha-cut: the x values whose membership passes `level`.
    ///
    /// `Weak` keeps `y >= level` and closes edges at crossings; `Strong`
    /// keeps `y > level` and leaves them open. Multi-modal sets produce one
    /// interval per mode. Flat extension applies, so a cut can be unbounded.
    pub fn alpha_cut(&self, strength: Strength, level: f64) -> IntervalVector {
        let mut cut = IntervalVector::new();
        let xs = self.distinct_xs();
        let (first, last) = match (xs.first(), xs.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => {
                if strength.admits(0.0, level) {
                    cut.push(Interval::unbounded());
                }
                return cut;
            }
        };

        if strength.admits(self.left_limit(first), level) {
            cut.push(Interval::open(f64::NEG_INFINITY, first));
        }
        let mut previous: Option<(f64, f64)> = None;
        for &x in &xs {
            let column = self.column(x);
            if let Some((x0, y0)) = previous {
                if let Some(piece) = segment_cut(x0, y0, x, column.left, strength, level) {
                    cut.push(piece);
                }
            }
            if strength.admits(column.at, level) {
                cut.push(Interval::point(x));
            }
            previous = Some((x, column.right));
        }
        if strength.admits(self.right_limit(last), level) {
            cut.push(Interval::open(last, f64::INFINITY));
        }
        cut
    }

    /// Strong alpha-cut at zero
    pub fn support(&self) -> IntervalVector {
        self.alpha_cut(Strength::Strong, 0.0)
    }

    /// Weak alpha-cut at one
    pub fn core(&self) -> IntervalVector {
        self.alpha_cut(Strength::Weak, 1.0)
    }

    /// Compare with another set.
    ///
    /// `Strong` demands identical breakpoints. `Weak` compares left limit,
    /// value and right limit at every breakpoint of either set within
    /// `tolerance`, so redundant points do not matter.
    pub fn equals(&self, other: &FuzzySet, strength: Strength, tolerance: f64) -> bool {
        match strength {
            Strength::Strong => self == other,
            Strength::Weak => {
                let close = |a: f64, b: f64| (a - b).abs() <= tolerance;
                merged_xs(self, other).into_iter().all(|x| {
                    let (a, b) = (self.column(x), other.column(x));
                    close(a.left, b.left) && close(a.at, b.at) && close(a.right, b.right)
                }) && close(self.column(f64::MIN).at, other.column(f64::MIN).at)
            }
        }
    }
}

/// Sorted union of the distinct breakpoint x values of two sets
pub(crate) fn merged_xs(a: &FuzzySet, b: &FuzzySet) -> Vec<f64> {
    let (xa, xb) = (a.distinct_xs(), b.distinct_xs());
    let mut out = Vec::with_capacity(xa.len() + xb.len());
    let (mut i, mut j) = (0, 0);
    while i < xa.len() || j < xb.len() {
        let next = match (xa.get(i), xb.get(j)) {
            (Some(&x), Some(&y)) if x < y => {
                i += 1;
                x
            }
            (Some(&x), Some(&y)) if y < x => {
                j += 1;
                y
            }
            (Some(&x), Some(_)) => {
                i += 1;
                j += 1;
                x
            }
            (Some(&x), None) => {
                i += 1;
                x
            }
            (None, Some(&y)) => {
                j += 1;
                y
            }
            (None, None) => break,
        };
        out.push(next);
    }
    out
}

/// Part of the open segment `(x0, x1)` whose linear membership passes the cut
fn segment_cut(x0: f64, y0: f64, x1: f64, y1: f64, strength: Strength, level: f64) -> Option<Interval> {
    if x1 <= x0 {
        return None;
    }
    if y0 == y1 {
        return strength
            .admits(y0, level)
            .then(|| Interval::open(x0, x1));
    }
    let xc = x0 + (level - y0) / (y1 - y0) * (x1 - x0);
    let closed = strength == Strength::Weak;
    if y1 > y0 {
        // rising: passes to the right of the crossing
        if xc <= x0 {
            Some(Interval::open(x0, x1))
        } else if xc >= x1 {
            None
        } else {
            Some(Interval::new(xc, x1, closed, false))
        }
    } else if xc >= x1 {
        Some(Interval::open(x0, x1))
    } else if xc <= x0 {
        None
    } else {
        Some(Interval::new(x0, xc, false, closed))
    }
}

fn validate_points(points: &[SetPoint], strict: bool) -> FuzzyResult<()> {
    for (i, p) in points.iter().enumerate() {
        if !p.x.is_finite() || !p.y.is_finite() {
            crate::fuzzy_bail!(
                crate::error::ErrorCode::NonFiniteValue,
                "point {} has a non-finite coordinate ({}, {})",
                i,
                p.x,
                p.y
            );
        }
        if !(0.0..=1.0).contains(&p.y) {
            return Err(FuzzyError::membership_out_of_range(i, p.y));
        }
        if i > 0 {
            let previous = points[i - 1].x;
            if p.x < previous || (strict && p.x == previous) {
                return Err(FuzzyError::unordered(i, previous, p.x));
            }
        }
    }
    Ok(())
}

/// Validation used for raw coordinate input, where x must strictly increase
pub(crate) fn validate_strict(points: &[SetPoint]) -> FuzzyResult<()> {
    validate_points(points, true)
}
