//! Numeric intervals with open or closed edges, and ordered disjoint
//! collections of them.
//!
//! Alpha-cuts, supports and cores of a [`FuzzySet`](super::FuzzySet) are
//! reported as an [`IntervalVector`].

use std::fmt;

/// Weak / strong selector.
///
/// For alpha-cuts `Weak` means `y >= level` (closed edges) and `Strong`
/// means `y > level` (open edges). For equality `Weak` compares membership
/// within a tolerance and `Strong` compares breakpoints exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    #[default]
    Weak,
    Strong,
}

impl Strength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Strong => "strong",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weak" | "closed" => Some(Strength::Weak),
            "strong" | "open" => Some(Strength::Strong),
            _ => None,
        }
    }

    /// Does `y` pass a cut at `level` under this strength?
    pub fn admits(&self, y: f64, level: f64) -> bool {
        match self {
            Strength::Weak => y >= level,
            Strength::Strong => y > level,
        }
    }
}

/// A range of real numbers; either bound may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    low: f64,
    high: f64,
    low_closed: bool,
    high_closed: bool,
}

impl Interval {
    pub fn new(low: f64, high: f64, low_closed: bool, high_closed: bool) -> Self {
        Self {
            low,
            high,
            // infinite bounds are never attained
            low_closed: low_closed && low.is_finite(),
            high_closed: high_closed && high.is_finite(),
        }
    }

    pub fn closed(low: f64, high: f64) -> Self {
        Self::new(low, high, true, true)
    }

    pub fn open(low: f64, high: f64) -> Self {
        Self::new(low, high, false, false)
    }

    pub fn point(x: f64) -> Self {
        Self::closed(x, x)
    }

    /// The whole real line
    pub fn unbounded() -> Self {
        Self::open(f64::NEG_INFINITY, f64::INFINITY)
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn is_low_closed(&self) -> bool {
        self.low_closed
    }

    pub fn is_high_closed(&self) -> bool {
        self.high_closed
    }

    pub fn is_empty(&self) -> bool {
        self.low > self.high || (self.low == self.high && !(self.low_closed && self.high_closed))
    }

    pub fn length(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.high - self.low
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn contains(&self, x: f64) -> bool {
        let above = if self.low_closed { x >= self.low } else { x > self.low };
        let below = if self.high_closed { x <= self.high } else { x < self.high };
        above && below
    }

    /// Same interval with both finite edges closed
    pub fn closure(&self) -> Self {
        Self::new(self.low, self.high, true, true)
    }

    /// True if the two intervals share at least one point
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.intersect(other).is_some()
    }

    /// True if the union of the two intervals is a single interval
    pub fn connects(&self, other: &Interval) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let (a, b) = if self.low <= other.low { (self, other) } else { (other, self) };
        a.high > b.low || (a.high == b.low && (a.high_closed || b.low_closed))
    }

    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let (low, low_closed) = if self.low > other.low {
            (self.low, self.low_closed)
        } else if other.low > self.low {
            (other.low, other.low_closed)
        } else {
            (self.low, self.low_closed && other.low_closed)
        };
        let (high, high_closed) = if self.high < other.high {
            (self.high, self.high_closed)
        } else if other.high < self.high {
            (other.high, other.high_closed)
        } else {
            (self.high, self.high_closed && other.high_closed)
        };
        let result = Interval::new(low, high, low_closed, high_closed);
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    /// Smallest interval covering both
    pub fn hull(&self, other: &Interval) -> Interval {
        let (low, low_closed) = if self.low < other.low {
            (self.low, self.low_closed)
        } else if other.low < self.low {
            (other.low, other.low_closed)
        } else {
            (self.low, self.low_closed || other.low_closed)
        };
        let (high, high_closed) = if self.high > other.high {
            (self.high, self.high_closed)
        } else if other.high > self.high {
            (other.high, other.high_closed)
        } else {
            (self.high, self.high_closed || other.high_closed)
        };
        Interval::new(low, high, low_closed, high_closed)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}",
            if self.low_closed { '[' } else { '(' },
            self.low,
            self.high,
            if self.high_closed { ']' } else { ')' }
        )
    }
}

/// Ordered sequence of pairwise disjoint, non-touching intervals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalVector {
    intervals: Vec<Interval>,
}

impl IntervalVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an interval, merging it with any neighbour it connects to.
    ///
    /// Only intervals overlapping `[low, high]` of the new one are visited,
    /// so pushing in ascending order is amortised constant time.
    pub fn push(&mut self, interval: Interval) {
        if interval.is_empty() {
            return;
        }
        let mut merged = interval;
        let start = self.intervals.partition_point(|i| i.high < merged.low);
        let end = self.intervals.partition_point(|i| i.low <= merged.high);
        let mut kept = Vec::new();
        for existing in self.intervals.drain(start..end) {
            if existing.connects(&merged) {
                merged = merged.hull(&existing);
            } else {
                kept.push(existing);
            }
        }
        let at = kept.partition_point(|i| i.low < merged.low);
        kept.insert(at, merged);
        self.intervals.splice(start..start, kept);
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn contains(&self, x: f64) -> bool {
        self.intervals.iter().any(|i| i.contains(x))
    }

    pub fn total_length(&self) -> f64 {
        self.intervals.iter().map(Interval::length).sum()
    }

    /// True if any interval of `self` shares a point with one of `other`
    pub fn intersects(&self, other: &IntervalVector) -> bool {
        self.intervals
            .iter()
            .any(|a| other.intervals.iter().any(|b| a.overlaps(b)))
    }

    /// Every interval replaced by its closure, re-merged
    pub fn closure(&self) -> IntervalVector {
        self.intervals.iter().map(Interval::closure).collect()
    }

    /// Restrict every interval to `bounds`
    pub fn clamp_to(&self, bounds: &Interval) -> IntervalVector {
        self.intervals
            .iter()
            .filter_map(|i| i.intersect(bounds))
            .collect()
    }
}

impl FromIterator<Interval> for IntervalVector {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        let mut vector = IntervalVector::new();
        for interval in iter {
            vector.push(interval);
        }
        vector
    }
}

impl<'a> IntoIterator for &'a IntervalVector {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl fmt::Display for IntervalVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.intervals.is_empty() {
            return write!(f, "{{}}");
        }
        let parts: Vec<String> = self.intervals.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join(" U "))
    }
}
