//! Defuzzification: reducing a membership function to one crisp number.
//!
//! Integrals run over the breakpoint range; flat extension outside it is
//! not integrated. Every method fails with `NoDefuzzifiedValue` when the
//! set is empty.

use serde::{Deserialize, Serialize};

use super::FuzzySet;
use crate::error::{FuzzyError, FuzzyResult};

/// Supported defuzzification methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzifyMethod {
    /// Centroid of the area under the curve
    #[default]
    Moment,
    /// Point splitting the area in two equal halves
    CenterOfArea,
    /// Midpoint of the first highest plateau
    Maximum,
    /// Height-weighted mean of the local peaks
    WeightedAverage,
}

impl DefuzzifyMethod {
    pub const ALL: [DefuzzifyMethod; 4] = [
        DefuzzifyMethod::Moment,
        DefuzzifyMethod::CenterOfArea,
        DefuzzifyMethod::Maximum,
        DefuzzifyMethod::WeightedAverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefuzzifyMethod::Moment => "moment",
            DefuzzifyMethod::CenterOfArea => "center_of_area",
            DefuzzifyMethod::Maximum => "maximum",
            DefuzzifyMethod::WeightedAverage => "weighted_average",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moment" | "centroid" => Some(DefuzzifyMethod::Moment),
            "center_of_area" | "coa" | "bisector" => Some(DefuzzifyMethod::CenterOfArea),
            "maximum" | "max" => Some(DefuzzifyMethod::Maximum),
            "weighted_average" | "wavg" => Some(DefuzzifyMethod::WeightedAverage),
            _ => None,
        }
    }
}

impl FuzzySet {
    pub fn defuzzify(&self, method: DefuzzifyMethod) -> FuzzyResult<f64> {
        match method {
            DefuzzifyMethod::Moment => self.moment_defuzzify(),
            DefuzzifyMethod::CenterOfArea => self.center_of_area_defuzzify(),
            DefuzzifyMethod::Maximum => self.maximum_defuzzify(),
            DefuzzifyMethod::WeightedAverage => self.weighted_average_defuzzify(),
        }
    }

    /// Centroid, integrating each trapezoid exactly
    pub fn moment_defuzzify(&self) -> FuzzyResult<f64> {
        self.ensure_defuzzifiable(DefuzzifyMethod::Moment)?;
        let area = self.area();
        if area <= 0.0 {
            return Ok(self.spike_mean());
        }
        let moment: f64 = self
            .points
            .windows(2)
            .map(|w| {
                let (a, b) = (w[0], w[1]);
                (b.x - a.x) * (a.x * (2.0 * a.y + b.y) + b.x * (a.y + 2.0 * b.y)) / 6.0
            })
            .sum();
        Ok(moment / area)
    }

    /// First x at which the accumulated area reaches half the total
    pub fn center_of_area_defuzzify(&self) -> FuzzyResult<f64> {
        self.ensure_defuzzifiable(DefuzzifyMethod::CenterOfArea)?;
        let area = self.area();
        if area <= 0.0 {
            return Ok(self.spike_mean());
        }
        let half = area / 2.0;
        let mut accumulated = 0.0;
        for w in self.points.windows(2) {
            let (a, b) = (w[0], w[1]);
            let width = b.x - a.x;
            if width <= 0.0 {
                continue;
            }
            let piece = width * (a.y + b.y) / 2.0;
            if accumulated + piece >= half {
                let remaining = half - accumulated;
                if remaining <= 0.0 {
                    return Ok(a.x);
                }
                // solve a.y*t + slope*t^2/2 = remaining for t in [0, width]
                let slope = (b.y - a.y) / width;
                let root = (a.y * a.y + 2.0 * slope * remaining).max(0.0).sqrt();
                let denominator = a.y + root;
                let t = if denominator > 0.0 {
                    2.0 * remaining / denominator
                } else {
                    0.0
                };
                return Ok(a.x + t.clamp(0.0, width));
            }
            accumulated += piece;
        }
        // rounding left the target just out of reach
        Ok(self.points.last().map(|p| p.x).unwrap_or_default())
    }

    /// Midpoint of the first run of points at the maximum membership
    pub fn maximum_defuzzify(&self) -> FuzzyResult<f64> {
        self.ensure_defuzzifiable(DefuzzifyMethod::Maximum)?;
        let max = self.max_y();
        let start = self
            .points
            .iter()
            .position(|p| p.y == max)
            .ok_or_else(|| FuzzyError::internal("maximum not found among points"))?;
        let end = self.points[start..]
            .iter()
            .take_while(|p| p.y == max)
            .count()
            + start
            - 1;
        Ok((self.points[start].x + self.points[end].x) / 2.0)
    }

    /// Height-weighted mean of the midpoints of every local peak.
    ///
    /// Runs of equal membership form plateaus; a plateau is a peak when it
    /// is higher than each neighbouring plateau (a missing neighbour at
    /// either end does not disqualify it).
    pub fn weighted_average_defuzzify(&self) -> FuzzyResult<f64> {
        self.ensure_defuzzifiable(DefuzzifyMethod::WeightedAverage)?;
        let mut plateaus: Vec<(f64, f64, f64)> = Vec::new();
        for p in &self.points {
            match plateaus.last_mut() {
                Some((y, _, end)) if *y == p.y => *end = p.x,
                _ => plateaus.push((p.y, p.x, p.x)),
            }
        }

        let (mut weighted, mut total) = (0.0, 0.0);
        for (i, &(y, start, end)) in plateaus.iter().enumerate() {
            let above_previous = i == 0 || plateaus[i - 1].0 < y;
            let above_next = plateaus.get(i + 1).map_or(true, |next| next.0 < y);
            if y > 0.0 && above_previous && above_next {
                weighted += y * (start + end) / 2.0;
                total += y;
            }
        }
        if total == 0.0 {
            return Err(FuzzyError::no_defuzzified_value(
                DefuzzifyMethod::WeightedAverage.as_str(),
            ));
        }
        Ok(weighted / total)
    }

    fn ensure_defuzzifiable(&self, method: DefuzzifyMethod) -> FuzzyResult<()> {
        if self.max_y() == 0.0 {
            return Err(FuzzyError::no_defuzzified_value(method.as_str()));
        }
        Ok(())
    }

    /// Height-weighted mean of the breakpoint columns with positive membership
    fn spike_mean(&self) -> f64 {
        let (mut weighted, mut total) = (0.0, 0.0);
        for x in self.distinct_xs() {
            let at = self.column(x).at;
            if at > 0.0 {
                weighted += at * x;
                total += at;
            }
        }
        if total > 0.0 {
            weighted / total
        } else {
            0.0
        }
    }
}
