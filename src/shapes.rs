//! Standard membership function shapes
//!
//! Every shape is turned into a piecewise-linear [`FuzzySet`]. Curved
//! shapes (S, Z, PI, Gaussian) are sampled with a caller-chosen number of
//! points per curved flank; straight shapes are exact.

use std::fmt;

use crate::error::{ErrorCode, FuzzyError, FuzzyResult};
use crate::set::{FuzzySet, SetPoint};

/// Sample count used for curved flanks when nothing else is configured
pub const DEFAULT_CURVE_POINTS: usize = 9;

/// Gaussian tails are cut this many standard deviations from the mean
const GAUSSIAN_SPAN: f64 = 4.0;

/// Membership function shape types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Triangular: (left, peak, right)
    Triangle(f64, f64, f64),
    /// Trapezoidal: (left, left_top, right_top, right)
    Trapezoid(f64, f64, f64, f64),
    /// S-shaped rise from 0 at `left` to 1 at `right`
    S(f64, f64),
    /// Z-shaped fall from 1 at `left` to 0 at `right`
    Z(f64, f64),
    /// Bell built from an S and a Z: (center, width)
    Pi(f64, f64),
    /// Straight fall from 1 at `left` to 0 at `right`
    LeftLinear(f64, f64),
    /// Straight rise from 0 at `left` to 1 at `right`
    RightLinear(f64, f64),
    /// Gaussian: (mean, sigma)
    Gaussian(f64, f64),
    /// 1 left of the mean, Gaussian fall to the right: (mean, sigma)
    LeftGaussian(f64, f64),
    /// Gaussian rise to 1 at the mean, 1 to the right: (mean, sigma)
    RightGaussian(f64, f64),
    /// 1 on `[left, right]` with vertical edges
    Rectangle(f64, f64),
    /// Vertical spike of height 1
    Singleton(f64),
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Triangle(..) => "triangle",
            Shape::Trapezoid(..) => "trapezoid",
            Shape::S(..) => "s",
            Shape::Z(..) => "z",
            Shape::Pi(..) => "pi",
            Shape::LeftLinear(..) => "left_linear",
            Shape::RightLinear(..) => "right_linear",
            Shape::Gaussian(..) => "gaussian",
            Shape::LeftGaussian(..) => "left_gaussian",
            Shape::RightGaussian(..) => "right_gaussian",
            Shape::Rectangle(..) => "rectangle",
            Shape::Singleton(..) => "singleton",
        }
    }

    fn params(&self) -> Vec<f64> {
        match *self {
            Shape::Triangle(a, b, c) => vec![a, b, c],
            Shape::Trapezoid(a, b, c, d) => vec![a, b, c, d],
            Shape::S(a, b)
            | Shape::Z(a, b)
            | Shape::Pi(a, b)
            | Shape::LeftLinear(a, b)
            | Shape::RightLinear(a, b)
            | Shape::Gaussian(a, b)
            | Shape::LeftGaussian(a, b)
            | Shape::RightGaussian(a, b)
            | Shape::Rectangle(a, b) => vec![a, b],
            Shape::Singleton(x) => vec![x],
        }
    }

    /// Build a shape from its name and positional parameters
    pub fn parse(name: &str, args: &[f64]) -> FuzzyResult<Shape> {
        let expect = |n: usize| -> FuzzyResult<()> {
            if args.len() != n {
                return Err(FuzzyError::new(
                    ErrorCode::LengthMismatch,
                    format!("shape '{}' takes {} parameters, got {}", name, n, args.len()),
                ));
            }
            Ok(())
        };
        let shape = match name.to_lowercase().as_str() {
            "triangle" | "tri" => {
                expect(3)?;
                Shape::Triangle(args[0], args[1], args[2])
            }
            "trapezoid" | "trap" => {
                expect(4)?;
                Shape::Trapezoid(args[0], args[1], args[2], args[3])
            }
            "singleton" => {
                expect(1)?;
                Shape::Singleton(args[0])
            }
            other => {
                expect(2)?;
                let (a, b) = (args[0], args[1]);
                match other {
                    "s" => Shape::S(a, b),
                    "z" => Shape::Z(a, b),
                    "pi" => Shape::Pi(a, b),
                    "left_linear" | "left" => Shape::LeftLinear(a, b),
                    "right_linear" | "right" => Shape::RightLinear(a, b),
                    "gaussian" | "gauss" => Shape::Gaussian(a, b),
                    "left_gaussian" => Shape::LeftGaussian(a, b),
                    "right_gaussian" => Shape::RightGaussian(a, b),
                    "rectangle" | "rect" => Shape::Rectangle(a, b),
                    _ => {
                        return Err(FuzzyError::validation(format!("unknown shape '{}'", name))
                            .with_hint("known shapes: triangle, trapezoid, s, z, pi, left_linear, right_linear, gaussian, left_gaussian, right_gaussian, rectangle, singleton"))
                    }
                }
            }
        };
        Ok(shape)
    }

    /// Sample this shape into a fuzzy set, using `points` samples per curved flank
    pub fn to_set(&self, points: usize) -> FuzzyResult<FuzzySet> {
        if self.params().iter().any(|p| !p.is_finite()) {
            return Err(FuzzyError::new(
                ErrorCode::NonFiniteValue,
                format!("{} has a non-finite parameter", self),
            ));
        }
        match *self {
            Shape::Triangle(a, b, c) => triangle(a, b, c),
            Shape::Trapezoid(a, b, c, d) => trapezoid(a, b, c, d),
            Shape::S(a, b) => s_curve(a, b, points),
            Shape::Z(a, b) => z_curve(a, b, points),
            Shape::Pi(center, width) => pi_curve(center, width, points),
            Shape::LeftLinear(a, b) => left_linear(a, b),
            Shape::RightLinear(a, b) => right_linear(a, b),
            Shape::Gaussian(mean, sigma) => gaussian(mean, sigma, points),
            Shape::LeftGaussian(mean, sigma) => left_gaussian(mean, sigma, points),
            Shape::RightGaussian(mean, sigma) => right_gaussian(mean, sigma, points),
            Shape::Rectangle(a, b) => rectangle(a, b),
            Shape::Singleton(x) => singleton(x, 1.0),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params().iter().map(|p| p.to_string()).collect();
        write!(f, "{}({})", self.name(), params.join(", "))
    }
}

fn ordered(shape: &str, xs: &[f64]) -> FuzzyResult<()> {
    if xs.windows(2).any(|w| w[1] < w[0]) {
        let joined: Vec<String> = xs.iter().map(|x| x.to_string()).collect();
        crate::fuzzy_bail!(
            ErrorCode::UnorderedBreakpoints,
            "{} parameters must be non-decreasing: {}",
            shape,
            joined.join(", ")
        );
    }
    Ok(())
}

fn positive_width(shape: &str, width: f64) -> FuzzyResult<()> {
    crate::fuzzy_ensure!(
        width > 0.0,
        ErrorCode::ValidationError,
        "{} needs a positive width, got {}",
        shape,
        width
    );
    Ok(())
}

fn curve_points(points: usize) -> FuzzyResult<()> {
    crate::fuzzy_ensure!(
        points >= 2,
        ErrorCode::ValidationError,
        "curved shapes need at least 2 sample points, got {}",
        points
    );
    Ok(())
}

fn from_pairs(pairs: Vec<(f64, f64)>) -> FuzzyResult<FuzzySet> {
    FuzzySet::from_points(pairs.into_iter().map(SetPoint::from).collect())
}

/// Sample `f` at `points` evenly spaced x in `[a, b]`
fn sample<F: Fn(f64) -> f64>(a: f64, b: f64, points: usize, f: F) -> Vec<(f64, f64)> {
    let step = (b - a) / (points - 1) as f64;
    (0..points)
        .map(|i| {
            // pin the last sample to b exactly
            let x = if i == points - 1 { b } else { a + step * i as f64 };
            (x, f(x).clamp(0.0, 1.0))
        })
        .collect()
}

/// 0 at `a`, 1 at `b`, 0 at `c`
pub fn triangle(a: f64, b: f64, c: f64) -> FuzzyResult<FuzzySet> {
    ordered("triangle", &[a, b, c])?;
    from_pairs(vec![(a, 0.0), (b, 1.0), (c, 0.0)])
}

/// 0 at `a`, 1 on `[b, c]`, 0 at `d`
pub fn trapezoid(a: f64, b: f64, c: f64, d: f64) -> FuzzyResult<FuzzySet> {
    ordered("trapezoid", &[a, b, c, d])?;
    from_pairs(vec![(a, 0.0), (b, 1.0), (c, 1.0), (d, 0.0)])
}

fn s_value(a: f64, b: f64, x: f64) -> f64 {
    if x <= a {
        0.0
    } else if x >= b {
        1.0
    } else if x <= (a + b) / 2.0 {
        2.0 * ((x - a) / (b - a)).powi(2)
    } else {
        1.0 - 2.0 * ((x - b) / (b - a)).powi(2)
    }
}

/// Smooth rise from 0 at `a` to 1 at `b`
pub fn s_curve(a: f64, b: f64, points: usize) -> FuzzyResult<FuzzySet> {
    ordered("s", &[a, b])?;
    if a == b {
        return from_pairs(vec![(a, 0.0), (a, 1.0)]);
    }
    curve_points(points)?;
    from_pairs(sample(a, b, points, |x| s_value(a, b, x)))
}

/// Smooth fall from 1 at `a` to 0 at `b`
pub fn z_curve(a: f64, b: f64, points: usize) -> FuzzyResult<FuzzySet> {
    ordered("z", &[a, b])?;
    if a == b {
        return from_pairs(vec![(a, 1.0), (a, 0.0)]);
    }
    curve_points(points)?;
    from_pairs(sample(a, b, points, |x| 1.0 - s_value(a, b, x)))
}

/// S up to `center`, Z down from it
pub fn pi_curve(center: f64, width: f64, points: usize) -> FuzzyResult<FuzzySet> {
    positive_width("pi", width)?;
    curve_points(points)?;
    let (lo, hi) = (center - width, center + width);
    let mut pairs = sample(lo, center, points, |x| s_value(lo, center, x));
    let falling = sample(center, hi, points, |x| 1.0 - s_value(center, hi, x));
    // both halves meet at (center, 1)
    pairs.extend(falling.into_iter().skip(1));
    from_pairs(pairs)
}

/// 1 at `a` falling linearly to 0 at `b`
pub fn left_linear(a: f64, b: f64) -> FuzzyResult<FuzzySet> {
    ordered("left_linear", &[a, b])?;
    from_pairs(vec![(a, 1.0), (b, 0.0)])
}

/// 0 at `a` rising linearly to 1 at `b`
pub fn right_linear(a: f64, b: f64) -> FuzzyResult<FuzzySet> {
    ordered("right_linear", &[a, b])?;
    from_pairs(vec![(a, 0.0), (b, 1.0)])
}

fn gaussian_value(mean: f64, sigma: f64, x: f64) -> f64 {
    (-((x - mean).powi(2)) / (2.0 * sigma.powi(2))).exp()
}

/// Falling half of a Gaussian, from 1 at the mean to a forced 0 at the cut
fn gaussian_tail(mean: f64, sigma: f64, points: usize) -> Vec<(f64, f64)> {
    let end = mean + GAUSSIAN_SPAN * sigma;
    let mut pairs = sample(mean, end, points, |x| gaussian_value(mean, sigma, x));
    if let Some(last) = pairs.last_mut() {
        last.1 = 0.0;
    }
    pairs
}

fn mirror(pairs: &[(f64, f64)], mean: f64) -> Vec<(f64, f64)> {
    pairs.iter().rev().map(|&(x, y)| (2.0 * mean - x, y)).collect()
}

/// Bell curve sampled over mean ± 4 sigma, zero at both cut points
pub fn gaussian(mean: f64, sigma: f64, points: usize) -> FuzzyResult<FuzzySet> {
    positive_width("gaussian", sigma)?;
    curve_points(points)?;
    let tail = gaussian_tail(mean, sigma, points);
    let mut pairs = mirror(&tail, mean);
    pairs.extend(tail.into_iter().skip(1));
    from_pairs(pairs)
}

/// 1 up to the mean, Gaussian fall to the right
pub fn left_gaussian(mean: f64, sigma: f64, points: usize) -> FuzzyResult<FuzzySet> {
    positive_width("left_gaussian", sigma)?;
    curve_points(points)?;
    from_pairs(gaussian_tail(mean, sigma, points))
}

/// Gaussian rise to 1 at the mean, 1 beyond it
pub fn right_gaussian(mean: f64, sigma: f64, points: usize) -> FuzzyResult<FuzzySet> {
    positive_width("right_gaussian", sigma)?;
    curve_points(points)?;
    from_pairs(mirror(&gaussian_tail(mean, sigma, points), mean))
}

/// 1 on `[a, b]`, 0 elsewhere, with vertical edges
pub fn rectangle(a: f64, b: f64) -> FuzzyResult<FuzzySet> {
    ordered("rectangle", &[a, b])?;
    from_pairs(vec![(a, 0.0), (a, 1.0), (b, 1.0), (b, 0.0)])
}

/// Vertical spike of the given height at `x`
pub fn singleton(x: f64, height: f64) -> FuzzyResult<FuzzySet> {
    from_pairs(vec![(x, 0.0), (x, height), (x, 0.0)])
}
