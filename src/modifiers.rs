//! Linguistic modifiers (hedges)
//!
//! A modifier is a named unary transform of a fuzzy set, such as `very`
//! (square every membership) or `not` (complement). The built-in set can be
//! extended per registry with user closures.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{ErrorCode, FuzzyError, FuzzyResult};
use crate::set::{FuzzySet, SetPoint};

/// Default number of pieces each sloped segment is split into
pub const DEFAULT_MODIFIER_RESOLUTION: usize = 8;

/// User-supplied modifier
pub type ModifierFn = Arc<dyn Fn(&FuzzySet) -> FuzzySet + Send + Sync>;

/// The built-in hedges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hedge {
    /// Complement
    Not,
    /// Concentration: y^2
    Very,
    /// y^3
    Extremely,
    /// Dilation: y^(1/3)
    Somewhat,
    /// y^0.5
    MoreOrLess,
    /// y^1.25
    Plus,
    /// Scale so the maximum is 1
    Norm,
    /// Contrast intensification
    Intensify,
    /// intensify(norm(plus and not very))
    Slightly,
    /// 0 up to the first maximum, complement after it
    Above,
    /// Complement up to the last maximum, 0 after it
    Below,
}

impl Hedge {
    pub const ALL: [Hedge; 11] = [
        Hedge::Not,
        Hedge::Very,
        Hedge::Extremely,
        Hedge::Somewhat,
        Hedge::MoreOrLess,
        Hedge::Plus,
        Hedge::Norm,
        Hedge::Intensify,
        Hedge::Slightly,
        Hedge::Above,
        Hedge::Below,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hedge::Not => "not",
            Hedge::Very => "very",
            Hedge::Extremely => "extremely",
            Hedge::Somewhat => "somewhat",
            Hedge::MoreOrLess => "more_or_less",
            Hedge::Plus => "plus",
            Hedge::Norm => "norm",
            Hedge::Intensify => "intensify",
            Hedge::Slightly => "slightly",
            Hedge::Above => "above",
            Hedge::Below => "below",
        }
    }

    /// Apply the hedge, splitting sloped segments into `resolution` pieces
    pub fn apply(&self, set: &FuzzySet, resolution: usize) -> FuzzySet {
        match self {
            Hedge::Not => set.complement(),
            Hedge::Very => set.map_membership(|y| y * y, resolution),
            Hedge::Extremely => set.map_membership(|y| y * y * y, resolution),
            Hedge::Somewhat => set.map_membership(f64::cbrt, resolution),
            Hedge::MoreOrLess => set.map_membership(f64::sqrt, resolution),
            Hedge::Plus => set.map_membership(|y| y.powf(1.25), resolution),
            Hedge::Norm => set.normalize(),
            Hedge::Intensify => set.map_membership(intensify, resolution),
            Hedge::Slightly => {
                let plus = Hedge::Plus.apply(set, resolution);
                let not_very = Hedge::Very.apply(set, resolution).complement();
                let core = plus.intersection(&not_very).normalize();
                core.map_membership(intensify, resolution)
            }
            Hedge::Above => above(set),
            Hedge::Below => below(set),
        }
    }
}

fn intensify(y: f64) -> f64 {
    if y <= 0.5 {
        2.0 * y * y
    } else {
        1.0 - 2.0 * (1.0 - y) * (1.0 - y)
    }
}

fn above(set: &FuzzySet) -> FuzzySet {
    let points = set.points();
    let max = set.max_y();
    let Some(peak) = points.iter().position(|p| p.y == max) else {
        return FuzzySet::empty();
    };
    let peak_x = points[peak].x;
    let mut out = Vec::with_capacity(points.len() + 2);
    out.extend(points.iter().filter(|p| p.x < peak_x).map(|p| SetPoint::new(p.x, 0.0)));
    out.push(SetPoint::new(peak_x, 0.0));
    if max < 1.0 {
        out.push(SetPoint::new(peak_x, 0.0));
        out.push(SetPoint::new(peak_x, 1.0 - max));
    }
    out.extend(
        points[peak + 1..]
            .iter()
            .filter(|p| p.x > peak_x)
            .map(|p| SetPoint::new(p.x, 1.0 - p.y)),
    );
    FuzzySet::from_points_unchecked(out)
}

fn below(set: &FuzzySet) -> FuzzySet {
    let points = set.points();
    let max = set.max_y();
    let Some(peak) = points.iter().rposition(|p| p.y == max) else {
        return FuzzySet::empty();
    };
    let peak_x = points[peak].x;
    let mut out = Vec::with_capacity(points.len() + 2);
    out.extend(
        points[..peak]
            .iter()
            .filter(|p| p.x < peak_x)
            .map(|p| SetPoint::new(p.x, 1.0 - p.y)),
    );
    if max < 1.0 {
        out.push(SetPoint::new(peak_x, 1.0 - max));
        out.push(SetPoint::new(peak_x, 0.0));
    }
    out.push(SetPoint::new(peak_x, 0.0));
    out.extend(points.iter().filter(|p| p.x > peak_x).map(|p| SetPoint::new(p.x, 0.0)));
    FuzzySet::from_points_unchecked(out)
}

/// A registry entry
#[derive(Clone)]
pub enum Modifier {
    Builtin(Hedge),
    Custom(ModifierFn),
}

impl Modifier {
    pub fn apply(&self, set: &FuzzySet, resolution: usize) -> FuzzySet {
        match self {
            Modifier::Builtin(hedge) => hedge.apply(set, resolution),
            Modifier::Custom(f) => f(set),
        }
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Builtin(hedge) => write!(f, "Builtin({})", hedge.as_str()),
            Modifier::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Named modifiers available to linguistic expressions.
///
/// Names are case-insensitive. `Default` yields the built-in hedges.
#[derive(Debug, Clone)]
pub struct ModifierRegistry {
    modifiers: IndexMap<String, Modifier>,
    resolution: usize,
}

impl Default for ModifierRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModifierRegistry {
    /// Registry holding only the built-in hedges
    pub fn builtin() -> Self {
        let mut modifiers = IndexMap::new();
        for hedge in Hedge::ALL {
            modifiers.insert(hedge.as_str().to_string(), Modifier::Builtin(hedge));
        }
        modifiers.insert("more-or-less".to_string(), Modifier::Builtin(Hedge::MoreOrLess));
        Self {
            modifiers,
            resolution: DEFAULT_MODIFIER_RESOLUTION,
        }
    }

    /// Registry with no modifiers at all
    pub fn empty() -> Self {
        Self {
            modifiers: IndexMap::new(),
            resolution: DEFAULT_MODIFIER_RESOLUTION,
        }
    }

    /// Pieces per sloped segment used by the nonlinear hedges
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution.max(1);
        self
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Add or replace a modifier
    pub fn register<F>(&mut self, name: &str, f: F) -> FuzzyResult<()>
    where
        F: Fn(&FuzzySet) -> FuzzySet + Send + Sync + 'static,
    {
        let key = name.to_lowercase();
        if !is_identifier(&key) {
            return Err(FuzzyError::validation(format!(
                "'{}' is not a valid modifier name",
                name
            )));
        }
        if matches!(key.as_str(), "and" | "or") {
            return Err(FuzzyError::validation(format!(
                "'{}' is reserved in linguistic expressions",
                name
            )));
        }
        self.modifiers.insert(key, Modifier::Custom(Arc::new(f)));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modifiers.keys().map(String::as_str)
    }

    pub fn apply(&self, name: &str, set: &FuzzySet) -> FuzzyResult<FuzzySet> {
        let modifier = self.get(name).ok_or_else(|| {
            FuzzyError::new(ErrorCode::UnknownModifier, format!("unknown modifier '{}'", name))
                .with_context("token", name)
        })?;
        Ok(modifier.apply(set, self.resolution))
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
