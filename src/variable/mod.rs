//! Fuzzy variables: a universe of discourse plus named terms
//!
//! A [`FuzzyVariable`] names a bounded numeric range (the universe of
//! discourse) and holds an ordered map of linguistic terms, each a
//! [`FuzzySet`]. Terms can be registered directly, from a [`Shape`], or from
//! a linguistic expression over terms already present.

pub mod linguistic;

pub use linguistic::LinguisticExpr;

use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ErrorCode, FuzzyError, FuzzyResult};
use crate::modifiers::{is_identifier, ModifierRegistry};
use crate::set::FuzzySet;
use crate::shapes::Shape;

/// Relative tolerance when comparing universe-of-discourse bounds
const UOD_TOLERANCE: f64 = 1e-9;

/// A named universe of discourse with its linguistic terms
#[derive(Debug, Clone)]
pub struct FuzzyVariable {
    name: String,
    min: f64,
    max: f64,
    unit: String,
    terms: IndexMap<String, FuzzySet>,
}

impl FuzzyVariable {
    /// Create a variable over `[min, max]`
    pub fn new(name: impl Into<String>, min: f64, max: f64, unit: impl Into<String>) -> FuzzyResult<Self> {
        let name = name.into();
        if !min.is_finite() || !max.is_finite() {
            return Err(FuzzyError::new(
                ErrorCode::NonFiniteValue,
                format!("bounds of '{}' must be finite, got [{}, {}]", name, min, max),
            ));
        }
        if min >= max {
            return Err(FuzzyError::new(
                ErrorCode::InvalidBounds,
                format!("'{}' needs min < max, got [{}, {}]", name, min, max),
            )
            .with_context("variable", name.as_str()));
        }
        Ok(Self {
            name,
            min,
            max,
            unit: unit.into(),
            terms: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// `(min, max)` of the universe of discourse
    pub fn uod(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Same bounds, within a relative tolerance; names and terms are ignored
    pub fn compatible_with(&self, other: &FuzzyVariable) -> bool {
        let tolerance = UOD_TOLERANCE * self.span().max(other.span()).max(1.0);
        (self.min - other.min).abs() <= tolerance && (self.max - other.max).abs() <= tolerance
    }

    /// Register a term
    pub fn add_term(&mut self, name: &str, set: FuzzySet) -> FuzzyResult<()> {
        if !is_identifier(name) {
            return Err(FuzzyError::validation(format!("'{}' is not a valid term name", name))
                .with_hint("term names start with a letter or '_' and contain letters, digits, '_' or '-'"));
        }
        if ["and", "or", "not"].iter().any(|k| name.eq_ignore_ascii_case(k)) {
            return Err(FuzzyError::validation(format!(
                "'{}' is a reserved word in linguistic expressions",
                name
            )));
        }
        if self.terms.contains_key(name) {
            return Err(FuzzyError::new(
                ErrorCode::DuplicateTerm,
                format!("'{}' already has a term named '{}'", self.name, name),
            )
            .with_hint("remove the existing term first"));
        }
        debug!(variable = %self.name, term = name, points = set.len(), "added term");
        self.terms.insert(name.to_string(), set);
        Ok(())
    }

    /// Register a term built from a standard shape
    pub fn add_term_shape(&mut self, name: &str, shape: Shape, points: usize) -> FuzzyResult<()> {
        let set = shape.to_set(points)?;
        self.add_term(name, set)
    }

    /// Register a term defined by an expression over existing terms
    pub fn add_term_expression(&mut self, name: &str, expression: &str) -> FuzzyResult<()> {
        self.add_term_expression_with(name, expression, &ModifierRegistry::builtin())
    }

    /// As [`add_term_expression`](Self::add_term_expression) with a custom modifier registry
    pub fn add_term_expression_with(
        &mut self,
        name: &str,
        expression: &str,
        modifiers: &ModifierRegistry,
    ) -> FuzzyResult<()> {
        let set = self.parse_expression_with(expression, modifiers)?;
        self.add_term(name, set)
    }

    /// Evaluate an expression without registering it
    pub fn parse_expression(&self, expression: &str) -> FuzzyResult<FuzzySet> {
        self.parse_expression_with(expression, &ModifierRegistry::builtin())
    }

    pub fn parse_expression_with(
        &self,
        expression: &str,
        modifiers: &ModifierRegistry,
    ) -> FuzzyResult<FuzzySet> {
        let expr = LinguisticExpr::parse(expression, modifiers)?;
        expr.evaluate(&self.name, &|term: &str| self.terms.get(term), modifiers)
    }

    pub fn term(&self, name: &str) -> Option<&FuzzySet> {
        self.terms.get(name)
    }

    pub fn has_term(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    /// Remove a term, keeping the order of the rest
    pub fn remove_term(&mut self, name: &str) -> Option<FuzzySet> {
        self.terms.shift_remove(name)
    }

    /// Term names in registration order
    pub fn term_names(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &FuzzySet)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Membership of a crisp value in every term
    pub fn fuzzify(&self, x: f64) -> Vec<(&str, f64)> {
        self.terms
            .iter()
            .map(|(name, set)| (name.as_str(), set.membership(x)))
            .collect()
    }

    /// The term a crisp value belongs to most; ties go to the earliest term
    pub fn dominant_term(&self, x: f64) -> Option<(&str, f64)> {
        self.fuzzify(x)
            .into_iter()
            .fold(None, |best, (name, y)| match best {
                Some((_, best_y)) if best_y >= y => best,
                _ => Some((name, y)),
            })
    }
}

impl fmt::Display for FuzzyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {}]", self.name, self.min, self.max)?;
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        let names: Vec<&str> = self.term_names().collect();
        if !names.is_empty() {
            write!(f, ": {}", names.join(", "))?;
        }
        Ok(())
    }
}
