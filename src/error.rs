//! Structured error handling for fuzzykit
//!
//! Every failure surfaced by the library is a [`FuzzyError`] carrying:
//! - An [`ErrorCode`] for programmatic handling
//! - A human-readable message
//! - Optional context fields, a source location and a resolution hint
//!
//! # Error Categories
//!
//! - `Validation` - construction-time problems (unordered breakpoints,
//!   membership outside `[0, 1]`, universe-of-discourse violations)
//! - `Parse` - malformed linguistic expressions, unknown term names
//! - `Compatibility` - combining values whose variables disagree on bounds
//! - `Algorithm` - no defuzzified value exists, Tsukamoto failures
//! - `Usage` - firing rules before inputs are bound, arity mismatches
//! - `Config` - configuration loading and validation
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzykit::error::{FuzzyError, ErrorCode};
//!
//! fn check(y: f64) -> Result<(), FuzzyError> {
//!     if !(0.0..=1.0).contains(&y) {
//!         return Err(FuzzyError::new(ErrorCode::MembershipOutOfRange, "membership out of range")
//!             .with_context("y", y.to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

// ============================================================================
// Error Codes
// ============================================================================

/// Unique error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    /// Generic validation error
    ValidationError = 1000,
    /// Breakpoint x values are not in the required order
    UnorderedBreakpoints = 1001,
    /// A membership value lies outside [0, 1]
    MembershipOutOfRange = 1002,
    /// A point lies outside the universe of discourse
    UodViolation = 1003,
    /// Universe of discourse bounds are unusable
    InvalidBounds = 1004,
    /// Parallel coordinate arrays differ in length
    LengthMismatch = 1005,
    /// Empty input where at least one element is required
    EmptyInput = 1006,
    /// NaN or infinite number where a finite one is required
    NonFiniteValue = 1007,
    /// A term with the same name already exists
    DuplicateTerm = 1008,

    // Parse errors (2xxx)
    /// Unknown term name in a linguistic expression
    UnknownTerm = 2001,
    /// Token not valid at this position
    UnexpectedToken = 2002,
    /// Expression ended while more input was required
    UnexpectedEnd = 2003,
    /// Unknown modifier name
    UnknownModifier = 2004,

    // Compatibility errors (3xxx)
    /// Values are bound to variables with different universes of discourse
    IncompatibleVariables = 3000,

    // Algorithm errors (4xxx)
    /// No defuzzified value exists (empty fuzzy set)
    NoDefuzzifiedValue = 4001,
    /// Tsukamoto conclusion is not monotonic
    NonMonotonicConclusion = 4002,
    /// Tsukamoto conclusion never reaches the match degree
    NoTsukamotoSolution = 4003,

    // Usage errors (5xxx)
    /// Rule fired before inputs were bound
    InputsNotBound = 5001,
    /// Antecedent and input counts differ
    ArityMismatch = 5002,

    // Config errors (7xxx)
    /// Generic config error
    ConfigError = 7000,
    /// Invalid config syntax
    InvalidConfigSyntax = 7001,
    /// Invalid config value
    InvalidConfigValue = 7002,

    // Internal errors (9xxx)
    /// Internal error
    InternalError = 9000,
}

/// The broad class an error code belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Validation,
    Parse,
    Compatibility,
    Algorithm,
    Usage,
    Config,
    Internal,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a short description of the error code
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "Validation error",
            ErrorCode::UnorderedBreakpoints => "Breakpoints out of order",
            ErrorCode::MembershipOutOfRange => "Membership value out of range",
            ErrorCode::UodViolation => "Universe of discourse violation",
            ErrorCode::InvalidBounds => "Invalid universe of discourse bounds",
            ErrorCode::LengthMismatch => "Coordinate length mismatch",
            ErrorCode::EmptyInput => "Empty input",
            ErrorCode::NonFiniteValue => "Non-finite value",
            ErrorCode::DuplicateTerm => "Duplicate term",

            ErrorCode::UnknownTerm => "Unknown term",
            ErrorCode::UnexpectedToken => "Unexpected token",
            ErrorCode::UnexpectedEnd => "Unexpected end of expression",
            ErrorCode::UnknownModifier => "Unknown modifier",

            ErrorCode::IncompatibleVariables => "Incompatible fuzzy variables",

            ErrorCode::NoDefuzzifiedValue => "No defuzzified value",
            ErrorCode::NonMonotonicConclusion => "Non-monotonic conclusion",
            ErrorCode::NoTsukamotoSolution => "No Tsukamoto solution",

            ErrorCode::InputsNotBound => "Rule inputs not bound",
            ErrorCode::ArityMismatch => "Antecedent/input arity mismatch",

            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::InvalidConfigSyntax => "Invalid configuration syntax",
            ErrorCode::InvalidConfigValue => "Invalid configuration value",

            ErrorCode::InternalError => "Internal error",
        }
    }

    /// Get the category this code belongs to
    pub fn category(&self) -> ErrorCategory {
        match self.code() / 1000 {
            1 => ErrorCategory::Validation,
            2 => ErrorCategory::Parse,
            3 => ErrorCategory::Compatibility,
            4 => ErrorCategory::Algorithm,
            5 => ErrorCategory::Usage,
            7 => ErrorCategory::Config,
            _ => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// ============================================================================
// Error Context
// ============================================================================

/// Additional context information for an error
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Key-value pairs of context information
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    /// Source location (file:line)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for fuzzykit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyError {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
    /// Hint for resolving the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FuzzyError {
    /// Create a new error with a code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    // ========================================================================
    // Factory methods for common error types
    // ========================================================================

    /// Create a generic validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Breakpoint `index` has an x value that breaks the ordering
    pub fn unordered(index: usize, previous: f64, x: f64) -> Self {
        Self::new(
            ErrorCode::UnorderedBreakpoints,
            format!(
                "x value {} at index {} does not follow previous x value {}",
                x, index, previous
            ),
        )
        .with_context("index", index.to_string())
    }

    /// Membership value outside [0, 1]
    pub fn membership_out_of_range(index: usize, y: f64) -> Self {
        Self::new(
            ErrorCode::MembershipOutOfRange,
            format!("membership value {} at index {} is outside [0, 1]", y, index),
        )
        .with_context("index", index.to_string())
    }

    /// Point outside the universe of discourse with confinement disabled
    pub fn uod_violation(variable: &str, x: f64, min: f64, max: f64) -> Self {
        Self::new(
            ErrorCode::UodViolation,
            format!(
                "x value {} lies outside the universe of discourse [{}, {}] of '{}'",
                x, min, max, variable
            ),
        )
        .with_context("variable", variable)
        .with_hint("enable confine_to_uod to clip shapes to the variable bounds")
    }

    /// Unknown term referenced in an expression
    pub fn unknown_term(term: &str, variable: &str, position: usize) -> Self {
        Self::new(
            ErrorCode::UnknownTerm,
            format!(
                "unknown term '{}' at offset {} for variable '{}'",
                term, position, variable
            ),
        )
        .with_context("token", term)
        .with_context("position", position.to_string())
    }

    /// Token that cannot appear at this position
    pub fn unexpected_token(token: &str, position: usize) -> Self {
        Self::new(
            ErrorCode::UnexpectedToken,
            format!("unexpected token '{}' at offset {}", token, position),
        )
        .with_context("token", token)
        .with_context("position", position.to_string())
    }

    /// Expression ended early
    pub fn unexpected_end(expected: &str) -> Self {
        Self::new(
            ErrorCode::UnexpectedEnd,
            format!("expression ended while expecting {}", expected),
        )
    }

    /// Values from variables with different bounds were combined
    pub fn incompatible(left: &str, right: &str) -> Self {
        Self::new(
            ErrorCode::IncompatibleVariables,
            format!(
                "fuzzy variables '{}' and '{}' have incompatible universes of discourse",
                left, right
            ),
        )
    }

    /// No defuzzified value exists
    pub fn no_defuzzified_value(method: &str) -> Self {
        Self::new(
            ErrorCode::NoDefuzzifiedValue,
            format!("{} defuzzification is undefined for an empty fuzzy set", method),
        )
    }

    /// Rule fired before its inputs were bound
    pub fn inputs_not_bound(rule: &str) -> Self {
        Self::new(
            ErrorCode::InputsNotBound,
            format!("rule '{}' has antecedents but no inputs bound", rule),
        )
        .with_hint("call set_inputs before firing or testing the rule")
    }

    /// Antecedent and input counts differ
    pub fn arity_mismatch(antecedents: usize, inputs: usize) -> Self {
        Self::new(
            ErrorCode::ArityMismatch,
            format!(
                "rule has {} antecedents but {} inputs were supplied",
                antecedents, inputs
            ),
        )
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    // ========================================================================
    // Builder methods
    // ========================================================================

    /// Add context to the error
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.fields.insert(key.into(), value.into());
        self
    }

    /// Add source location
    pub fn at(mut self, location: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::new);
        ctx.location = Some(location.into());
        self
    }

    /// Add a hint for resolving the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Look up a context field
    pub fn context_field(&self, key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|c| c.fields.get(key))
            .map(String::as_str)
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"INTERNAL_ERROR","message":"{}"}}"#, self.message)
        })
    }
}

impl fmt::Display for FuzzyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;

        if let Some(ref ctx) = self.context {
            if let Some(ref loc) = ctx.location {
                write!(f, " at {}", loc)?;
            }
        }

        if let Some(ref hint) = self.hint {
            write!(f, "\nHint: {}", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for FuzzyError {}

impl From<ConfigError> for FuzzyError {
    fn from(err: ConfigError) -> Self {
        let code = match err {
            ConfigError::ParseError(..) => ErrorCode::InvalidConfigSyntax,
            ConfigError::InvalidValue { .. } => ErrorCode::InvalidConfigValue,
            _ => ErrorCode::ConfigError,
        };
        FuzzyError::new(code, err.to_string())
    }
}

/// A Result type using FuzzyError
pub type FuzzyResult<T> = Result<T, FuzzyError>;

// ============================================================================
// Macros for convenient error creation
// ============================================================================

/// Create a FuzzyError with context from the current location
#[macro_export]
macro_rules! fuzzy_error {
    ($code:expr, $msg:expr) => {
        $crate::error::FuzzyError::new($code, $msg)
            .at(format!("{}:{}", file!(), line!()))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::error::FuzzyError::new($code, format!($fmt, $($arg)*))
            .at(format!("{}:{}", file!(), line!()))
    };
}

/// Bail out early with an error
#[macro_export]
macro_rules! fuzzy_bail {
    ($code:expr, $msg:expr) => {
        return Err($crate::fuzzy_error!($code, $msg))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::fuzzy_error!($code, $fmt, $($arg)*))
    };
}

/// Ensure a condition holds, or return an error
#[macro_export]
macro_rules! fuzzy_ensure {
    ($cond:expr, $code:expr, $msg:expr) => {
        if !$cond {
            $crate::fuzzy_bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::fuzzy_bail!($code, $fmt, $($arg)*);
        }
    };
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = FuzzyError::validation("bad shape");
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "bad shape");
    }

    #[test]
    fn test_categories() {
        assert_eq!(ErrorCode::UnorderedBreakpoints.category(), ErrorCategory::Validation);
        assert_eq!(ErrorCode::UnknownTerm.category(), ErrorCategory::Parse);
        assert_eq!(ErrorCode::IncompatibleVariables.category(), ErrorCategory::Compatibility);
        assert_eq!(ErrorCode::NoDefuzzifiedValue.category(), ErrorCategory::Algorithm);
        assert_eq!(ErrorCode::ArityMismatch.category(), ErrorCategory::Usage);
        assert_eq!(ErrorCode::InvalidConfigValue.category(), ErrorCategory::Config);
        assert_eq!(ErrorCode::InternalError.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_unknown_term_names_token() {
        let err = FuzzyError::unknown_term("warm", "temperature", 9);
        assert_eq!(err.code, ErrorCode::UnknownTerm);
        assert!(err.message.contains("'warm'"));
        assert_eq!(err.context_field("token"), Some("warm"));
        assert_eq!(err.context_field("position"), Some("9"));
    }

    #[test]
    fn test_error_display() {
        let err = FuzzyError::unexpected_token(")", 7)
            .at("expr:3")
            .with_hint("close the parenthesis");

        let display = err.to_string();
        assert!(display.contains("[2002]"));
        assert!(display.contains("unexpected token ')'"));
        assert!(display.contains("expr:3"));
        assert!(display.contains("close the parenthesis"));
    }

    #[test]
    fn test_error_to_json() {
        let err = FuzzyError::arity_mismatch(2, 1);
        let json = err.to_json();
        assert!(json.contains("ARITY_MISMATCH"));
        assert!(json.contains("2 antecedents"));
    }

    #[test]
    fn test_uod_violation_has_hint() {
        let err = FuzzyError::uod_violation("temp", 120.0, 0.0, 100.0);
        assert_eq!(err.code, ErrorCode::UodViolation);
        assert!(err.hint.is_some());
    }

    #[test]
    fn test_macro_location() {
        fn fails() -> FuzzyResult<()> {
            fuzzy_ensure!(1 + 1 == 3, ErrorCode::InternalError, "math is {}", "broken");
            Ok(())
        }
        let err = fails().unwrap_err();
        assert_eq!(err.message, "math is broken");
        assert!(err.context.and_then(|c| c.location).is_some());
    }
}
