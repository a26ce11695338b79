//! Configuration System for fuzzykit
//!
//! Provides the settings a [`FuzzyContext`](crate::FuzzyContext) is built
//! from:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple config file locations
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./fuzzykit.toml` - Project-local configuration
//! 2. `~/.config/fuzzykit/config.toml` - User configuration (XDG)
//! 3. `~/.fuzzykit/config.toml` - User configuration (legacy)
//!
//! # Environment Variables
//!
//! - `FUZZYKIT_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `FUZZYKIT_EXECUTOR` - Rule executor (mamdani, larsen, tsukamoto)
//! - `FUZZYKIT_COMBINE` - Antecedent combination (minimum, product, compensatory)
//! - `FUZZYKIT_GLOBAL_CONTRIBUTION` - Repeated fact merge (union, sum)
//! - `FUZZYKIT_SIMILARITY` - Similarity operator (area_ratio, possibility_necessity)
//! - `FUZZYKIT_MATCH_METHOD` - Antecedent matching (maximum, similarity)
//! - `FUZZYKIT_MATCH_THRESHOLD` - Threshold for fuzzy match
//! - `FUZZYKIT_CONFINE_TO_UOD` - Clip values to their universe (true/false)
//! - `FUZZYKIT_EQUALITY` - Equality strength (weak, strong)
//! - `FUZZYKIT_DEFUZZIFY` - Default defuzzification method
//! - `FUZZYKIT_CURVE_POINTS` - Samples per curved shape flank
//! - `FUZZYKIT_MODIFIER_RESOLUTION` - Segment subdivision for hedges
//!
//! # Example Configuration
//!
//! ```toml
//! # fuzzykit.toml
//!
//! [general]
//! log_level = "normal"
//!
//! [inference]
//! executor = "mamdani"
//! combine = "minimum"
//! match_threshold = 0.5
//!
//! [values]
//! confine_to_uod = true
//! equality = "weak"
//!
//! [shapes]
//! curve_points = 9
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::{DEFAULT_EQUALITY_TOLERANCE, DEFAULT_MATCH_THRESHOLD};
use crate::modifiers::DEFAULT_MODIFIER_RESOLUTION;
use crate::rule::MatchMethod;
use crate::set::{DefuzzifyMethod, Strength};
use crate::shapes::DEFAULT_CURVE_POINTS;

// ============================================================================
// Configuration Schema
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FuzzyConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Rule matching and firing defaults
    pub inference: InferenceConfig,
    /// Fuzzy value construction and comparison
    pub values: ValuesConfig,
    /// Shape sampling
    pub shapes: ShapesConfig,
    /// Textual output
    pub display: DisplayConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logging level
    pub log_level: LogLevel,
}

/// Inference configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub executor: ExecutorKind,
    pub combine: CombineKind,
    pub global_contribution: ContributionKind,
    pub similarity: SimilarityKind,
    pub match_method: MatchMethod,
    /// Minimum degree for a fuzzy match, in [0, 1]
    pub match_threshold: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            executor: ExecutorKind::Mamdani,
            combine: CombineKind::Minimum,
            global_contribution: ContributionKind::Union,
            similarity: SimilarityKind::AreaRatio,
            match_method: MatchMethod::Maximum,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

/// Fuzzy value options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuesConfig {
    /// Clip out-of-range points instead of rejecting them
    pub confine_to_uod: bool,
    pub equality: Strength,
    /// Tolerance for weak equality
    pub equality_tolerance: f64,
    pub defuzzify: DefuzzifyMethod,
}

impl Default for ValuesConfig {
    fn default() -> Self {
        Self {
            confine_to_uod: true,
            equality: Strength::Weak,
            equality_tolerance: DEFAULT_EQUALITY_TOLERANCE,
            defuzzify: DefuzzifyMethod::Moment,
        }
    }
}

/// Shape sampling options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapesConfig {
    /// Samples per curved flank (S, Z, PI, Gaussian)
    pub curve_points: usize,
    /// Pieces each sloped segment is split into by nonlinear hedges
    pub modifier_resolution: usize,
}

impl Default for ShapesConfig {
    fn default() -> Self {
        Self {
            curve_points: DEFAULT_CURVE_POINTS,
            modifier_resolution: DEFAULT_MODIFIER_RESOLUTION,
        }
    }
}

/// Plot dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub plot_width: usize,
    pub plot_height: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            plot_width: 60,
            plot_height: 12,
        }
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiet" | "q" | "0" => Some(LogLevel::Quiet),
            "normal" | "n" | "1" => Some(LogLevel::Normal),
            "verbose" | "v" | "2" => Some(LogLevel::Verbose),
            "debug" | "d" | "3" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Filter directive for a tracing subscriber
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "warn",
            LogLevel::Verbose => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Default rule executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    #[default]
    Mamdani,
    Larsen,
    Tsukamoto,
}

impl ExecutorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutorKind::Mamdani => "mamdani",
            ExecutorKind::Larsen => "larsen",
            ExecutorKind::Tsukamoto => "tsukamoto",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mamdani" | "min" | "mamdani_min_max_min" => Some(ExecutorKind::Mamdani),
            "larsen" | "product" | "larsen_product_max_min" => Some(ExecutorKind::Larsen),
            "tsukamoto" => Some(ExecutorKind::Tsukamoto),
            _ => None,
        }
    }
}

/// Default antecedent combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CombineKind {
    #[default]
    Minimum,
    Product,
    Compensatory,
}

impl CombineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombineKind::Minimum => "minimum",
            CombineKind::Product => "product",
            CombineKind::Compensatory => "compensatory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "minimum" | "min" => Some(CombineKind::Minimum),
            "product" | "prod" => Some(CombineKind::Product),
            "compensatory" | "compensatory_and" => Some(CombineKind::Compensatory),
            _ => None,
        }
    }
}

/// Default global contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContributionKind {
    #[default]
    Union,
    Sum,
}

impl ContributionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionKind::Union => "union",
            ContributionKind::Sum => "sum",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "union" | "max" => Some(ContributionKind::Union),
            "sum" | "fuzzy_sum" => Some(ContributionKind::Sum),
            _ => None,
        }
    }
}

/// Default similarity operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    #[default]
    AreaRatio,
    PossibilityNecessity,
}

impl SimilarityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityKind::AreaRatio => "area_ratio",
            SimilarityKind::PossibilityNecessity => "possibility_necessity",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "area_ratio" | "area" => Some(SimilarityKind::AreaRatio),
            "possibility_necessity" | "possibility" => Some(SimilarityKind::PossibilityNecessity),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration Loading
// ============================================================================

impl FuzzyConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from default locations
    ///
    /// Searches for config files in order:
    /// 1. ./fuzzykit.toml
    /// 2. ~/.config/fuzzykit/config.toml
    /// 3. ~/.fuzzykit/config.toml
    ///
    /// Then applies environment variable overrides and validates.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for path in Self::config_paths() {
            if path.exists() {
                debug!(path = %path.display(), "loading configuration");
                config = Self::load_from_file(&path)?;
                break;
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(PathBuf::from("<string>"), e.to_string()))
    }

    /// Get the list of config file search paths
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./fuzzykit.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("fuzzykit").join("config.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".fuzzykit").join("config.toml"));
        }

        paths
    }

    /// Apply `FUZZYKIT_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparsable values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("FUZZYKIT_LOG_LEVEL").and_then(|v| LogLevel::from_str(&v)) {
            self.general.log_level = level;
        }
        if let Some(kind) = lookup("FUZZYKIT_EXECUTOR").and_then(|v| ExecutorKind::from_str(&v)) {
            self.inference.executor = kind;
        }
        if let Some(kind) = lookup("FUZZYKIT_COMBINE").and_then(|v| CombineKind::from_str(&v)) {
            self.inference.combine = kind;
        }
        if let Some(kind) =
            lookup("FUZZYKIT_GLOBAL_CONTRIBUTION").and_then(|v| ContributionKind::from_str(&v))
        {
            self.inference.global_contribution = kind;
        }
        if let Some(kind) = lookup("FUZZYKIT_SIMILARITY").and_then(|v| SimilarityKind::from_str(&v)) {
            self.inference.similarity = kind;
        }
        if let Some(method) = lookup("FUZZYKIT_MATCH_METHOD").and_then(|v| MatchMethod::from_str(&v)) {
            self.inference.match_method = method;
        }
        if let Some(threshold) = lookup("FUZZYKIT_MATCH_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.inference.match_threshold = threshold;
        }
        if let Some(val) = lookup("FUZZYKIT_CONFINE_TO_UOD") {
            self.values.confine_to_uod = val == "true" || val == "1" || val == "yes";
        }
        if let Some(strength) = lookup("FUZZYKIT_EQUALITY").and_then(|v| Strength::from_str(&v)) {
            self.values.equality = strength;
        }
        if let Some(method) = lookup("FUZZYKIT_DEFUZZIFY").and_then(|v| DefuzzifyMethod::from_str(&v)) {
            self.values.defuzzify = method;
        }
        if let Some(points) = lookup("FUZZYKIT_CURVE_POINTS").and_then(|v| v.parse().ok()) {
            self.shapes.curve_points = points;
        }
        if let Some(resolution) = lookup("FUZZYKIT_MODIFIER_RESOLUTION").and_then(|v| v.parse().ok()) {
            self.shapes.modifier_resolution = resolution;
        }
    }

    /// Check value ranges the type system cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.inference.match_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::invalid(
                "inference.match_threshold",
                threshold,
                "must lie in [0, 1]",
            ));
        }
        let tolerance = self.values.equality_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::invalid(
                "values.equality_tolerance",
                tolerance,
                "must be a non-negative number",
            ));
        }
        if self.shapes.curve_points < 2 {
            return Err(ConfigError::invalid(
                "shapes.curve_points",
                self.shapes.curve_points,
                "must be at least 2",
            ));
        }
        if self.shapes.modifier_resolution == 0 {
            return Err(ConfigError::invalid(
                "shapes.modifier_resolution",
                0,
                "must be at least 1",
            ));
        }
        if self.display.plot_width < 2 || self.display.plot_height < 2 {
            return Err(ConfigError::invalid(
                "display",
                format!("{}x{}", self.display.plot_width, self.display.plot_height),
                "plots need at least 2x2 cells",
            ));
        }
        Ok(())
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Write configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))
    }

    /// Generate a default configuration file content
    pub fn default_config_content() -> &'static str {
        r#"# fuzzykit Configuration File

[general]
# Logging level: quiet, normal, verbose, debug
log_level = "normal"

[inference]
# Rule executor: mamdani, larsen, tsukamoto
executor = "mamdani"
# Antecedent combination: minimum, product, compensatory
combine = "minimum"
# Merging repeated facts: union, sum
global_contribution = "union"
# Similarity operator: area_ratio, possibility_necessity
similarity = "area_ratio"
# Antecedent matching: maximum, similarity
match_method = "maximum"
# Minimum degree for a fuzzy match
match_threshold = 0.5

[values]
# Clip values to their universe of discourse instead of rejecting them
confine_to_uod = true
# Equality: weak (tolerant) or strong (exact breakpoints)
equality = "weak"
equality_tolerance = 1e-9
# Default defuzzification: moment, center_of_area, maximum, weighted_average
defuzzify = "moment"

[shapes]
# Samples per curved flank (S, Z, PI, Gaussian)
curve_points = 9
# Pieces each sloped segment is split into by nonlinear hedges
modifier_resolution = 8

[display]
plot_width = 60
plot_height = 12
"#
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading/writing config file
    IoError(PathBuf, String),
    /// Parse error in config file
    ParseError(PathBuf, String),
    /// Serialization error
    SerializeError(String),
    /// A setting is outside its allowed range
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(field: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, msg) => {
                write!(f, "IO error reading {}: {}", path.display(), msg)
            }
            ConfigError::ParseError(path, msg) => {
                write!(f, "Parse error in {}: {}", path.display(), msg)
            }
            ConfigError::SerializeError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ConfigError::InvalidValue { field, value, reason } => {
                write!(f, "Invalid value {} for {}: {}", value, field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Tests
// ============================================================================
