//! fuzzykit - Fuzzy set inspection tool
//!
//! Command-line interface for defining a fuzzy variable and evaluating
//! linguistic expressions over its terms.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use regex::Regex;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use fuzzykit::{
    DefuzzifyMethod, FuzzyConfig, FuzzyContext, FuzzyValue, FuzzyVariable, LogLevel, Shape,
};

#[derive(Parser)]
#[command(name = "fuzzykit")]
#[command(version = env!("FUZZYKIT_VERSION"))]
#[command(about = "Evaluate fuzzy sets and linguistic expressions", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the standard search path)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Name of the variable
    #[arg(long, default_value = "x", global = true)]
    name: String,

    /// Universe of discourse
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true, global = true)]
    uod: Vec<f64>,

    /// Unit label
    #[arg(long, default_value = "", global = true)]
    unit: String,

    /// Term definition, e.g. `warm=triangle(15, 22, 30)` (repeatable)
    #[arg(short, long = "term", value_name = "NAME=SHAPE(ARGS)", global = true)]
    terms: Vec<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an expression, plot it and print its defuzzified values
    Eval {
        /// Linguistic expression over the defined terms
        expression: String,

        /// Plot width in columns
        #[arg(long)]
        width: Option<usize>,

        /// Plot height in rows
        #[arg(long)]
        height: Option<usize>,

        /// Print the breakpoints instead of a plot
        #[arg(long)]
        points: bool,
    },
    /// Membership of a crisp reading in every term
    Fuzzify {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Print the commented default file instead
        #[arg(long)]
        default: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&cli, config.general.log_level);

    match cli.command {
        Command::Config { default } => {
            if default {
                print!("{}", FuzzyConfig::default_config_content());
            } else {
                print!("{}", config.to_toml()?);
            }
            Ok(())
        }
        Command::Eval {
            ref expression,
            width,
            height,
            points,
        } => {
            let ctx = FuzzyContext::from_config(&config)?;
            let variable = build_variable(&cli, &ctx)?;
            let value = FuzzyValue::from_expression(variable, expression, &ctx)?;

            println!("{}", value.variable());
            if points {
                println!("{}", value.set());
            } else {
                let width = width.unwrap_or(config.display.plot_width);
                let height = height.unwrap_or(config.display.plot_height);
                println!("{}", value.plot(width, height));
            }
            for method in DefuzzifyMethod::ALL {
                match value.defuzzify(method) {
                    Ok(x) => println!("{:>16}: {:.4}", method.as_str(), x),
                    Err(e) => println!("{:>16}: undefined ({})", method.as_str(), e.message),
                }
            }
            Ok(())
        }
        Command::Fuzzify { value } => {
            let ctx = FuzzyContext::from_config(&config)?;
            let variable = build_variable(&cli, &ctx)?;
            if !variable.contains(value) {
                bail!(
                    "{} lies outside [{}, {}] of '{}'",
                    value,
                    variable.min(),
                    variable.max(),
                    variable.name()
                );
            }
            for (term, degree) in variable.fuzzify(value) {
                println!("{:>16}: {:.4}", term, degree);
            }
            if let Some((term, degree)) = variable.dominant_term(value) {
                println!("{} is most {} ({:.4})", value, term, degree);
            }
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<FuzzyConfig> {
    let config = match cli.config {
        Some(ref path) => {
            let mut config = FuzzyConfig::load_from_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            config.apply_env_overrides();
            config.validate()?;
            config
        }
        None => FuzzyConfig::load()?,
    };
    Ok(config)
}

fn init_logging(cli: &Cli, configured: LogLevel) {
    let level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Debug
    } else {
        configured
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_variable(cli: &Cli, ctx: &FuzzyContext) -> Result<Arc<FuzzyVariable>> {
    let (min, max) = match cli.uod.as_slice() {
        [min, max] => (*min, *max),
        _ => bail!("--uod MIN MAX is required"),
    };
    let mut variable = FuzzyVariable::new(cli.name.as_str(), min, max, cli.unit.as_str())?;

    let pattern = Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*([A-Za-z_]+)\s*\(([^)]*)\)\s*$")?;
    for definition in &cli.terms {
        let (term, shape_name, args) = parse_term_definition(&pattern, definition)?;
        let shape = Shape::parse(shape_name, &args)?;
        debug!(term, %shape, "defining term");
        variable.add_term_shape(term, shape, ctx.curve_points)?;
    }
    if variable.term_count() == 0 {
        bail!("define at least one term with --term NAME=SHAPE(ARGS)");
    }
    Ok(Arc::new(variable))
}

/// Problems reading a `--term` definition
#[derive(Debug, thiserror::Error)]
enum TermSpecError {
    #[error("cannot read term definition '{0}', expected NAME=SHAPE(ARGS)")]
    Malformed(String),

    #[error("bad shape parameter '{value}' in '{definition}'")]
    BadParameter { definition: String, value: String },
}

fn parse_term_definition<'a>(
    pattern: &Regex,
    definition: &'a str,
) -> std::result::Result<(&'a str, &'a str, Vec<f64>), TermSpecError> {
    let caps = pattern
        .captures(definition)
        .ok_or_else(|| TermSpecError::Malformed(definition.to_string()))?;
    let (Some(term), Some(shape), Some(params)) = (caps.get(1), caps.get(2), caps.get(3)) else {
        return Err(TermSpecError::Malformed(definition.to_string()));
    };
    let args = params
        .as_str()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>().map_err(|_| TermSpecError::BadParameter {
                definition: definition.to_string(),
                value: s.to_string(),
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((term.as_str(), shape.as_str(), args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> Regex {
        Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*([A-Za-z_]+)\s*\(([^)]*)\)\s*$").unwrap()
    }

    #[test]
    fn test_parse_term_definition() {
        let (term, shape, args) = parse_term_definition(&pattern(), "warm = triangle(15, 22.5, 30)").unwrap();
        assert_eq!(term, "warm");
        assert_eq!(shape, "triangle");
        assert_eq!(args, vec![15.0, 22.5, 30.0]);
    }

    #[test]
    fn test_parse_term_definition_errors() {
        assert!(matches!(
            parse_term_definition(&pattern(), "warm triangle(1, 2, 3)"),
            Err(TermSpecError::Malformed(_))
        ));
        assert!(matches!(
            parse_term_definition(&pattern(), "warm=triangle(1, two, 3)"),
            Err(TermSpecError::BadParameter { ref value, .. }) if value == "two"
        ));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "fuzzykit", "--uod", "-10", "40", "--term", "cold=z(0, 10)", "fuzzify", "5",
        ])
        .unwrap();
        assert_eq!(cli.uod, vec![-10.0, 40.0]);
        assert!(matches!(cli.command, Command::Fuzzify { value } if value == 5.0));
    }
}
