//! Rift Assert CLI
//!
//! Validates a recorded HTTP response against a set of expectations, or shows
//! which body parser a `Content-Type` dispatches to.
//!
//! Usage:
//!   rift-assert check --response <file> --expectations <file> [OPTIONS]
//!   rift-assert content-type <value>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rift_assert::assertion::failure_messages;
use rift_assert::response::RecordedResponse;
use rift_assert::{AssertConfig, ContentTypeRegistry, Expectations, ValidationResult};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Rift response assertions
#[derive(Parser, Debug)]
#[command(name = "rift-assert")]
#[command(author, version, about = "Validate recorded HTTP responses")]
struct Args {
    /// Assertion configuration file (YAML or JSON)
    #[arg(short, long, global = true, env = "RIFT_ASSERT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a recorded response against expectations
    Check {
        /// Recorded response (YAML or JSON)
        #[arg(short, long)]
        response: PathBuf,

        /// Expectations (YAML or JSON)
        #[arg(short, long)]
        expectations: PathBuf,

        /// Output format: text (default), json
        #[arg(short, long, default_value = "text")]
        output: String,
    },
    /// Print the parser family for a Content-Type header value
    ContentType { value: String },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(passed) => std::process::exit(if passed { 0 } else { 1 }),
        Err(e) => {
            eprintln!("{RED}Error:{RESET} {e:#}");
            std::process::exit(2);
        }
    }
}

fn run(args: Args) -> Result<bool> {
    let config = match &args.config {
        Some(path) => AssertConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AssertConfig::default(),
    };
    let registry = ContentTypeRegistry::from_config(&config.parsers)
        .context("Failed to register configured parsers")?;

    match args.command {
        Command::Check {
            response,
            expectations,
            output,
        } => check(&response, &expectations, &output, &registry, &config),
        Command::ContentType { value } => {
            match registry.family_for(&value) {
                Some(family) => println!("{family}"),
                None => println!("{DIM}(default parser){RESET}"),
            }
            Ok(true)
        }
    }
}

fn check(
    response_path: &Path,
    expectations_path: &Path,
    output: &str,
    registry: &ContentTypeRegistry,
    config: &AssertConfig,
) -> Result<bool> {
    let response = load_response(response_path)
        .with_context(|| format!("Failed to load response from {}", response_path.display()))?
        .into_response()?;
    let spec = Expectations::from_file(expectations_path)
        .and_then(Expectations::into_response_spec)
        .with_context(|| {
            format!(
                "Failed to load expectations from {}",
                expectations_path.display()
            )
        })?;

    tracing::debug!(
        status = response.status_code(),
        assertions = spec.body_matchers().len() + spec.cookie_assertions().len(),
        "Validating response"
    );
    let results = spec.validate(&response, registry, config);
    let passed = results.iter().all(ValidationResult::is_success);

    if output == "json" {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results);
    }
    Ok(passed)
}

fn load_response(path: &Path) -> rift_assert::Result<RecordedResponse> {
    let contents = std::fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(serde_yaml::from_str(&contents)?)
    }
}

fn print_results(results: &[ValidationResult]) {
    let failures = failure_messages(results);
    for message in &failures {
        println!("{RED}✗{RESET} {}", message.trim_end());
        println!();
    }
    if failures.is_empty() {
        println!("{GREEN}{BOLD}✓ {} assertion(s) passed{RESET}", results.len());
    } else {
        println!(
            "{RED}{BOLD}{} of {} assertion(s) failed{RESET}",
            failures.len(),
            results.len()
        );
    }
}
