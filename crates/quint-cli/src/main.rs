//! Quint CLI - validate JSON5 files and convert them to strict JSON.
//!
//! This is the main entry point for the `quint` binary. It uses clap for
//! argument parsing, decodes the target with the quint library, and either
//! reports validity or emits the strict-JSON conversion to stdout or a
//! file.

mod convert;
mod error;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use error::{CliError, Result};

const ERR_NO_TARGET: &str = "No target file specified.";
const VALID_JSON5: &str = "Valid JSON5";
const JSON_CONVERTED: &str = "JSON5 converted to JSON";
const DECODING_ERROR: &str = "Error found when parsing JSON5 file";

/// Quint - a JSON5 parser and encoder
///
/// Validates JSON5 documents or converts them to strict JSON.
#[derive(Parser, Debug)]
#[command(name = "quint")]
#[command(author = "Quint Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "quint is a JSON5 parser and encoder.", long_about = None)]
struct Cli {
    /// Path to the target JSON5 file
    target_path: Option<PathBuf>,

    /// Path to the output JSON file
    #[arg(short, long)]
    out_file: Option<PathBuf>,

    /// Indentation level for the output JSON file
    #[arg(short, long)]
    space: Option<usize>,

    /// Validate the input JSON5 file without outputting
    #[arg(short = 'v', long)]
    validate: bool,

    /// Show version and os information
    #[arg(short, long)]
    info: bool,

    /// Enable verbose logging
    #[arg(long, env = "QUINT_VERBOSE")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        },
    }
}

/// Initialize the logging system.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))?;

    Ok(())
}

/// Execute the CLI request and map outcomes to exit codes.
fn run(cli: Cli) -> Result<ExitCode> {
    if cli.info {
        println!("{}", version_info());
        return Ok(ExitCode::SUCCESS);
    }

    let Some(target) = cli.target_path else {
        println!("{ERR_NO_TARGET}");
        let mut command = Cli::command();
        // Help output failures are not actionable; ignore them.
        let _ = command.print_help();
        return Ok(ExitCode::from(2));
    };

    let text = fs::read_to_string(&target).map_err(|_| CliError::TargetNotReadable)?;
    tracing::debug!(bytes = text.len(), path = %target.display(), "read target");

    let value = match quint::from_str(&text) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("{DECODING_ERROR} {}:", target.display());
            eprintln!("{err}");
            return Ok(ExitCode::FAILURE);
        },
    };

    if cli.validate {
        println!("{VALID_JSON5}");
        return Ok(ExitCode::SUCCESS);
    }

    let rendered = convert::render(&convert::to_json(&value), cli.space)?;
    match cli.out_file {
        Some(path) => {
            println!("output to {}", path.display());
            fs::write(&path, rendered + "\n")?;
        },
        None => {
            println!("{JSON_CONVERTED}");
            println!("{rendered}");
        },
    }
    Ok(ExitCode::SUCCESS)
}

/// Version plus platform information for `--info`.
fn version_info() -> String {
    format!(
        "quint {} on {} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_validate() {
        let cli = Cli::parse_from(["quint", "config.json5", "--validate"]);
        assert!(cli.validate);
        assert_eq!(cli.target_path, Some(PathBuf::from("config.json5")));
    }

    #[test]
    fn test_cli_parse_short_flags() {
        let cli = Cli::parse_from(["quint", "in.json5", "-o", "out.json", "-s", "4"]);
        assert_eq!(cli.out_file, Some(PathBuf::from("out.json")));
        assert_eq!(cli.space, Some(4));
        assert!(!cli.validate);
    }

    #[test]
    fn test_cli_parse_info() {
        let cli = Cli::parse_from(["quint", "-i"]);
        assert!(cli.info);
        assert_eq!(cli.target_path, None);
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["quint", "--verbose", "x.json5"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_version_info_mentions_platform() {
        let info = version_info();
        assert!(info.starts_with("quint "));
        assert!(info.contains(std::env::consts::OS));
    }
}
