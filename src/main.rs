use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use csv2srs::generator::OutputFormat;
use csv2srs::interfaces::convert_dir;
use csv2srs::parser::MalformedRowPolicy;
use csv2srs::Settings;

/// Convert CSV rule files to rule-set files
///
/// Each CSV file must start with a header row, which is skipped. Every
/// other row holds two columns: the kind of rule (domain, domain_suffix,
/// package_name, process_name or ip_cidr) and its value, e.g.:
///
///     rule_type,value
///     domain,example.com
///     domain_suffix,example.org
#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory containing input CSV files [default: ./csv]
    #[arg(short, long, value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// Directory to save output rule-set files [default: ./srs]
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Output format [default: binary]
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Rule-set format version to write
    #[arg(long, value_name = "N")]
    rule_set_version: Option<u8>,

    /// What to do with rows that do not have exactly two columns [default: reject]
    #[arg(short, long, value_enum)]
    malformed_rows: Option<MalformedRowPolicy>,

    /// Stop at the first file that fails to convert
    #[arg(long)]
    fail_fast: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => {
            Settings::load(path).with_context(|| format!("loading '{}'", path.display()))?
        }
        None => Settings::default(),
    };

    // Command line arguments override the config file
    if let Some(dir) = &args.input_dir {
        settings.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    if let Some(format) = args.format {
        settings.format = format;
    }
    if let Some(version) = args.rule_set_version {
        settings.version = version;
    }
    if let Some(policy) = args.malformed_rows {
        settings.malformed_rows = policy;
    }
    if args.fail_fast {
        settings.fail_fast = true;
    }
    if let Some(level) = &args.log_level {
        settings.log_level = level.clone();
    }

    settings.validate()?;
    Ok(settings)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let settings = load_settings(&args)?;

    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));

    let options = settings.convert_options()?;
    let report = convert_dir(
        &settings.input_dir,
        &settings.output_dir,
        settings.input_extension(),
        &options,
        settings.fail_fast,
    )
    .with_context(|| format!("processing '{}'", settings.input_dir.display()))?;

    info!(
        "{} file(s) converted, {} failed",
        report.converted.len(),
        report.failed.len()
    );

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        if settings.fail_fast {
            error!("Stopped after the first failure");
        }
        Ok(ExitCode::FAILURE)
    }
}
