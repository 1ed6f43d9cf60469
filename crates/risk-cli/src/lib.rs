//! # risk-cli
//!
//! Command-line front end for the risk adjustment engine.
//!
//! Requests are read as JSON, either a single object or an array, from a
//! file or stdin; results are written to stdout in the same shape.
//!
//! ```text
//! risk-score --data-path ./data score --model v24 --year 2024 --input member.json
//! risk-score years --model v07
//! ```

#![warn(missing_docs)]

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use risk_engine::{ScoringEngine, ScoringError};
use risk_loader::{available_years, LoadConfig, LoadError, TableCache};
use risk_types::{ModelVersion, ScoringRequest, ScoringResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the command line.
#[derive(Error, Debug)]
pub enum CliError {
    /// Reference tables could not be loaded.
    #[error("{0}")]
    Load(#[from] LoadError),

    /// A request could not be scored.
    #[error("Request {index}: {source}")]
    Scoring {
        /// Position of the request in the input.
        index: usize,
        /// Underlying scoring error.
        source: ScoringError,
    },

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input is not a valid request.
    #[error("Invalid request JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Loaded tables carry no model key.
    #[error("Reference tables for {0} are not tagged with a model year")]
    UnkeyedTables(ModelVersion),
}

/// Result type for command-line operations.
pub type CliResult<T> = Result<T, CliError>;

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(
    name = "risk-score",
    about = "Score members against CMS-HCC and HHS-HCC risk adjustment models",
    version
)]
pub struct Cli {
    /// Reference data root
    #[arg(long, env = "RISK_DATA_PATH", default_value = "data")]
    pub data_path: PathBuf,
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one request or an array of requests
    Score(ScoreArgs),
    /// List the model years available for a version
    Years(YearsArgs),
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Model version: v24, v28 or v07
    #[arg(long, value_parser = parse_model)]
    model: ModelVersion,
    /// Model year; defaults to the newest available
    #[arg(long)]
    year: Option<u16>,
    /// Request file; reads stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Include bookkeeping fields for every request
    #[arg(long)]
    verbose: bool,
    /// Refuse tables that reference undefined categories
    #[arg(long, env = "RISK_STRICT_TABLES")]
    strict: bool,
}

#[derive(Args, Debug)]
struct YearsArgs {
    /// Model version: v24, v28 or v07
    #[arg(long, value_parser = parse_model)]
    model: ModelVersion,
}

fn parse_model(value: &str) -> Result<ModelVersion, String> {
    ModelVersion::from_code(value).ok_or_else(|| format!("unknown model version '{value}'"))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Requests {
    Many(Vec<ScoringRequest>),
    One(Box<ScoringRequest>),
}

#[derive(Serialize)]
#[serde(untagged)]
enum Results {
    Many(Vec<ScoringResult>),
    One(Box<ScoringResult>),
}

#[derive(Serialize)]
struct YearListing {
    model: ModelVersion,
    years: Vec<u16>,
}

/// Runs a parsed command, reading requests from `stdin` when no input file is given.
pub fn run<R: Read, W: Write>(cli: &Cli, stdin: R, mut stdout: W) -> CliResult<()> {
    match &cli.command {
        Command::Score(args) => {
            let results = score(cli, args, stdin)?;
            write_json(&mut stdout, &results, cli.pretty)
        }
        Command::Years(args) => {
            let years = available_years(&cli.data_path, args.model)?;
            let listing = YearListing {
                model: args.model,
                years,
            };
            write_json(&mut stdout, &listing, cli.pretty)
        }
    }
}

fn score<R: Read>(cli: &Cli, args: &ScoreArgs, stdin: R) -> CliResult<Results> {
    let requests: Requests = match &args.input {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => serde_json::from_reader(stdin)?,
    };

    let config = LoadConfig {
        strict: args.strict,
        ..LoadConfig::default()
    };
    let cache = TableCache::with_config(&cli.data_path, config);
    let tables = cache.get_or_load(args.model, args.year)?;
    let key = tables.key().ok_or(CliError::UnkeyedTables(args.model))?;
    let stats = tables.stats();
    tracing::info!(
        model = %key,
        definitions = stats.definitions,
        weights = stats.weights,
        "reference tables loaded"
    );

    let engine = ScoringEngine::new(Arc::clone(&tables), key);
    let score_one = |index: usize, mut request: ScoringRequest| -> CliResult<ScoringResult> {
        request.verbose |= args.verbose;
        engine
            .score(&request)
            .map_err(|source| CliError::Scoring { index, source })
    };

    Ok(match requests {
        Requests::One(request) => Results::One(Box::new(score_one(0, *request)?)),
        Requests::Many(requests) => Results::Many(
            requests
                .into_iter()
                .enumerate()
                .map(|(index, request)| score_one(index, request))
                .collect::<CliResult<Vec<_>>>()?,
        ),
    })
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> CliResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
