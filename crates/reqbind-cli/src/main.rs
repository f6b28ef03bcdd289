//! # reqbind-cli
//!
//! Command-line front end for the request data mapper.
//!
//! `reqbind map` loads a target description and a request from YAML files,
//! maps the request onto the target and prints the outcome as JSON.
//! `reqbind size` evaluates a body size limit literal.

mod fixture;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fixture::{MappingFixture, RequestFixture};
use reqbind_mapper::{DataMapper, Error, MapperConfig};
use reqbind_request::{exceeds_limit, parse_size_limit};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit code when the request data was rejected
const REJECTED: u8 = 2;

#[derive(Parser)]
#[command(name = "reqbind")]
#[command(about = "Map request data onto objects and report validation errors")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a request onto a target
    Map {
        /// Target description (YAML)
        #[arg(short, long)]
        target: PathBuf,

        /// Request description (YAML)
        #[arg(short, long)]
        request: PathBuf,

        /// Mapper configuration (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Evaluate a body size limit such as `8M` or `0x400`
    Size {
        /// Limit literal
        literal: String,

        /// Check whether this content length exceeds the limit
        #[arg(long)]
        content_length: Option<u64>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Map {
            target,
            request,
            config,
        } => run_map(&target, &request, config.as_deref()),
        Commands::Size {
            literal,
            content_length,
        } => {
            run_size(&literal, content_length);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run_map(target: &Path, request: &Path, config: Option<&Path>) -> anyhow::Result<ExitCode> {
    let fixture = MappingFixture::from_yaml_str(&read(target)?)
        .with_context(|| format!("Invalid target description {}", target.display()))?;
    let request = RequestFixture::from_yaml_str(&read(request)?)
        .with_context(|| format!("Invalid request description {}", request.display()))?
        .build()?;
    let config = match config {
        Some(path) => MapperConfig::from_yaml_str(&read(path)?)
            .with_context(|| format!("Invalid configuration {}", path.display()))?,
        None => MapperConfig::default(),
    };

    let object = fixture.build_target()?;
    info!(class = %object.class(), method = %request.method(), "Mapping request");

    let mut mapper = DataMapper::new(object.clone(), fixture.build_fields()?)
        .with_config(config)
        .with_metadata(fixture.build_metadata()?);
    if let Some(catalog) = fixture.build_catalog() {
        debug!("Using message catalog from target description");
        mapper.set_translator(Rc::new(catalog));
    }

    let (output, code) = match mapper.map(&request) {
        Ok(()) => (
            json!({ "status": "mapped", "target": mapper.target().to_json() }),
            ExitCode::SUCCESS,
        ),
        Err(Error::Mapping(err)) => (
            json!({
                "status": "rejected",
                "message": err.message(),
                "errors": err.result().to_json(),
                "target": mapper.target().to_json(),
            }),
            ExitCode::from(REJECTED),
        ),
        Err(err) => return Err(err).context("Mapping failed"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

fn run_size(literal: &str, content_length: Option<u64>) {
    let mut output = json!({
        "literal": literal,
        "bytes": parse_size_limit(literal),
    });
    if let Some(length) = content_length {
        output["content_length"] = json!(length);
        output["exceeds"] = json!(exceeds_limit(literal, length));
    }
    println!("{output}");
}
