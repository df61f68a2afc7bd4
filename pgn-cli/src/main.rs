//! PGN Decoder CLI Application
//!
//! Command-line front end for the pgn-decoder library. It stands in for the
//! transport side of the gateway:
//! - Reads frame messages (NDJSON) from files or stdin
//! - Decodes them on a bounded worker pool, keeping input order
//! - Writes time-series messages (NDJSON) to stdout or a file
//! - Prints a summary of unknown and malformed traffic

use anyhow::{Context, Result};
use clap::Parser;
use pgn_decoder::{Decoder, DecoderConfig, SchemaRegistry};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

mod config;
mod pipeline;
mod report;

use config::AppConfig;
use pipeline::Pipeline;
use report::DecodeSummary;

/// PGN Decoder - Decode vehicle network frames into time-series values
#[derive(Parser, Debug)]
#[command(name = "pgn-cli")]
#[command(about = "Decode J1939 PGN frames (NDJSON) into time-series messages", long_about = None)]
#[command(version)]
struct Args {
    /// NDJSON frame files (default: stdin)
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Output file for series messages (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of decode worker threads
    #[arg(long, value_name = "COUNT")]
    workers: Option<usize>,

    /// Number of lines decoded per batch
    #[arg(long, value_name = "COUNT")]
    batch_size: Option<usize>,

    /// Only decode this PGN identifier (can be repeated)
    #[arg(long = "pgn", value_name = "ID")]
    pgns: Vec<String>,

    /// Route name attached to outbound messages
    #[arg(long, value_name = "NAME")]
    route: Option<String>,

    /// Write route and metadata around each series body
    #[arg(long)]
    envelope: bool,

    /// Print the built-in PGN catalog and exit
    #[arg(long)]
    list: bool,

    /// Do not print the summary at the end
    #[arg(long)]
    no_summary: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("PGN Decoder CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", pgn_decoder::VERSION);

    let registry = Arc::new(SchemaRegistry::builtin().context("Built-in PGN catalog is invalid")?);

    if args.list {
        print_catalog(&registry)?;
        return Ok(());
    }

    let config = resolve_config(&args)?;
    decode_mode(&config, registry, args.quiet)
}

/// Load the config file (if any) and apply command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if !args.inputs.is_empty() {
        config.input.files = args.inputs.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = Some(output.clone());
    }
    if let Some(workers) = args.workers {
        config.decoding.workers = workers;
    }
    if let Some(batch_size) = args.batch_size {
        config.decoding.batch_size = batch_size;
    }
    if !args.pgns.is_empty() {
        config.decoding.identifiers = Some(args.pgns.clone());
    }
    if let Some(route) = &args.route {
        config.output.route = route.clone();
    }
    if args.envelope {
        config.output.envelope = true;
    }
    if args.no_summary {
        config.report.summary = false;
    }

    config.validate()?;
    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Decode all inputs and write series messages
fn decode_mode(config: &AppConfig, registry: Arc<SchemaRegistry>, quiet: bool) -> Result<()> {
    let mut decoder_config = DecoderConfig::new();
    if let Some(identifiers) = &config.decoding.identifiers {
        decoder_config = decoder_config.with_message_filter(identifiers);
    }
    let decoder = Decoder::with_config(registry, decoder_config);

    let pipeline = Pipeline::new(
        &decoder,
        config.decoding.workers,
        config.decoding.batch_size,
        config.output.route.as_str(),
        config.output.envelope,
    )?;

    let mut writer: Box<dyn Write> = match &config.output.path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut summary = DecodeSummary::default();

    if config.input.files.is_empty() {
        log::info!("Reading frames from stdin");
        pipeline.run(io::stdin().lock(), &mut writer, &mut summary)?;
    } else {
        for path in &config.input.files {
            log::info!("Decoding frame file: {:?}", path);
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file: {:?}", path))?;
            pipeline.run(BufReader::new(file), &mut writer, &mut summary)?;
        }
    }

    writer.flush().context("Failed to flush output")?;

    if config.report.summary && !quiet {
        eprint!("{}", summary.render());
    }

    Ok(())
}

/// Print the registry contents
fn print_catalog(registry: &SchemaRegistry) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let stats = registry.stats();
    writeln!(out, "PGN catalog: {} messages, {} parameters", stats.num_messages, stats.num_parameters)?;

    for message in registry.iter() {
        writeln!(out, "\n{}  {}", message.identifier, message.display_name)?;
        for parameter in &message.parameters {
            writeln!(
                out,
                "  - {}: bytes {}, offset {}, resolution {}",
                parameter.label(),
                parameter.byte_range,
                parameter.offset,
                parameter.resolution
            )?;
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
