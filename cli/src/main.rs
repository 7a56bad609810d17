mod display;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use display::Display;
use sift_core::{build_federation, EngineConfig, SuperEngine, MINIMUM_SCORE};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Boolean and TF-IDF search over in-memory collections", long_about = None)]
struct Cli {
    /// Collection input (JSON/JSONL file or directory); repeat for several collections
    #[arg(long = "input", global = true)]
    inputs: Vec<PathBuf>,
    /// Drop vector results scoring at or below this value
    #[arg(long, default_value_t = MINIMUM_SCORE, global = true)]
    min_score: f64,
    /// Number of results to print per query
    #[arg(long, default_value_t = 10, global = true)]
    top: usize,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read queries from stdin until EOF
    Repl {
        #[arg(long, value_enum, default_value_t = Mode::Vector)]
        mode: Mode,
    },
    /// Run a single query
    Query {
        #[arg(long, value_enum, default_value_t = Mode::Vector)]
        mode: Mode,
        query: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Ranked TF-IDF cosine search across all collections
    Vector,
    /// AND/OR/NOT membership search, per collection
    Boolean,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    if cli.inputs.is_empty() {
        anyhow::bail!("at least one --input is required");
    }

    let start = Instant::now();
    let engine = build_federation(cli.inputs.as_slice(), EngineConfig::with_min_score(cli.min_score)?)?;
    tracing::info!(elapsed = ?start.elapsed(), num_docs = engine.num_docs(), "collections indexed");

    let display = Display::new(&engine, cli.top);
    let stdout = io::stdout();
    match cli.command {
        Commands::Query { mode, query } => run_query(&engine, &display, &mut stdout.lock(), mode, &query)?,
        Commands::Repl { mode } => {
            let stdin = io::stdin();
            let mut out = stdout.lock();
            loop {
                writeln!(out, "Type query :")?;
                out.flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                run_query(&engine, &display, &mut out, mode, line.trim())?;
            }
        }
    }
    Ok(())
}

fn run_query(engine: &SuperEngine, display: &Display<'_>, out: &mut impl Write, mode: Mode, query: &str) -> Result<()> {
    match mode {
        Mode::Vector => {
            let start = Instant::now();
            let res = engine.search(query);
            display.show_ranked(out, &res, start.elapsed())?;
        }
        Mode::Boolean => {
            for e in engine.engines() {
                let start = Instant::now();
                let res = e.bool_search(query);
                display.show_boolean(out, e.name(), &res, start.elapsed())?;
            }
        }
    }
    Ok(())
}
