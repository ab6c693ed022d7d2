mod report;

use cardport::{
    CandidatePool, Layout, Options, PortError, RewriteMode, Substitution, check_round_trip, invert, missing_references,
    rewrite_with, scan_verbose, suggest_scored,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "CARDPORT_LOG";

/// Find, resolve and rewrite entity references in card layouts.
#[derive(Parser, Debug)]
#[command(name = "cardport")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); CARDPORT_LOG overrides it
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Force ANSI color output
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every identifier referenced by a layout
    Scan {
        /// Layout JSON file, or `-` for stdin
        layout: PathBuf,

        /// Print references as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank replacement candidates for one identifier
    Suggest {
        /// Identifier to resolve, e.g. `light.kitchen`
        identifier: String,

        /// Pool file: one identifier per line, or a JSON array
        #[arg(long)]
        pool: PathBuf,

        /// Maximum number of suggestions
        #[arg(long, default_value_t = cardport::DEFAULT_MAX_SUGGESTIONS)]
        limit: usize,

        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show references missing from a pool, with suggestions
    Missing {
        /// Layout JSON file, or `-` for stdin
        layout: PathBuf,

        /// Pool file: one identifier per line, or a JSON array
        #[arg(long)]
        pool: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply a substitution list and print the new layout
    Rewrite {
        /// Layout JSON file, or `-` for stdin
        layout: PathBuf,

        /// JSON array of `{original, replacement, location?}` entries
        #[arg(long)]
        subs: PathBuf,

        /// Honour `location` on entries
        #[arg(long)]
        per_location: bool,

        /// Apply the inverse of the list instead
        #[arg(long)]
        invert: bool,
    },

    /// Print the inverse of a substitution list
    Invert {
        /// JSON array of substitution entries
        subs: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("{path}: {source}")]
    Input { path: String, source: PortError },
    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// 2 for bad input, 1 for everything else.
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Input { .. } => 2,
            CliError::Io { .. } | CliError::Output(_) => 1,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let color = if cli.color {
        true
    } else if cli.no_color {
        false
    } else {
        io::stdout().is_terminal()
    };

    match run(cli.command, color) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
}

fn run(command: Commands, color: bool) -> Result<(), CliError> {
    match command {
        Commands::Scan { layout, json } => {
            let layout = load_layout(&layout)?;
            let report = scan_verbose(&layout, &Options::default());
            if json {
                print_json(&report.references)
            } else {
                report::print_scan(&report, color);
                Ok(())
            }
        }
        Commands::Suggest { identifier, pool, limit, json } => {
            let pool = load_pool(&pool)?;
            let options = Options { max_suggestions: limit, ..Options::default() };
            let suggestions = suggest_scored(&identifier, pool.as_slice(), &options);
            if json {
                print_json(&suggestions)
            } else {
                report::print_suggestions(&identifier, &suggestions, color);
                Ok(())
            }
        }
        Commands::Missing { layout, pool, json } => {
            let layout = load_layout(&layout)?;
            let pool = load_pool(&pool)?;
            let options = Options::default();
            let references = scan_verbose(&layout, &options).references;
            let missing: Vec<report::Unresolved<'_>> = missing_references(&references, pool.as_slice())
                .into_iter()
                .map(|reference| report::Unresolved {
                    suggestions: suggest_scored(&reference.identifier, pool.as_slice(), &options),
                    reference,
                })
                .collect();
            if json {
                print_json(&missing)
            } else {
                report::print_missing(&missing, references.len(), color);
                Ok(())
            }
        }
        Commands::Rewrite { layout, subs, per_location, invert: inverse } => {
            let layout = load_layout(&layout)?;
            let mut substitutions = load_substitutions(&subs)?;
            if inverse {
                substitutions = invert(&substitutions);
            }
            let mode = if per_location { RewriteMode::PerLocation } else { RewriteMode::Global };
            let options = Options { mode, ..Options::default() };

            if let Err(conflicts) = check_round_trip(&layout, &substitutions, &options) {
                for conflict in &conflicts {
                    tracing::warn!(%conflict, "substitution list will not invert cleanly");
                }
            }

            print_json(&rewrite_with(&layout, &substitutions, &options))
        }
        Commands::Invert { subs } => {
            let substitutions = load_substitutions(&subs)?;
            print_json(&invert(&substitutions))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_source(path: &Path) -> Result<String, CliError> {
    let io_err = |source| CliError::Io { path: path.display().to_string(), source };
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map_err(io_err)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).map_err(io_err)
    }
}

fn input_err(path: &Path) -> impl Fn(PortError) -> CliError + '_ {
    move |source| CliError::Input { path: path.display().to_string(), source }
}

fn load_layout(path: &Path) -> Result<Layout, CliError> {
    let text = read_source(path)?;
    Layout::from_json(&text).map_err(input_err(path))
}

fn load_pool(path: &Path) -> Result<CandidatePool, CliError> {
    let text = read_source(path)?;
    let pool = CandidatePool::parse(&text).map_err(input_err(path))?;
    tracing::debug!(path = %path.display(), size = pool.len(), "loaded candidate pool");
    Ok(pool)
}

fn load_substitutions(path: &Path) -> Result<Vec<Substitution>, CliError> {
    let text = read_source(path)?;
    serde_json::from_str(&text).map_err(|err| input_err(path)(PortError::from(err)))
}
