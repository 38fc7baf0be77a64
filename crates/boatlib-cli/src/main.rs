//! boatc - compiles game content into the engine's line-record format.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boatlib::graph::{expand, ExpandOptions, SyntheticIdScheme};
use boatlib::RecordContext;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod inspect;
mod plants;

use plants::Plant;

/// Compile game content into the engine's bracketed line-record format.
#[derive(Parser, Debug)]
#[command(name = "boatc", author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Author, expand and compile plant content.
    Plants {
        /// Plant to compile (all plants when omitted).
        #[arg(short, long, value_enum)]
        plant: Option<Plant>,

        /// How waiting-state ids are generated.
        #[arg(short, long, value_enum, default_value_t = Scheme::DayIndexed)]
        scheme: Scheme,

        /// Write the artifact to a file instead of stdout.
        #[arg(short, long, env = "BOATC_OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Print a plant's expanded growth graph as Graphviz DOT.
    Dot {
        #[arg(short, long, value_enum)]
        plant: Plant,

        #[arg(short, long, value_enum, default_value_t = Scheme::DayIndexed)]
        scheme: Scheme,
    },

    /// Parse a data file and summarize its records.
    Inspect {
        /// File in the line-record format.
        path: PathBuf,

        /// Dump the parsed records as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scheme {
    /// `{id}__day{n}`
    DayIndexed,
    /// `{id}_`, `{id}__`, ...
    Suffix,
}

impl From<Scheme> for ExpandOptions {
    fn from(scheme: Scheme) -> Self {
        let scheme = match scheme {
            Scheme::DayIndexed => SyntheticIdScheme::DayIndexed,
            Scheme::Suffix => SyntheticIdScheme::Suffix,
        };
        ExpandOptions { scheme }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Plants {
            plant,
            scheme,
            output,
        } => {
            let plants = plant.map_or(Plant::ALL.to_vec(), |p| vec![p]);
            let options = ExpandOptions::from(scheme);
            let mut ctx = RecordContext::new();
            let (collection, count) = ctx
                .collect(|ctx| plants::define_plants(ctx, &plants, &options))
                .context("failed to compile plants")?;
            info!(records = count, "compiled plants");
            emit(&collection.encode(), output.as_deref())?;
        }

        Commands::Dot { plant, scheme } => {
            let graph = expand(plant.graph(), &ExpandOptions::from(scheme))
                .with_context(|| format!("failed to expand {}", plant.name()))?;
            print!("{}", graph.to_dot());
        }

        Commands::Inspect { path, json } => {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let records = boatlib::parse(&data)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", inspect::summarize(&records));
            }
        }
    }

    Ok(())
}

/// Prints the artifact, or writes it to `output`.
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote artifact");
        }
        None => println!("{text}"),
    }
    Ok(())
}
