use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use induced_trees::graph::{Dimensions, Lattice};
use induced_trees::io::{read_shape, ShapeFile};
use induced_trees::search::{Pruning, Search, SearchConfig};

#[derive(Parser)]
#[command(name = "induced-trees", version)]
#[command(about = "Search a cubic lattice for its largest void-free induced subtree", long_about = None)]
struct Cli {
    /// Grid file rewritten with every new best shape
    output: PathBuf,

    /// Starting shape; cells marked '_' are removed from the lattice
    #[arg(long, conflicts_with = "dims")]
    input: Option<PathBuf>,

    /// Lattice extents when no starting shape is given
    #[arg(long, default_value = "3x3x3")]
    dims: Dimensions,

    /// Worker threads [default: from --config, else available parallelism]
    #[arg(long)]
    threads: Option<usize>,

    /// Only explore children that exclude the fewest candidates (faster, not exhaustive)
    #[arg(long, default_value_t = false)]
    prune_min_excluded: bool,

    /// JSON search configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a JSON run summary here when the search finishes
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => SearchConfig::from_json_file(path)
            .with_context(|| format!("Failed to load search configuration {}", path.display()))?,
        None => SearchConfig::default(),
    };
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if cli.prune_min_excluded {
        config.pruning = Pruning::MinExcluded;
    }

    let lattice = match &cli.input {
        Some(path) => {
            let start = read_shape(path)
                .with_context(|| format!("Failed to read starting shape {}", path.display()))?;
            let lattice = Lattice::restricted_to(&start);
            info!(
                path = %path.display(),
                dims = %lattice.dims(),
                removed = lattice.num_disabled(),
                "loaded starting shape"
            );
            lattice
        }
        None => Lattice::new(cli.dims),
    };

    let search = Search::new(&lattice, config, ShapeFile::new(&cli.output))
        .context("Failed to start search workers")?;
    let outcome = search
        .run()
        .with_context(|| format!("Search aborted while writing {}", cli.output.display()))?;

    if outcome.best.is_none() {
        warn!("lattice has no enabled vertices; nothing was written");
    }

    println!("{:.3} seconds", outcome.elapsed.as_secs_f64());
    println!("Largest size = {}", outcome.best_size());

    if let Some(path) = &cli.summary {
        let json = serde_json::to_string_pretty(&outcome.summary())?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
    }

    Ok(())
}
