use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use catalog::Catalog;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use cli::Result;
use cli::commands::{run_browse, run_query, run_show};
use engine::{CategoryFilter, FeedConfig, FilterState, SearchComposition, SortMode};
use tracing::{Level, error};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "feedctl", author, version, about, long_about = None)]
struct Args {
    /// Catalog JSON file with categories, authors and videos
    #[arg(long)]
    catalog: PathBuf,

    /// Optional feed config JSON; unset fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every video matching a filter, in feed order
    Query(FilterArgs),
    /// Page through the feed as infinite scroll would
    Browse {
        #[command(flatten)]
        filter: FilterArgs,

        /// Stop after this many pages
        #[arg(long)]
        pages: Option<usize>,

        /// Override the simulated page load latency
        #[arg(long)]
        latency_ms: Option<u64>,
    },
    /// Print the detail view of one video
    Show {
        video_id: String,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Category id, or "all"
    #[arg(long, default_value = "all")]
    category: String,

    /// Free-text search over title, description, tags and location
    #[arg(long, default_value = "")]
    search: String,

    #[arg(long, value_enum, default_value_t = SortArg::Popular)]
    sort: SortArg,

    /// Narrow search hits to the selected category
    #[arg(long)]
    conjunctive: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Popular,
    Recent,
    Trending,
}

impl From<SortArg> for SortMode {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Popular => Self::Popular,
            SortArg::Recent => Self::Recent,
            SortArg::Trending => Self::Trending,
        }
    }
}

impl FilterArgs {
    fn apply(&self, config: &mut FeedConfig) -> FilterState {
        if self.conjunctive {
            config.search_composition = SearchComposition::Conjunctive;
        }
        FilterState {
            category: CategoryFilter::from_tab(&self.category),
            search: self.search.clone(),
            sort: self.sort.into(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "feedctl failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let catalog = Arc::new(Catalog::from_json_file(&args.catalog)?);
    let mut config = match &args.config {
        Some(path) => FeedConfig::from_json_file(path)?,
        None => FeedConfig::default(),
    };
    let now = Utc::now();
    let mut out = io::stdout().lock();

    match args.command {
        Commands::Query(filter) => {
            let filter = filter.apply(&mut config);
            run_query(&catalog, &config, &filter, now, &mut out)?;
        }
        Commands::Browse {
            filter,
            pages,
            latency_ms,
        } => {
            let filter = filter.apply(&mut config);
            if let Some(latency_ms) = latency_ms {
                config.load_latency_ms = latency_ms;
            }
            run_browse(catalog, &config, filter, pages, now, &mut out)?;
        }
        Commands::Show { video_id } => {
            run_show(catalog, &config, &video_id, now, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.as_str()))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .try_init();
}
