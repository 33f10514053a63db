use std::path::PathBuf;

use clap::Parser;
use efforts::{
    config::RunConfig,
    display::{UnitSystem, render_leaderboard, render_summary},
    run,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "efforts")]
#[command(
    about = "Generate a best-efforts leaderboard from gpx files",
    long_about = None
)]
struct Args {
    /// Directory containing the gpx files
    #[arg(long, value_name = "DIR", default_value = "gpx")]
    gpx_dir: PathBuf,

    /// Glob filter(s) for the gpx files (default: *.gpx)
    #[arg(long = "gpx-filters", value_name = "FILTERS")]
    gpx_filters: Vec<String>,

    /// Leaderboard file
    #[arg(long, value_name = "PATH", default_value = "best-efforts.json")]
    efforts_file: PathBuf,

    /// Only display the stored leaderboard: do not add files
    #[arg(long)]
    display_only: bool,

    /// Display imperial distances and speeds
    #[arg(long)]
    imperial: bool,

    /// Quiet output, still displays warnings
    #[arg(long)]
    quiet: bool,

    /// Worker threads used to analyze files
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        Self {
            gpx_dir: args.gpx_dir,
            gpx_filters: args.gpx_filters,
            efforts_file: args.efforts_file,
            display_only: args.display_only,
            units: if args.imperial {
                UnitSystem::Imperial
            } else {
                UnitSystem::Metric
            },
            quiet: args.quiet,
            jobs: args.jobs,
            ..Default::default()
        }
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = RunConfig::from(Args::parse());
    init_logging(config.quiet);

    let outcome = run(&config)?;

    if !config.display_only {
        print!("{}", render_summary(&outcome.summary));
    }
    print!("{}", render_leaderboard(&outcome.leaderboard, config.units));

    Ok(())
}
