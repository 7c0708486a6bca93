use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "refsource", about = "Referral source attribution for owned sites")]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a visit without emitting anything
    Classify(commands::classify::ClassifyArgs),
    /// Classify a visit and deliver it to a sink
    Track(commands::track::TrackArgs),
    /// Print the classification cascade in evaluation order
    Rules(commands::rules::RulesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Classify(args) => commands::classify::run(args),
        Commands::Track(args) => commands::track::run(args).await,
        Commands::Rules(args) => commands::rules::run(args),
    }
}
