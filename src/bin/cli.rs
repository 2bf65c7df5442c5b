use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use football_feed::{parse_start_date, Config, FeedService, League, Provider};

#[derive(Debug, Parser)]
#[command(name = "football-feed", about = "NFL and college football schedules and scores")]
struct Cli {
    /// Serve from the mock schedule file instead of live providers
    #[arg(long, global = true)]
    mock: bool,

    /// Override the configured provider for this run
    #[arg(long, global = true)]
    provider: Option<Provider>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Seven days of games starting at a date
    Schedule {
        #[arg(long)]
        start_date: String,
        #[arg(long, default_value = "NFL")]
        league: League,
        /// Drop finished and postponed games
        #[arg(long)]
        upcoming_only: bool,
    },
    /// Quarter-by-quarter score for one event
    Score {
        #[arg(long)]
        event_id: String,
        #[arg(long)]
        start_date: String,
        /// Only scan this league's scoreboard
        #[arg(long)]
        league: Option<League>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables and settings
    let mut config = Config::from_env()?;
    config.mock_mode |= cli.mock;
    if let Some(provider) = cli.provider {
        config.schedule_provider = provider;
        config.scores_provider = provider;
    }

    let service = FeedService::from_config(&config);

    let output = match cli.command {
        Command::Schedule {
            start_date,
            league,
            upcoming_only,
        } => {
            let start = parse_date(&start_date)?;
            let games = service
                .schedule(start, league, upcoming_only)
                .await
                .context("Failed to fetch schedule")?;
            serde_json::to_string_pretty(&games)?
        }
        Command::Score {
            event_id,
            start_date,
            league,
        } => {
            let start = parse_date(&start_date)?;
            let score = service
                .game_score(&event_id, start, league)
                .await
                .context("Failed to fetch game")?;
            serde_json::to_string_pretty(&score)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn parse_date(raw: &str) -> Result<chrono::NaiveDate> {
    parse_start_date(raw).ok_or_else(|| anyhow!("Invalid startDate format: {}", raw))
}
