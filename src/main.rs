use std::io;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use court_rotation::api::state::AppState;
use court_rotation::calculate::suggested_round_count;
use court_rotation::config::AppConfig;
use court_rotation::engine::{self, ScheduleBuilder};
use court_rotation::models::{Roster, Schedule};
use court_rotation::session;

#[derive(Parser)]
#[command(name = "court-rotation")]
#[command(about = "Fair 2v2 rotation schedules with win tracking")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./rotation.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a schedule and print it
    Generate {
        /// Comma-separated player names
        #[arg(long)]
        players: String,

        /// Number of rounds
        #[arg(long, allow_hyphen_values = true)]
        rounds: String,

        /// Sampling seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the schedule as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a schedule, then enter winners round by round
    Play {
        /// Comma-separated player names
        #[arg(long)]
        players: String,

        /// Number of rounds (defaults to the suggested count)
        #[arg(long, allow_hyphen_values = true)]
        rounds: Option<String>,

        /// Sampling seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Suggest a round count giving everyone the same number of games
    Suggest {
        /// Roster size
        #[arg(long)]
        count: usize,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn build_schedule(
    config: &AppConfig,
    roster: Roster,
    rounds: u32,
    seed: Option<u64>,
) -> Result<Schedule> {
    let seed = seed.unwrap_or_else(rand::random);
    let schedule =
        ScheduleBuilder::new(config.scheduler.clone()).build_seeded(roster, rounds, seed)?;
    tracing::debug!(seed, fingerprint = %schedule.fingerprint(), "Schedule generated");
    Ok(schedule)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(level, cli.json_logs);

    tracing::debug!("Starting court-rotation v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Generate {
            players,
            rounds,
            seed,
            json,
        } => {
            let rounds = engine::parse_round_count(&rounds)?;
            let roster = Roster::parse_with_minimum(&players, config.scheduler.min_roster_size)?;
            let schedule = build_schedule(&config, roster, rounds, seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else {
                print!("{}", session::render_schedule(&schedule));
                println!("\nSeed: {}", schedule.seed());
            }
        }
        Commands::Play {
            players,
            rounds,
            seed,
        } => {
            let roster = Roster::parse_with_minimum(&players, config.scheduler.min_roster_size)?;
            let rounds = match rounds {
                Some(text) => engine::parse_round_count(&text)?,
                None => suggested_round_count(roster.len()),
            };
            let mut schedule = build_schedule(&config, roster, rounds, seed)?;
            print!("{}", session::render_schedule(&schedule));

            let stdin = io::stdin();
            let mut stdout = io::stdout();
            session::play(&mut schedule, stdin.lock(), &mut stdout)?;
        }
        Commands::Suggest { count } => {
            if count < config.scheduler.min_roster_size {
                bail!(
                    "Need at least {} players, got {}",
                    config.scheduler.min_roster_size,
                    count
                );
            }
            let rounds = suggested_round_count(count);
            println!(
                "{} rounds give each of {} players {} games",
                rounds,
                count,
                rounds as usize * engine::PLAYERS_PER_ROUND / count
            );
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(config.scheduler, config.server.cors_origin);
            let app = court_rotation::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
