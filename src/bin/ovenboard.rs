//! ovenboard CLI, the operator interface to the kitchen oven board.
//!
//! The subcommands stand in for the dashboard page's buttons and inputs:
//! each mutation fetches the current board from the store, applies one
//! transition, and mirrors the result back as two independent requests.

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::warn;

use ovenboard::board::{Board, Transition};
use ovenboard::client::StoreClient;
use ovenboard::config::Config;
use ovenboard::sync::Watcher;
use ovenboard::view;

#[derive(Parser)]
#[command(name = "ovenboard", about = "Kitchen oven tracking dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch the board, refreshing from the store every 30 seconds
    Watch,
    /// Fetch the board once and print it
    Status,
    /// Load a batch into an empty oven and start cooking
    Start {
        /// Oven number
        oven: u32,
        /// Batch size, in chickens or skewers per the configured unit
        #[arg(value_parser = clap::value_parser!(u32).range(1..=100))]
        batch_size: u32,
    },
    /// Move a cooking oven's expected end time
    Adjust {
        /// Oven number
        oven: u32,
        /// Minutes from now until the batch should come out
        #[arg(allow_hyphen_values = true)]
        minutes: i64,
    },
    /// Mark a cooking batch as ready
    Finish {
        /// Oven number
        oven: u32,
    },
    /// Count leftovers after the rush and clear the oven
    PostRush {
        /// Oven number
        oven: u32,
        /// Chickens left after the rush
        chickens_left: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    let client = StoreClient::new(&config.store_url);

    match cli.command {
        Command::Watch => cmd_watch(client, &config).await,
        Command::Status => cmd_status(client, &config).await,
        Command::Start { oven, batch_size } => {
            cmd_transition(client, &config, |board| {
                board.start_cooking(oven, batch_size, Utc::now())
            })
            .await
        }
        Command::Adjust { oven, minutes } => {
            cmd_transition(client, &config, |board| {
                board.adjust_cooking_time(oven, minutes, Utc::now())
            })
            .await
        }
        Command::Finish { oven } => {
            cmd_transition(client, &config, |board| {
                board.finish_cooking(oven, Utc::now())
            })
            .await
        }
        Command::PostRush {
            oven,
            chickens_left,
        } => {
            cmd_transition(client, &config, |board| {
                board.log_post_rush(oven, chickens_left, Utc::now())
            })
            .await
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build a board populated from the store's current snapshot.
async fn load_board(client: &StoreClient, config: &Config) -> anyhow::Result<Board> {
    let mut board = Board::new(config.oven_count, config.batch_policy);
    let snapshot = client.fetch_states().await?;
    board.apply_snapshot(&snapshot);
    Ok(board)
}

async fn cmd_watch(client: StoreClient, config: &Config) -> anyhow::Result<()> {
    let mut board = Board::new(config.oven_count, config.batch_policy);
    let watcher = Watcher::new(client);

    let shutdown = watcher.shutdown_handle();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        shutdown.notify_one();
    });

    watcher.run(&mut board).await?;
    Ok(())
}

async fn cmd_status(client: StoreClient, config: &Config) -> anyhow::Result<()> {
    let board = load_board(&client, config).await?;
    println!("{}", view::render_board(&board));
    Ok(())
}

async fn cmd_transition<F>(client: StoreClient, config: &Config, op: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Board) -> ovenboard::error::Result<Transition>,
{
    let mut board = load_board(&client, config).await?;
    let transition = op(&mut board)?;

    // Two independent requests; a failure of either does not roll back
    // the other or the local board.
    if let Err(e) = client.push_state(transition.oven, &transition.doc).await {
        warn!(oven = transition.oven, "state push failed: {e}");
    }
    if let Err(e) = client.send_log(&transition.event).await {
        warn!(action = transition.event.action(), "log push failed: {e}");
    }

    println!("{}", view::render_activity(board.activity()));
    let state = board.get(transition.oven)?;
    println!("{}", view::render_slot(&view::slot_view(transition.oven, state)));
    Ok(())
}
