//! Periodic resynchronization with the remote store.
//!
//! The store is the state of record. On a fixed interval the full
//! snapshot is fetched and overwrites the local board unconditionally,
//! so any optimistic write that never reached the store is corrected at
//! the next poll. A failed poll changes nothing; the last known board
//! stays up.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::board::Board;
use crate::client::StoreClient;
use crate::error::Result;
use crate::view;

/// Fixed refresh interval. Not configurable at runtime.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// One resync: fetch the full snapshot, overwrite the board.
pub async fn poll_once(client: &StoreClient, board: &mut Board) -> Result<()> {
    let snapshot = client.fetch_states().await?;
    board.apply_snapshot(&snapshot);
    Ok(())
}

/// The dashboard loop: an immediate first poll (the page-load fetch),
/// then one per interval, re-rendering after each successful poll.
pub struct Watcher {
    client: StoreClient,
    shutdown: Arc<Notify>,
}

impl Watcher {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Handle that stops the loop when notified.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Run until shutdown is notified.
    pub async fn run(&self, board: &mut Board) -> Result<()> {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        info!(
            "watching oven states, refreshing every {}s",
            POLL_INTERVAL.as_secs()
        );

        loop {
            tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("watch loop shutting down");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    match poll_once(&self.client, board).await {
                        Ok(()) => println!("{}", view::render_board(board)),
                        Err(e) => warn!("state poll failed, keeping last known board: {e}"),
                    }
                }
            }
        }
    }
}
