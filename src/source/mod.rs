// Message sources - produce ChatMessages for the feed
//
// The platform connection layer lives outside this crate; these adapters stand
// in for it. Every source pushes into one bounded channel drained by the UI
// loop (or the headless printer) and stops when the shutdown signal fires.

pub mod demo;
pub mod replay;

use crate::models::ChatMessage;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};

/// Bound on messages queued between a source and the feed
pub const CHANNEL_CAPACITY: usize = 1000;

/// Which adapter feeds the aggregator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Demo,
    Replay(PathBuf),
    /// No producer; the feed stays empty
    Idle,
}

impl SourceKind {
    /// Replay wins over demo when both are requested
    pub fn select(replay: Option<PathBuf>, demo: bool) -> Self {
        match (replay, demo) {
            (Some(path), _) => SourceKind::Replay(path),
            (None, true) => SourceKind::Demo,
            (None, false) => SourceKind::Idle,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SourceKind::Demo => "demo".to_string(),
            SourceKind::Replay(path) => format!("replay {}", path.display()),
            SourceKind::Idle => "idle".to_string(),
        }
    }
}

/// Run the selected source until it finishes or shutdown is signalled
pub async fn run(kind: SourceKind, tx: mpsc::Sender<ChatMessage>, shutdown_rx: oneshot::Receiver<()>) {
    match kind {
        SourceKind::Demo => demo::run_demo(tx, shutdown_rx).await,
        SourceKind::Replay(path) => {
            if let Err(e) = replay::run_replay(&path, tx, shutdown_rx).await {
                tracing::error!("Replay failed: {:#}", e);
            }
        }
        SourceKind::Idle => {
            let _ = shutdown_rx.await;
        }
    }
}
