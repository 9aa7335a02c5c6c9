// chatweave - unified chat feed for Twitch, YouTube and Kick
//
// Merges chat from several platforms into one scrollable feed and replaces
// emote codes with images from BetterTTV, FrankerFaceZ and 7TV.
//
// Architecture:
// - Sources (demo, replay): push ChatMessages into one bounded mpsc channel
// - Emotes: per-channel catalogs fetched from the providers in the background
// - Render: pure annotation of message text into segments
// - Feed: bounded, deduplicated buffer with view filters
// - TUI (ratatui): the feed, follow/pause scrolling, emote browser, logs

mod cli;
mod config;
mod emotes;
mod feed;
mod logging;
mod models;
mod render;
mod source;
mod tui;
mod util;

use anyhow::Result;
use config::Config;
use emotes::{Catalog, CatalogAggregator, HttpFetcher, JsonFetcher};
use feed::FeedBuffer;
use logging::LogBuffer;
use models::ChatMessage;
use render::{annotate_message, plain_text, HighlightSet};
use source::SourceKind;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI subcommands first (config --show, --reset, --path)
    let Some(run_args) = cli::handle_cli() else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    run_args.apply(&mut config);

    // In TUI mode logs go to the buffer so they don't garble the display;
    // the file guard must live until exit so buffered logs flush
    let log_buffer = LogBuffer::new();
    let _file_guard = logging::init(&config.logging, &log_buffer, config.enable_tui);

    let source = SourceKind::select(config.replay.clone(), config.demo_mode);
    tracing::info!(
        "chatweave {} starting (source: {}, channel: {}, catalogs: {})",
        config::VERSION,
        source.describe(),
        config.channel_id.as_deref().unwrap_or("none"),
        if config.catalog.enabled { "on" } else { "off" }
    );

    let aggregator = Arc::new(CatalogAggregator::new(
        HttpFetcher::new()?,
        config.catalog.endpoints.clone(),
        config.catalog.merge_order,
        config.catalog.timeout(),
    ));

    let (msg_tx, msg_rx) = mpsc::channel::<ChatMessage>(source::CHANNEL_CAPACITY);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let source_label = source.describe();
    let source_handle = tokio::spawn(source::run(source, msg_tx, shutdown_rx));

    if config.enable_tui {
        tracing::info!("Starting TUI");
        if let Err(e) = tui::run_tui(msg_rx, log_buffer, config, aggregator, source_label).await {
            tracing::error!("TUI error: {:?}", e);
        }
    } else {
        tracing::info!("TUI disabled, running in headless mode");
        run_headless(msg_rx, &config, aggregator).await?;
    }

    tracing::info!("Shutting down...");

    // If the send fails, the source has already finished (which is fine)
    let _ = shutdown_tx.send(());
    let _ = source_handle.await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Print every accepted message as plain annotated text until Ctrl+C or the
/// source closes
async fn run_headless<F>(
    msg_rx: mpsc::Receiver<ChatMessage>,
    config: &Config,
    aggregator: Arc<CatalogAggregator<F>>,
) -> Result<()>
where
    F: JsonFetcher + 'static,
{
    headless_loop(msg_rx, config, aggregator, tokio::signal::ctrl_c(), |line| {
        println!("{}", line)
    })
    .await
}

/// Headless feed loop
///
/// Messages print straight away against an empty catalog; the catalog is
/// built once in the background and swapped in when it lands.
async fn headless_loop<F, S>(
    mut msg_rx: mpsc::Receiver<ChatMessage>,
    config: &Config,
    aggregator: Arc<CatalogAggregator<F>>,
    shutdown: S,
    mut emit: impl FnMut(String),
) -> Result<()>
where
    F: JsonFetcher + 'static,
    S: Future<Output = std::io::Result<()>>,
{
    let highlights = HighlightSet::new(&config.feed.highlight_terms);
    let mut feed = FeedBuffer::with_capacity(config.feed.capacity);
    let mut catalog = Catalog::empty();

    let (catalog_tx, mut catalog_rx) = oneshot::channel::<Catalog>();
    let mut building = config.catalog.enabled;
    if building {
        let channel_id = config.channel_id.clone().unwrap_or_default();
        tokio::spawn(async move {
            let _ = catalog_tx.send(aggregator.build_catalog(&channel_id, 1).await);
        });
    }

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                break;
            }
            built = &mut catalog_rx, if building => {
                building = false;
                match built {
                    Ok(built) => catalog = built,
                    Err(_) => tracing::warn!("Catalog build ended without a result"),
                }
            }
            message = msg_rx.recv() => {
                let Some(message) = message else {
                    tracing::info!("Message source closed");
                    break;
                };
                let line = headless_line(&message, &catalog, &highlights);
                if feed.append(message) {
                    emit(line);
                }
            }
        }
    }

    Ok(())
}

/// `[TAG] user: text`, with subscription notices on their own line
fn headless_line(message: &ChatMessage, catalog: &Catalog, highlights: &HighlightSet) -> String {
    let text = plain_text(&annotate_message(message, catalog, highlights));
    let body = format!("[{}] {}: {}", message.platform.tag(), message.username, text);
    match (&message.system_message, message.is_sub()) {
        (Some(system), true) if text.is_empty() => format!("[{}] * {}", message.platform.tag(), system),
        (Some(system), true) => format!("[{}] * {}\n{}", message.platform.tag(), system, body),
        _ => body,
    }
}
