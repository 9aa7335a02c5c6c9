// Replay source: ChatMessage JSON lines from a file
//
// One message per line in the serde form of `ChatMessage`. Blank lines are
// skipped; malformed lines are logged and skipped so a single bad record does
// not end the replay.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;

use crate::models::ChatMessage;

/// Delay between replayed messages
const REPLAY_INTERVAL: Duration = Duration::from_millis(120);

/// Parse one JSONL record; `Ok(None)` for blank lines
pub fn parse_line(line: &str) -> Result<Option<ChatMessage>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

pub async fn run_replay(
    path: &Path,
    tx: mpsc::Sender<ChatMessage>,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> Result<()> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open replay file {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    tracing::info!("Replaying messages from {}", path.display());

    let mut line_no = 0usize;
    let mut sent = 0usize;
    loop {
        let line = tokio::select! {
            _ = &mut shutdown_rx => return Ok(()),
            line = lines.next_line() => line.context("Failed to read replay file")?,
        };
        let Some(line) = line else {
            break;
        };
        line_no += 1;

        match parse_line(&line) {
            Ok(Some(message)) => {
                if tx.send(message).await.is_err() {
                    return Ok(());
                }
                sent += 1;
            }
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Skipping replay line {}: {}", line_no, e);
                continue;
            }
        }

        tokio::select! {
            _ = &mut shutdown_rx => return Ok(()),
            _ = sleep(REPLAY_INTERVAL) => {}
        }
    }

    tracing::info!("Replay finished ({} messages)", sent);

    // Keep the feed up until shutdown
    let _ = shutdown_rx.await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmoteSource, MessageKind, Platform};

    #[test]
    fn test_parse_minimal_line() {
        let line = r#"{"id":"1","platform":"Kick","username":"viewer","message":"hi","timestamp":"2024-05-01T12:00:00Z"}"#;
        let message = parse_line(line).ok().flatten();
        let message = message.as_ref();
        assert_eq!(message.map(|m| m.platform), Some(Platform::Kick));
        assert_eq!(message.map(|m| m.kind), Some(MessageKind::Chat));
        assert_eq!(message.map(|m| m.emotes.is_empty()), Some(true));
    }

    #[test]
    fn test_parse_line_with_native_emote_and_sub() {
        let line = r#"{
            "id":"abc","platform":"Twitch","username":"sub_guy","message":"Kappa",
            "timestamp":"2024-05-01T12:00:00Z","kind":"sub",
            "system_message":"sub_guy subscribed for 3 months",
            "emotes":[{"source":{"kind":"by_provider_id","platform":"Twitch","id":"25"},
                       "code":"Kappa","start":0,"end":4}]
        }"#
        .replace('\n', "");
        let message = match parse_line(&line) {
            Ok(Some(m)) => m,
            other => panic!("expected a message, got {:?}", other),
        };
        assert!(message.is_sub());
        assert_eq!(
            message.emotes[0].source,
            EmoteSource::ByProviderId {
                platform: Platform::Twitch,
                id: "25".to_string()
            }
        );
    }

    #[test]
    fn test_blank_and_malformed_lines() {
        assert!(matches!(parse_line("   "), Ok(None)));
        assert!(parse_line("{not json").is_err());
    }

    #[test]
    fn test_serialized_message_parses_back() {
        let original = ChatMessage::new("42", Platform::YouTube, "yt_user", "hello");
        let line = serde_json::to_string(&original).unwrap_or_default();
        assert_eq!(parse_line(&line).ok().flatten(), Some(original));
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let (tx, _rx) = mpsc::channel(1);
        let (_stop, shutdown_rx) = oneshot::channel();
        let result = run_replay(Path::new("/nonexistent/chatweave.jsonl"), tx, shutdown_rx).await;
        assert!(result.is_err());
    }
}
