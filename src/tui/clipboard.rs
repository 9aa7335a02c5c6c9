//! System clipboard access via `arboard`
//!
//! A clipboard handle is opened per copy; holding one open keeps an X11/Wayland
//! connection alive for the whole session.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Copy text to the system clipboard
///
/// Fails without a display server (headless Linux) or on permission errors.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    Clipboard::new()
        .context("Failed to access clipboard")?
        .set_text(text.to_owned())
        .context("Failed to set clipboard text")
}

/// Toast text for a copy attempt
pub fn copy_feedback(what: &str, result: &Result<()>) -> String {
    match result {
        Ok(()) => format!("✓ Copied {}", what),
        Err(e) => {
            tracing::warn!("Clipboard copy failed: {:#}", e);
            "✗ Failed to copy".to_string()
        }
    }
}
