// Components module - UI building blocks
//
// Shell components are rendered in every view:
// - Title bar: channel, catalog status, message source
// - Status bar: counters, filter, follow state, key hints
// - Logs panel: system log entries (toggle)
//
// The feed panel and the emote browser are the two main views.

pub mod emote_panel;
pub mod feed_panel;
pub mod logs_panel;
pub mod scrollbar;
pub mod status_bar;
pub mod title_bar;
pub mod toast;
