// Feed buffer - bounded window of the most recent chat messages
//
// Messages are kept in arrival order with unique ids. When the window is full
// the oldest message is evicted; bursts beyond capacity are shed rather than
// queued. Views are recomputed on demand with a caller-supplied predicate.

mod filter;

pub use filter::{is_known_bot, FeedFilter};

use crate::models::ChatMessage;
use std::collections::{HashSet, VecDeque};

/// Default number of messages kept in the feed
pub const DEFAULT_CAPACITY: usize = 200;

/// Bounded, deduplicated, ordered message store
#[derive(Debug, Clone)]
pub struct FeedBuffer {
    messages: VecDeque<ChatMessage>,
    ids: HashSet<String>,
    capacity: usize,
    /// Total messages evicted by overflow since creation
    evicted: u64,
}

impl FeedBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Capacity of at least one message
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            messages: VecDeque::with_capacity(capacity + 1),
            ids: HashSet::with_capacity(capacity + 1),
            capacity,
            evicted: 0,
        }
    }

    /// Append a message at the tail
    ///
    /// Returns false (and changes nothing) if a message with the same id is
    /// already in the buffer. Ids that were evicted count as new.
    pub fn append(&mut self, message: ChatMessage) -> bool {
        if self.ids.contains(&message.id) {
            return false;
        }

        self.ids.insert(message.id.clone());
        self.messages.push_back(message);

        while self.messages.len() > self.capacity {
            if let Some(old) = self.messages.pop_front() {
                self.ids.remove(&old.id);
                self.evicted += 1;
            }
        }

        debug_assert_eq!(self.ids.len(), self.messages.len());
        true
    }

    /// Messages matching `predicate`, in buffer order
    pub fn current_view<P>(&self, predicate: P) -> Vec<&ChatMessage>
    where
        P: Fn(&ChatMessage) -> bool,
    {
        self.messages.iter().filter(|m| predicate(*m)).collect()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }
}

impl Default for FeedBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Platform;

    fn msg(id: impl Into<String>) -> ChatMessage {
        ChatMessage::new(id, Platform::Twitch, "viewer", "hello")
    }

    fn ids(buffer: &FeedBuffer) -> Vec<String> {
        buffer.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn test_append_preserves_order() {
        let mut buffer = FeedBuffer::new();
        assert!(buffer.append(msg("a")));
        assert!(buffer.append(msg("b")));
        assert!(buffer.append(msg("c")));
        assert_eq!(ids(&buffer), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_id_is_noop() {
        let mut buffer = FeedBuffer::new();
        assert!(buffer.append(msg("a")));
        let mut dup = msg("a");
        dup.message = "different".into();
        assert!(!buffer.append(dup));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.iter().next().map(|m| m.message.as_str()), Some("hello"));
    }

    #[test]
    fn test_overflow_evicts_oldest_first() {
        let mut buffer = FeedBuffer::with_capacity(200);
        for i in 0..250 {
            buffer.append(msg(i.to_string()));
            assert!(buffer.len() <= 200);
        }

        assert_eq!(buffer.len(), 200);
        assert_eq!(buffer.evicted(), 50);
        let kept = ids(&buffer);
        assert_eq!(kept.first().map(String::as_str), Some("50"));
        assert_eq!(kept.last().map(String::as_str), Some("249"));
        assert!(!buffer.contains("49"));
    }

    #[test]
    fn test_reappend_present_vs_evicted() {
        let mut buffer = FeedBuffer::with_capacity(200);
        for i in 0..250 {
            buffer.append(msg(i.to_string()));
        }

        // Still present: no-op
        assert!(!buffer.append(msg("100")));
        assert_eq!(ids(&buffer).last().map(String::as_str), Some("249"));

        // Already evicted: treated as new and goes to the tail
        assert!(buffer.append(msg("10")));
        assert_eq!(buffer.len(), 200);
        assert_eq!(ids(&buffer).last().map(String::as_str), Some("10"));
        assert!(!buffer.contains("50"));
    }

    #[test]
    fn test_ids_stay_unique_under_mixed_appends() {
        let mut buffer = FeedBuffer::with_capacity(5);
        for i in 0..40 {
            buffer.append(msg((i % 7).to_string()));
            let all = ids(&buffer);
            let unique: HashSet<_> = all.iter().collect();
            assert_eq!(unique.len(), all.len());
            assert!(buffer.len() <= 5);
        }
    }

    #[test]
    fn test_current_view_filters_in_order() {
        let mut buffer = FeedBuffer::new();
        for (id, platform) in [("1", Platform::Twitch), ("2", Platform::Kick), ("3", Platform::Twitch)] {
            buffer.append(ChatMessage::new(id, platform, "u", "m"));
        }
        let view = buffer.current_view(|m| m.platform == Platform::Twitch);
        let view_ids: Vec<_> = view.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(view_ids, vec!["1", "3"]);
    }

    #[test]
    fn test_clear() {
        let mut buffer = FeedBuffer::new();
        buffer.append(msg("a"));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.append(msg("a")));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut buffer = FeedBuffer::with_capacity(0);
        buffer.append(msg("a"));
        buffer.append(msg("b"));
        assert_eq!(ids(&buffer), vec!["b"]);
    }
}
