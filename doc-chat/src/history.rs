//! Capacity-bounded conversation history (FIFO eviction).

use std::collections::VecDeque;

use serde::Serialize;

use crate::api_types::ChatMessage;

/// Default number of messages kept per session.
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Ordered history that never holds more than `capacity` messages.
///
/// Pushing into a full history drops the oldest entry first.
///
/// # Example
/// ```
/// use doc_chat::{ChatMessage, ConversationHistory};
/// let mut h = ConversationHistory::new(2);
/// h.push(ChatMessage::user("a"));
/// h.push(ChatMessage::user("b"));
/// h.push(ChatMessage::user("c"));
/// let texts: Vec<_> = h.iter().map(|m| m.content.as_str()).collect();
/// assert_eq!(texts, ["b", "c"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversationHistory {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ConversationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a message, evicting the oldest ones while over capacity.
    pub fn push(&mut self, message: ChatMessage) {
        if self.capacity == 0 {
            return;
        }
        while self.messages.len() >= self.capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Changes the capacity; shrinking evicts the oldest messages.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.messages.len() > capacity {
            self.messages.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
