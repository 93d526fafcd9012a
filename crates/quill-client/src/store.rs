//! Ordered message list.

use quill_proto::Message;

/// Messages in arrival order.
///
/// Only two mutations exist: [`append`](Self::append) and
/// [`remove_all`](Self::remove_all). Ids are not deduplicated; a message whose
/// id is already present is appended next to it, and a delete removes every
/// copy.
///
/// # Concurrency
///
/// Mutation takes `&mut self`, so the store is only ever changed by its single
/// owner (the [`Dispatcher`](crate::Dispatcher)). Sharing it between threads
/// that all mutate it requires an external lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the end, without checking for duplicate ids.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Remove every message with `id`, keeping the relative order of the rest.
    ///
    /// Returns the number of messages removed. Removing an absent id is a
    /// no-op.
    pub fn remove_all(&mut self, id: i32) -> usize {
        let before = self.messages.len();
        self.messages.retain(|message| message.id != id);
        before - self.messages.len()
    }

    /// Messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Iterate messages in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// First message with `id`, if any.
    pub fn get(&self, id: i32) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if the store holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
