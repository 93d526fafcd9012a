//! Event dispatch onto the message store.

use quill_proto::Event;

use crate::MessageStore;

/// Applies decoded events to the [`MessageStore`] it owns.
///
/// The dispatcher is the only path that mutates the store: `Add` appends and
/// `Delete` removes every message with the id. Events are applied in the order
/// given.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    store: MessageStore,
}

impl Dispatcher {
    /// Create a dispatcher over an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::Add(message) => {
                tracing::trace!(id = message.id, kind = ?message.kind, "append message");
                self.store.append(message.clone());
            },
            Event::Delete(id) => {
                let removed = self.store.remove_all(*id);
                tracing::debug!(id, removed, "delete message");
            },
        }
    }

    /// Apply events in order.
    pub fn apply_all(&mut self, events: &[Event]) {
        for event in events {
            self.apply(event);
        }
    }

    /// Current message list.
    pub fn store(&self) -> &MessageStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use quill_proto::{Message, decode};

    use super::*;

    #[test]
    fn add_appends_and_delete_removes() {
        let mut dispatcher = Dispatcher::new();

        dispatcher.apply_all(&[
            Event::Add(Message::new_text(5, "five")),
            Event::Add(Message::new_text(7, "seven")),
            Event::Delete(5),
        ]);

        assert_eq!(dispatcher.store().messages(), &[Message::new_text(7, "seven")]);
    }

    #[test]
    fn events_apply_in_order() {
        let mut dispatcher = Dispatcher::new();

        // Delete before add leaves the later add in place
        dispatcher.apply_all(&[Event::Delete(1), Event::Add(Message::new_text(1, "late"))]);
        assert_eq!(dispatcher.store().len(), 1);

        // Add before delete leaves nothing
        dispatcher.apply_all(&[Event::Add(Message::new_text(2, "gone")), Event::Delete(2)]);
        assert!(dispatcher.store().get(2).is_none());
    }

    #[test]
    fn decoded_single_then_delete() {
        let mut dispatcher = Dispatcher::new();

        let single = [0x3E, 4, 0, 0, 0, 5, 0, 0, 0, 4, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 0x79, 0x6F];
        dispatcher.apply_all(&decode(&single).unwrap());
        assert_eq!(dispatcher.store().messages(), &[Message::new_text(5, "yo")]);

        dispatcher.apply(&Event::Add(Message::new_file(7, "seven.bin")));
        dispatcher.apply_all(&decode(&[0x3F, 4, 0, 0, 0, 5, 0, 0, 0]).unwrap());
        assert_eq!(dispatcher.store().messages(), &[Message::new_file(7, "seven.bin")]);
    }
}
