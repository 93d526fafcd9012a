//! Chat messages and decoded events.

/// Path prefix under which the file server exposes uploaded files.
pub const DOWNLOAD_PREFIX: &str = "queryfile/";

/// What the `text` field of a [`Message`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// `text` is the message body.
    Text,
    /// `text` is the name of an uploaded file.
    File,
}

impl MessageKind {
    /// Wire value for [`MessageKind::Text`].
    pub const TEXT: i32 = 1;

    /// Wire value for [`MessageKind::File`].
    pub const FILE: i32 = 2;

    /// Interpret a wire value. Anything other than `1` carries a file name.
    pub const fn from_wire(value: i32) -> Self {
        if value == Self::TEXT { Self::Text } else { Self::File }
    }

    /// Wire value for this kind.
    pub const fn to_wire(self) -> i32 {
        match self {
            Self::Text => Self::TEXT,
            Self::File => Self::FILE,
        }
    }
}

/// One chat message.
///
/// The `id` is assigned by the peer and treated as opaque. Ids are not unique
/// by construction: the store keeps duplicates side by side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message {
    /// Peer-assigned identifier.
    pub id: i32,
    /// Meaning of `text`.
    pub kind: MessageKind,
    /// Message body, or file name for [`MessageKind::File`].
    pub text: String,
}

impl Message {
    /// Create a text message.
    pub fn new_text(id: i32, body: impl Into<String>) -> Self {
        Self { id, kind: MessageKind::Text, text: body.into() }
    }

    /// Create a file message referring to an uploaded file by name.
    pub fn new_file(id: i32, name: impl Into<String>) -> Self {
        Self { id, kind: MessageKind::File, text: name.into() }
    }

    /// Relative download path for file messages. `None` for text messages.
    pub fn download_path(&self) -> Option<String> {
        match self.kind {
            MessageKind::Text => None,
            MessageKind::File => Some(format!("{DOWNLOAD_PREFIX}{}", self.text)),
        }
    }
}

/// Content of an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Append a message.
    Add(Message),
    /// Remove every message with this id.
    Delete(i32),
}
