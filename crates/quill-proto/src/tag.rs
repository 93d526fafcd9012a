//! Frame method tags.
//!
//! Client-to-peer tags are small integers; peer-to-client tags live at
//! `0x3D..=0x3F`. The two ranges never overlap, so a tag alone tells the
//! direction of a frame.

/// Leading byte of every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Ask the peer to re-broadcast one message by id (client to peer).
    FetchSingle = 2,
    /// Send a text message (client to peer).
    SendText = 3,
    /// Upload a file (client to peer).
    SendFile = 4,
    /// Every message the peer currently holds (peer to client).
    Batch = 0x3D,
    /// One newly created message (peer to client).
    Single = 0x3E,
    /// Delete a message by id (peer to client).
    Delete = 0x3F,
}

impl Tag {
    /// Parse a tag byte. `None` for bytes that are not a known tag.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            2 => Some(Self::FetchSingle),
            3 => Some(Self::SendText),
            4 => Some(Self::SendFile),
            0x3D => Some(Self::Batch),
            0x3E => Some(Self::Single),
            0x3F => Some(Self::Delete),
            _ => None,
        }
    }

    /// Wire representation.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// True for tags the peer sends to the client.
    pub const fn is_inbound(self) -> bool {
        matches!(self, Self::Batch | Self::Single | Self::Delete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Tag; 6] =
        [Tag::FetchSingle, Tag::SendText, Tag::SendFile, Tag::Batch, Tag::Single, Tag::Delete];

    #[test]
    fn tag_bytes_match_wire_values() {
        assert_eq!(Tag::SendText.to_u8(), 3);
        assert_eq!(Tag::SendFile.to_u8(), 4);
        assert_eq!(Tag::Batch.to_u8(), 61);
        assert_eq!(Tag::Single.to_u8(), 62);
        assert_eq!(Tag::Delete.to_u8(), 63);
    }

    #[test]
    fn every_tag_parses_back() {
        for tag in ALL {
            assert_eq!(Tag::from_u8(tag.to_u8()), Some(tag));
        }
    }

    #[test]
    fn unknown_bytes_are_not_tags() {
        for byte in [0u8, 1, 5, 0x3C, 0x40, 0xFF] {
            assert_eq!(Tag::from_u8(byte), None);
        }
    }

    #[test]
    fn only_peer_tags_are_inbound() {
        let inbound: Vec<Tag> = ALL.into_iter().filter(|t| t.is_inbound()).collect();
        assert_eq!(inbound, vec![Tag::Batch, Tag::Single, Tag::Delete]);
    }
}
