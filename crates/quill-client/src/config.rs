//! Client configuration.

use quill_proto::{DOWNLOAD_PREFIX, Message};

use crate::ClientError;

/// Largest file accepted for upload. The server silently drops anything
/// bigger, so it is refused locally instead.
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024;

/// Where the client connects and how large uploads may be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:3000/ws`.
    pub socket_url: String,
    /// Base for download URLs, ending in `/`.
    pub file_base_url: String,
    /// Uploads larger than this are rejected before encoding.
    pub max_upload_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket_url: "ws://127.0.0.1:3000/ws".to_string(),
            file_base_url: "http://127.0.0.1:3000/".to_string(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        }
    }
}

impl ClientConfig {
    /// Derive socket and download URLs from the page origin.
    ///
    /// `http://host` becomes `ws://host/ws` and `https://host` becomes
    /// `wss://host/ws`. A path after the host is kept, so an origin of
    /// `http://host/chat` yields `ws://host/chat/ws`.
    ///
    /// # Errors
    ///
    /// - `ClientError::InvalidOrigin` if the scheme is not `http` or `https`
    ///   or the host is empty
    pub fn from_origin(origin: &str) -> Result<Self, ClientError> {
        let trimmed = origin.trim().trim_end_matches('/');
        let (scheme, rest) = trimmed
            .split_once("://")
            .ok_or_else(|| ClientError::InvalidOrigin(format!("missing scheme: {origin}")))?;

        let socket_scheme = match scheme.to_ascii_lowercase().as_str() {
            "http" => "ws",
            "https" => "wss",
            other => {
                return Err(ClientError::InvalidOrigin(format!("unsupported scheme: {other}")));
            },
        };

        if rest.is_empty() || rest.starts_with('/') {
            return Err(ClientError::InvalidOrigin(format!("missing host: {origin}")));
        }

        Ok(Self {
            socket_url: format!("{socket_scheme}://{rest}/ws"),
            file_base_url: format!("{scheme}://{rest}/"),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
        })
    }

    /// Replace the upload limit.
    #[must_use]
    pub fn with_max_upload_size(mut self, max_upload_size: usize) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }

    /// Download URL for a stored file name.
    pub fn file_url(&self, name: &str) -> String {
        format!("{}{DOWNLOAD_PREFIX}{name}", self.file_base_url)
    }

    /// Download URL for a file message. `None` for text messages.
    pub fn download_url(&self, message: &Message) -> Option<String> {
        message.download_path().map(|path| format!("{}{path}", self.file_base_url))
    }
}
