//! Quill terminal client
//!
//! Reads chat messages and commands from stdin, prints the message history as
//! it changes, and logs connection lifecycle to stderr.
//!
//! # Commands
//!
//! - `text`: Send a chat message
//! - `/file <path>`: Upload a file
//! - `/fetch <id>`: Ask the server to resend a message
//! - `/connect`: Reconnect
//! - `/quit`: Disconnect and exit

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod command;
pub mod runtime;

pub use runtime::Runtime;
