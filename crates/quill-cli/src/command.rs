//! Input line parsing.
//!
//! Lines starting with `/` are commands; anything else is a chat message.

use std::path::PathBuf;

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a chat message.
    Message {
        /// Message text, exactly as typed
        content: String,
    },
    /// Upload a local file (`/file <path>`).
    SendFile {
        /// Path to the file
        path: PathBuf,
    },
    /// Ask the server to resend one message (`/fetch <id>`).
    Fetch {
        /// Message id
        id: i32,
    },
    /// Reconnect, replacing the current socket (`/connect`).
    Connect,
    /// Disconnect and exit (`/quit`).
    Quit,
    /// Unrecognized command.
    Unknown {
        /// The full input line
        input: String,
    },
    /// Known command with missing or malformed arguments.
    InvalidArgs {
        /// Command name without the slash
        command: String,
        /// What was wrong
        error: String,
    },
}

/// Parse one non-empty input line.
pub fn parse(input: &str) -> Command {
    let Some(rest) = input.strip_prefix('/') else {
        return Command::Message { content: input.to_owned() };
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "file" if arg.is_empty() => invalid("file", "missing path"),
        "file" => Command::SendFile { path: PathBuf::from(arg) },
        "fetch" => match arg.parse::<i32>() {
            Ok(id) => Command::Fetch { id },
            Err(e) => invalid("fetch", &format!("invalid message id {arg:?}: {e}")),
        },
        "connect" => Command::Connect,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown { input: input.to_owned() },
    }
}

fn invalid(command: &str, error: &str) -> Command {
    Command::InvalidArgs { command: command.to_owned(), error: error.to_owned() }
}
