use serde::{Deserialize, Serialize};

/// Version exchanged in [`Message::Hello`]; peers must match exactly.
pub const PROTOCOL_VERSION: u32 = 1;

/// Frames exchanged between the server's remote console and a terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Opening handshake, sent by both sides.
    Hello { version: u32 },
    /// Text for the terminal to print verbatim.
    Output { text: String },
    /// The session waits for one line of player input.
    InputRequest,
    /// Answer to `InputRequest`; `None` once the terminal's input has ended.
    Input { line: Option<String> },
    /// The session is over; the terminal exits with `code`.
    Exit { code: i32, reason: Option<String> },
}
