use serde::{Deserialize, Serialize};
use serde_json::Value;

use events::Event;

pub const EXPECTED_MESSAGE: &str =
    r#"Expected { type: "run", task: "game24"|"creativeWriting", payload: {...} }"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Run {
        task: String,
        #[serde(default)]
        payload: Value,
    },
    Ping,
}

impl ClientMessage {
    /// Parse a text frame; the error is the message to send back.
    pub fn parse(text: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(text).map_err(|_| "Invalid JSON".to_string())?;
        serde_json::from_value(value).map_err(|_| EXPECTED_MESSAGE.to_string())
    }
}

/// Control replies that are not part of a run's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Control {
    Pong,
    /// A `run` arrived while another run is still streaming; that run is unaffected.
    Busy { message: String },
}

/// Everything the server writes to a socket. Progress events go out in
/// their plain tagged form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Control(Control),
    Event(Event),
}

impl ServerMessage {
    pub fn pong() -> Self {
        ServerMessage::Control(Control::Pong)
    }

    pub fn busy(message: impl Into<String>) -> Self {
        ServerMessage::Control(Control::Busy {
            message: message.into(),
        })
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Event(Event::error(message))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"error","message":"Failed to encode message"}"#.to_string()
        })
    }
}
