#![forbid(unsafe_code)]

//! Playback commands and the relay → page message.
//!
//! The background relay forwards whatever identifier the browser's shortcut
//! system hands it; the page agent decides what it understands through
//! [`Command::from_id`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Message tag shared by the relay and the page agent.
pub const COMMAND_MESSAGE_TYPE: &str = "YT_COMMAND";

/// A playback command the page agent knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    TogglePlay,
    SeekBack,
    SeekForward,
}

impl Command {
    /// Every known command.
    pub const ALL: [Command; 3] = [Self::TogglePlay, Self::SeekBack, Self::SeekForward];

    /// Identifier used in the extension manifest.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::TogglePlay => "yt-toggle-play",
            Self::SeekBack => "yt-seek-back",
            Self::SeekForward => "yt-seek-forward",
        }
    }

    /// Look up a command by manifest identifier.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.id() == id)
    }
}

/// `{ "type": "YT_COMMAND", "command": "<identifier>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub command: String,
}

impl CommandMessage {
    /// Wrap a command identifier.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            kind: COMMAND_MESSAGE_TYPE.to_string(),
            command: command.into(),
        }
    }

    /// Check the message tag.
    #[must_use]
    pub fn is_command(&self) -> bool {
        self.kind == COMMAND_MESSAGE_TYPE
    }

    /// The known command this message carries, if any.
    #[must_use]
    pub fn command(&self) -> Option<Command> {
        if !self.is_command() {
            return None;
        }
        Command::from_id(&self.command)
    }

    /// Parse a JSON message, rejecting anything that is not a `YT_COMMAND`.
    pub fn parse(json: &str) -> Result<Self> {
        let msg: Self =
            serde_json::from_str(json).map_err(|err| Error::MalformedMessage(err.to_string()))?;
        if !msg.is_command() {
            return Err(Error::MalformedMessage(format!(
                "unexpected message type {:?}",
                msg.kind
            )));
        }
        Ok(msg)
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Message tag for a page → relay request to open a background tab.
pub const OPEN_TAB_MESSAGE_TYPE: &str = "YT_OPEN_TAB";

/// `{ "type": "YT_OPEN_TAB", "url": "<absolute url>" }`
///
/// Content scripts cannot create tabs; the page agent asks the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenTabRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl OpenTabRequest {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            kind: OPEN_TAB_MESSAGE_TYPE.to_string(),
            url: url.into(),
        }
    }

    /// Parse a JSON request, rejecting other message types.
    pub fn parse(json: &str) -> Result<Self> {
        let req: Self =
            serde_json::from_str(json).map_err(|err| Error::MalformedMessage(err.to_string()))?;
        if req.kind != OPEN_TAB_MESSAGE_TYPE {
            return Err(Error::MalformedMessage(format!(
                "unexpected message type {:?}",
                req.kind
            )));
        }
        Ok(req)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
