use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::AppError;

/// Represents a participant of the meeting, as supplied by the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Participant {
    /// The unique identifier of the participant (user id).
    #[validate(length(min = 1))]
    pub id: String,
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional contact address, used as a label when no name is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Participant {
    /// Creates a participant with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Label shown in room listings: name, else email, else the raw id.
    pub fn display_label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Represents a single chat message of the meeting transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The ID of the participant who wrote the message.
    #[serde(alias = "authorId", alias = "user_id")]
    pub author_id: String,
    /// The text content of the message.
    pub content: String,
}

impl ChatMessage {
    pub fn new(author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            content: content.into(),
        }
    }
}

/// Represents a breakout room produced by the partitioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakoutRoom {
    /// The unique identifier for the room (UUID).
    pub id: String,
    /// Sequential display name ("Breakout Room N").
    pub name: String,
    /// Current members, founding members first.
    pub participants: Vec<Participant>,
    /// Keywords shared by the founding members.
    pub interests: Vec<String>,
}

impl BreakoutRoom {
    /// Returns `true` if the participant is currently listed as a member.
    pub fn contains(&self, participant_id: &str) -> bool {
        self.participants.iter().any(|p| p.id == participant_id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// A meeting snapshot handed to the planner: the live roster plus the chat so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SessionTranscript {
    #[validate(nested)]
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl SessionTranscript {
    /// Reads and validates a transcript from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let transcript: SessionTranscript = serde_json::from_str(&raw)?;
        transcript.validate()?;
        Ok(transcript)
    }
}
