use serde::Serialize;
use tokio::sync::oneshot;

use crate::breakout::RoomEvent;
use crate::models::{BreakoutRoom, ChatMessage, Participant};

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Serialize, Clone)]
pub enum ActorError {
    /// The coordinator is no longer running (channel closed or reply dropped).
    #[error("Breakout coordinator unavailable: {0}")]
    Unavailable(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the breakout coordinator.
#[derive(Debug)]
pub enum BreakoutMessage {
    /// Re-analyze the chat and replace the current partition.
    Regroup {
        participants: Vec<Participant>,
        messages: Vec<ChatMessage>,
        /// A channel to send the newly formed rooms back.
        responder: oneshot::Sender<Result<Vec<BreakoutRoom>, AppError>>,
    },
    /// Apply a membership change to the current partition.
    Apply {
        event: RoomEvent,
        responder: oneshot::Sender<Result<(), AppError>>,
    },
    /// A command to stop the coordinator.
    Shutdown,
}
