//! # Breakout Module
//!
//! Groups meeting participants into breakout rooms by the interests they
//! expressed in chat, and tracks who currently sits in which room.
//!
//! ## Components
//! - `partition`: greedy keyword-driven room formation
//! - `state`: immutable room/membership state and its transitions

pub mod partition;
pub mod state;

pub use partition::{KeywordOrder, RoomPartitioner};
pub use state::{PartitionState, RoomEvent};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::brain::{KeywordExtractor, KeywordIndex};
use crate::config::BreakoutConfig;
use crate::models::{BreakoutRoom, ChatMessage, Participant};

/// Result of one planning pass, as handed to the rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct BreakoutPlan {
    /// Keyword -> authors the rooms were formed from
    pub interests: KeywordIndex,
    pub rooms: Vec<BreakoutRoom>,
    /// Participants not placed in any room
    pub main_session: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl BreakoutPlan {
    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Keywords: {}, Rooms: {}, Main session: {}",
            self.interests.len(),
            self.rooms.len(),
            self.main_session.len()
        )
    }
}

/// Runs extraction and partitioning over a transcript in one go.
pub fn plan_breakouts(
    config: &BreakoutConfig,
    participants: &[Participant],
    messages: &[ChatMessage],
) -> BreakoutPlan {
    let interests = KeywordExtractor::from_config(config).extract(messages);
    let rooms = RoomPartitioner::from_config(config).partition(participants, &interests);

    let main_session = PartitionState::new(rooms.clone())
        .main_session(participants)
        .into_iter()
        .map(str::to_string)
        .collect();

    let plan = BreakoutPlan {
        interests,
        rooms,
        main_session,
        generated_at: Utc::now(),
    };
    info!("Breakout plan ready. {}", plan.summary());
    plan
}
