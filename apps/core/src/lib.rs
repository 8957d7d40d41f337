//! Huddle core: breakout rooms formed from the interests participants express in chat.
//!
//! The pipeline is transcript -> [`brain::KeywordExtractor`] -> keyword index ->
//! [`breakout::RoomPartitioner`] -> rooms -> [`breakout::PartitionState`]. The
//! [`actors::breakout::BreakoutHandle`] serializes membership changes for hosts that
//! share one meeting state across tasks.

pub mod actors;
pub mod brain;
pub mod breakout;
pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use actors::breakout::BreakoutHandle;
pub use brain::{KeywordExtractor, KeywordIndex};
pub use breakout::{plan_breakouts, BreakoutPlan, PartitionState, RoomEvent, RoomPartitioner};
pub use config::BreakoutConfig;
pub use error::AppError;
pub use models::{BreakoutRoom, ChatMessage, Participant, SessionTranscript};
