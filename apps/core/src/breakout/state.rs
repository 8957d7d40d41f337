//! Breakout room state.
//!
//! [`PartitionState`] is an immutable value: every transition returns the next state
//! and leaves the previous one untouched, so listeners only ever observe whole states.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::{BreakoutRoom, Participant};

/// A membership change routed from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Install a freshly partitioned room list. Clears every current-room pointer.
    Replace { rooms: Vec<BreakoutRoom> },
    /// Move a participant into a room.
    Join {
        room_id: String,
        participant: Participant,
    },
    /// Send a participant back to the main session.
    Leave { participant_id: String },
}

/// Current rooms plus at most one current-room pointer per participant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartitionState {
    rooms: Vec<BreakoutRoom>,
    current_room: BTreeMap<String, String>,
    version: u64,
}

impl PartitionState {
    /// Creates the initial state for a partition, with nobody inside a room yet.
    pub fn new(rooms: Vec<BreakoutRoom>) -> Self {
        Self {
            rooms,
            current_room: BTreeMap::new(),
            version: 0,
        }
    }

    pub fn rooms(&self) -> &[BreakoutRoom] {
        &self.rooms
    }

    pub fn room(&self, room_id: &str) -> Option<&BreakoutRoom> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    /// The room the participant currently occupies, `None` meaning the main session.
    pub fn current_room_of(&self, participant_id: &str) -> Option<&str> {
        self.current_room.get(participant_id).map(String::as_str)
    }

    /// Number of transitions applied since the state was created.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Ids of roster participants who are not a member of any room.
    pub fn main_session<'a>(&self, roster: &'a [Participant]) -> Vec<&'a str> {
        roster
            .iter()
            .filter(|p| !self.rooms.iter().any(|r| r.contains(&p.id)))
            .map(|p| p.id.as_str())
            .collect()
    }

    pub fn apply(&self, event: RoomEvent) -> Result<PartitionState, AppError> {
        match event {
            RoomEvent::Replace { rooms } => Ok(self.replace(rooms)),
            RoomEvent::Join {
                room_id,
                participant,
            } => self.join(&room_id, participant),
            RoomEvent::Leave { participant_id } => Ok(self.leave(&participant_id)),
        }
    }

    pub fn replace(&self, rooms: Vec<BreakoutRoom>) -> PartitionState {
        PartitionState {
            rooms,
            current_room: BTreeMap::new(),
            version: self.version + 1,
        }
    }

    /// Moves `participant` into `room_id`.
    ///
    /// The participant is removed from every other room first; joining the room they
    /// are already in only refreshes the pointer. No size cap is enforced. Unknown
    /// room ids are rejected and the state is left as is.
    pub fn join(
        &self,
        room_id: &str,
        participant: Participant,
    ) -> Result<PartitionState, AppError> {
        if self.room(room_id).is_none() {
            warn!(room_id, participant = %participant.id, "Join rejected: unknown room");
            return Err(AppError::UnknownRoom(room_id.to_string()));
        }

        let rooms = self
            .rooms
            .iter()
            .map(|room| {
                let mut room = room.clone();
                if room.id == room_id {
                    if !room.contains(&participant.id) {
                        room.participants.push(participant.clone());
                    }
                } else {
                    room.participants.retain(|p| p.id != participant.id);
                }
                room
            })
            .collect();

        let mut current_room = self.current_room.clone();
        current_room.insert(participant.id.clone(), room_id.to_string());
        debug!(room_id, participant = %participant.id, "Participant joined room");

        Ok(PartitionState {
            rooms,
            current_room,
            version: self.version + 1,
        })
    }

    /// Sends the participant back to the main session.
    ///
    /// Removes them from every room's membership. Rooms are kept even when emptied.
    /// Leaving while already in the main session returns an identical state.
    pub fn leave(&self, participant_id: &str) -> PartitionState {
        let placed = self.current_room.contains_key(participant_id)
            || self.rooms.iter().any(|r| r.contains(participant_id));
        if !placed {
            return self.clone();
        }

        let rooms = self
            .rooms
            .iter()
            .map(|room| {
                let mut room = room.clone();
                room.participants.retain(|p| p.id != participant_id);
                room
            })
            .collect();

        let mut current_room = self.current_room.clone();
        current_room.remove(participant_id);
        debug!(participant = participant_id, "Participant left breakout rooms");

        PartitionState {
            rooms,
            current_room,
            version: self.version + 1,
        }
    }
}
