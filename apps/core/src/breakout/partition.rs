//! Greedy interest-based room partitioning.
//!
//! Keywords are visited in a chosen [`KeywordOrder`]. For each keyword the authors
//! still available are peeled off in groups of up to `max_room_size` while at least
//! `min_room_size` remain. A participant is grouped at most once per pass.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::brain::KeywordIndex;
use crate::config::{
    BreakoutConfig, DEFAULT_MAX_ROOM_SIZE, DEFAULT_MIN_CANDIDATES, DEFAULT_MIN_INTEREST_OVERLAP,
    DEFAULT_MIN_ROOM_SIZE,
};
use crate::models::{BreakoutRoom, Participant};

/// Order in which keywords are considered when forming rooms.
///
/// Earlier keywords claim participants first, so the order decides who ends up together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordOrder {
    /// Order of first encounter during extraction.
    #[default]
    Insertion,
    /// Keywords with more authors first; ties keep insertion order.
    AuthorCountDesc,
}

impl KeywordOrder {
    pub fn label(&self) -> &'static str {
        match self {
            KeywordOrder::Insertion => "insertion",
            KeywordOrder::AuthorCountDesc => "author_count_desc",
        }
    }
}

impl fmt::Display for KeywordOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for KeywordOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "insertion" => Ok(KeywordOrder::Insertion),
            "author_count_desc" | "author-count-desc" => Ok(KeywordOrder::AuthorCountDesc),
            other => Err(format!("unknown keyword order '{}'", other)),
        }
    }
}

/// Groups participants into breakout rooms by shared keywords.
#[derive(Debug, Clone)]
pub struct RoomPartitioner {
    min_room_size: usize,
    max_room_size: usize,
    min_candidates: usize,
    min_interest_overlap: usize,
    keyword_order: KeywordOrder,
}

impl Default for RoomPartitioner {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomPartitioner {
    pub fn new() -> Self {
        Self {
            min_room_size: DEFAULT_MIN_ROOM_SIZE,
            max_room_size: DEFAULT_MAX_ROOM_SIZE,
            min_candidates: DEFAULT_MIN_CANDIDATES,
            min_interest_overlap: DEFAULT_MIN_INTEREST_OVERLAP,
            keyword_order: KeywordOrder::default(),
        }
    }

    /// Builds a partitioner from config. Rooms never go below the default floor of three.
    pub fn from_config(config: &BreakoutConfig) -> Self {
        let min_room_size = config.min_room_size.max(DEFAULT_MIN_ROOM_SIZE);
        Self {
            min_room_size,
            max_room_size: config.max_room_size.max(min_room_size),
            min_candidates: config.min_candidates,
            min_interest_overlap: config.min_interest_overlap.clamp(1, min_room_size),
            keyword_order: config.keyword_order,
        }
    }

    pub fn with_order(mut self, order: KeywordOrder) -> Self {
        self.keyword_order = order;
        self
    }

    pub fn keyword_order(&self) -> KeywordOrder {
        self.keyword_order
    }

    fn ordered<'a>(&self, index: &'a KeywordIndex) -> Vec<(&'a str, &'a [String])> {
        let mut entries: Vec<_> = index.iter().collect();
        if self.keyword_order == KeywordOrder::AuthorCountDesc {
            entries.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        }
        entries
    }

    /// Partitions `participants` into rooms using the keyword index.
    ///
    /// Author ids missing from the roster are ignored. Participants without a
    /// qualifying keyword are left out and stay in the main session.
    #[instrument(
        skip_all,
        fields(
            participants = participants.len(),
            keywords = index.len(),
            order = %self.keyword_order
        )
    )]
    pub fn partition(
        &self,
        participants: &[Participant],
        index: &KeywordIndex,
    ) -> Vec<BreakoutRoom> {
        let roster: HashMap<&str, &Participant> =
            participants.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut used: HashSet<&str> = HashSet::new();
        let mut groups: Vec<Vec<&Participant>> = Vec::new();

        for (keyword, authors) in self.ordered(index) {
            let mut available: Vec<&Participant> = authors
                .iter()
                .filter_map(|id| roster.get(id.as_str()).copied())
                .filter(|p| !used.contains(p.id.as_str()))
                .collect();

            if available.len() < self.min_candidates {
                debug!(keyword, available = available.len(), "Skipping keyword");
                continue;
            }

            while available.len() >= self.min_room_size {
                let take = available.len().min(self.max_room_size);
                let group: Vec<&Participant> = available.drain(..take).collect();
                used.extend(group.iter().map(|p| p.id.as_str()));
                debug!(keyword, size = group.len(), "Formed group");
                groups.push(group);
            }
        }

        let rooms: Vec<BreakoutRoom> = groups
            .into_iter()
            .enumerate()
            .map(|(i, group)| BreakoutRoom {
                id: Uuid::new_v4().to_string(),
                name: format!("Breakout Room {}", i + 1),
                interests: self.shared_interests(&group, index),
                participants: group.into_iter().cloned().collect(),
            })
            .collect();

        info!(
            rooms = rooms.len(),
            grouped = used.len(),
            "Partition finished"
        );
        rooms
    }

    /// Every keyword used by at least `min_interest_overlap` of the founding members,
    /// in index order.
    fn shared_interests(&self, group: &[&Participant], index: &KeywordIndex) -> Vec<String> {
        index
            .iter()
            .filter(|(_, authors)| {
                group
                    .iter()
                    .filter(|p| authors.iter().any(|a| a == &p.id))
                    .count()
                    >= self.min_interest_overlap
            })
            .map(|(keyword, _)| keyword.to_string())
            .collect()
    }
}
