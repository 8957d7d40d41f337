//! Breakout configuration.
//!
//! Every knob has a default matching the reference grouping behavior. Values can be
//! overridden through `HUDDLE_*` environment variables (a `.env` file is honored).

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::breakout::partition::KeywordOrder;
use crate::error::AppError;

/// TF-IDF score a term must strictly exceed to count as a keyword.
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.5;
/// Shortest keyword kept, in characters (terms of 3 characters or fewer are dropped).
pub const DEFAULT_MIN_KEYWORD_LEN: usize = 4;
pub const DEFAULT_MIN_ROOM_SIZE: usize = 3;
pub const DEFAULT_MAX_ROOM_SIZE: usize = 4;
/// A keyword with fewer eligible authors than this is not considered at all.
pub const DEFAULT_MIN_CANDIDATES: usize = 2;
pub const DEFAULT_MIN_INTEREST_OVERLAP: usize = 1;

const ENV_PREFIX: &str = "HUDDLE_";

/// Tuning for keyword extraction and room partitioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_room_bounds"))]
pub struct BreakoutConfig {
    #[validate(range(min = 0.0))]
    pub relevance_threshold: f64,
    #[validate(range(min = 1))]
    pub min_keyword_len: usize,
    /// Smallest room the partitioner forms. Pairs are never offered as breakouts.
    #[validate(range(min = 3))]
    pub min_room_size: usize,
    pub max_room_size: usize,
    #[validate(range(min = 1))]
    pub min_candidates: usize,
    /// How many founding members must share a keyword for it to be listed on the room.
    #[validate(range(min = 1))]
    pub min_interest_overlap: usize,
    pub keyword_order: KeywordOrder,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            min_keyword_len: DEFAULT_MIN_KEYWORD_LEN,
            min_room_size: DEFAULT_MIN_ROOM_SIZE,
            max_room_size: DEFAULT_MAX_ROOM_SIZE,
            min_candidates: DEFAULT_MIN_CANDIDATES,
            min_interest_overlap: DEFAULT_MIN_INTEREST_OVERLAP,
            keyword_order: KeywordOrder::default(),
        }
    }
}

fn validate_room_bounds(config: &BreakoutConfig) -> Result<(), ValidationError> {
    if config.max_room_size < config.min_room_size {
        return Err(ValidationError::new("max_room_size_below_min_room_size"));
    }
    // The spawning keyword must always qualify as an interest of its own room.
    if config.min_interest_overlap > config.min_room_size {
        return Err(ValidationError::new("min_interest_overlap_above_min_room_size"));
    }
    Ok(())
}

impl BreakoutConfig {
    /// Loads `.env` (if present), then reads overrides from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a validated config from an arbitrary key lookup.
    ///
    /// Keys are the field names upper-cased and prefixed with `HUDDLE_`, e.g.
    /// `HUDDLE_RELEVANCE_THRESHOLD`. Missing keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            relevance_threshold: read(
                &lookup,
                "RELEVANCE_THRESHOLD",
                defaults.relevance_threshold,
            )?,
            min_keyword_len: read(&lookup, "MIN_KEYWORD_LEN", defaults.min_keyword_len)?,
            min_room_size: read(&lookup, "MIN_ROOM_SIZE", defaults.min_room_size)?,
            max_room_size: read(&lookup, "MAX_ROOM_SIZE", defaults.max_room_size)?,
            min_candidates: read(&lookup, "MIN_CANDIDATES", defaults.min_candidates)?,
            min_interest_overlap: read(
                &lookup,
                "MIN_INTEREST_OVERLAP",
                defaults.min_interest_overlap,
            )?,
            keyword_order: read(&lookup, "KEYWORD_ORDER", defaults.keyword_order)?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn read<T, F>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{}{}", ENV_PREFIX, name);
    match lookup(&key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{}={:?}: {}", key, raw, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = BreakoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.relevance_threshold, 0.5);
        assert_eq!(config.min_keyword_len, 4);
        assert_eq!((config.min_room_size, config.max_room_size), (3, 4));
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = BreakoutConfig::from_lookup(lookup_from(&[
            ("HUDDLE_RELEVANCE_THRESHOLD", "0.8"),
            ("HUDDLE_MAX_ROOM_SIZE", "6"),
            ("HUDDLE_KEYWORD_ORDER", "author_count_desc"),
        ]))
        .unwrap();

        assert_eq!(config.relevance_threshold, 0.8);
        assert_eq!(config.max_room_size, 6);
        assert_eq!(config.keyword_order, KeywordOrder::AuthorCountDesc);
        assert_eq!(config.min_room_size, DEFAULT_MIN_ROOM_SIZE);
    }

    #[test]
    fn test_unparsable_value_is_config_error() {
        let err = BreakoutConfig::from_lookup(lookup_from(&[("HUDDLE_MIN_ROOM_SIZE", "three")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_inverted_room_bounds_rejected() {
        let err = BreakoutConfig::from_lookup(lookup_from(&[
            ("HUDDLE_MIN_ROOM_SIZE", "5"),
            ("HUDDLE_MAX_ROOM_SIZE", "4"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_pair_sized_rooms_rejected() {
        let err = BreakoutConfig::from_lookup(lookup_from(&[("HUDDLE_MIN_ROOM_SIZE", "2")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_overlap_above_room_floor_rejected() {
        let config = BreakoutConfig {
            min_interest_overlap: 4,
            ..BreakoutConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        temp_env::with_vars(
            [
                ("HUDDLE_MIN_KEYWORD_LEN", Some("6")),
                ("HUDDLE_MIN_CANDIDATES", Some("3")),
            ],
            || {
                let config = BreakoutConfig::from_env().unwrap();
                assert_eq!(config.min_keyword_len, 6);
                assert_eq!(config.min_candidates, 3);
            },
        );
    }
}
