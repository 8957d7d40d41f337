//! Test Module
//!
//! Test suite for the breakout planner.
//!
//! ## Test Categories
//! - `brain_tests`: tokenization, TF-IDF thresholds, keyword/author inversion
//! - `partition_tests`: room formation, ordering, roster resolution
//! - `state_tests`: join/leave/replace transitions and membership invariants
//! - `actor_tests`: breakout coordinator behavior
//! - `integration_tests`: transcript-to-plan workflows

pub mod actor_tests;
