//! # Brain Module
//!
//! Interest analysis over the meeting chat. Turns a transcript into the
//! keyword index that breakout grouping works from.
//!
//! ## Components
//! - `corpus`: TF-IDF term weighting over one document per message
//! - `keywords`: tokenization, threshold filtering and keyword/author inversion

pub mod corpus;
pub mod keywords;

pub use corpus::{TermScore, TfIdfCorpus};
pub use keywords::{Extraction, InterestMap, KeywordExtractor, KeywordIndex};
