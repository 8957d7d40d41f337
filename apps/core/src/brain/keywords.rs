//! Interest extraction using TF-IDF.
//!
//! Every chat message is one document of a fresh corpus. Terms that clear the
//! relevance threshold become keywords of the message author, and the per-author
//! keyword sets are inverted into the [`KeywordIndex`] the partitioner groups on.
//! English stopwords are dropped before scoring.

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::{debug, instrument};

use super::corpus::TfIdfCorpus;
use crate::config::{BreakoutConfig, DEFAULT_MIN_KEYWORD_LEN, DEFAULT_RELEVANCE_THRESHOLD};
use crate::models::ChatMessage;

/// English stopwords removed before scoring. Single letters and digits are included;
/// longer numbers are regular terms.
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "also", "am", "an", "and", "another", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "came", "can", "cannot", "come", "could", "did", "do", "does", "doing", "during",
    "each", "few", "for", "from", "further", "get", "got", "has", "had", "he", "have", "her",
    "here", "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself",
    "like", "make", "many", "me", "might", "more", "most", "much", "must", "my", "myself",
    "never", "now", "of", "on", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "said", "same", "see", "should", "since", "so", "some", "still", "such", "take",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
    "way", "we", "well", "were", "what", "where", "when", "which", "while", "who", "whom",
    "with", "would", "why", "you", "your", "yours", "yourself", "a", "b", "c", "d", "e", "f",
    "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v", "w", "x",
    "y", "z", "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "_",
];

/// Anything that is not a letter, digit or underscore separates words.
static WORD_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_]+").expect("word separator pattern is valid"));

/// Insertion-ordered multimap from a key to a deduplicated, ordered list of values.
///
/// Used in both directions of extraction: author -> keywords and keyword -> authors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestMap {
    entries: Vec<(String, Vec<String>)>,
    positions: HashMap<String, usize>,
}

/// Keyword -> ids of the authors who used it above the relevance threshold.
pub type KeywordIndex = InterestMap;

impl InterestMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` under `key`, creating the key if needed.
    ///
    /// Returns `false` if the value was already present for that key.
    pub fn insert(&mut self, key: &str, value: &str) -> bool {
        let pos = match self.positions.get(key) {
            Some(&pos) => pos,
            None => {
                self.positions.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        let values = &mut self.entries[pos].1;
        if values.iter().any(|v| v == value) {
            return false;
        }
        values.push(value.to_string());
        true
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.positions
            .get(key)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Entries in insertion order of their keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Swaps keys and values, walking keys in order and each key's values in order.
    pub fn invert(&self) -> InterestMap {
        let mut inverted = InterestMap::new();
        for (key, values) in self.iter() {
            for value in values {
                inverted.insert(value, key);
            }
        }
        inverted
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for InterestMap
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (K, Vec<V>)>>(iter: T) -> Self {
        let mut map = InterestMap::new();
        for (key, values) in iter {
            if !map.contains_key(key.as_ref()) {
                map.positions.insert(key.as_ref().to_string(), map.entries.len());
                map.entries.push((key.as_ref().to_string(), Vec::new()));
            }
            for value in values {
                map.insert(key.as_ref(), value.as_ref());
            }
        }
        map
    }
}

impl Serialize for InterestMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// Everything one extraction pass produced, including the corpus it scored against.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub corpus: TfIdfCorpus,
    /// Author id -> retained keywords, authors in first-message order.
    pub by_author: InterestMap,
    /// Keyword -> author ids.
    pub index: KeywordIndex,
}

/// Keyword extractor using TF-IDF
pub struct KeywordExtractor {
    stopwords: HashSet<&'static str>,
    relevance_threshold: f64,
    min_keyword_len: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Create a new keyword extractor with default settings
    pub fn new() -> Self {
        Self::with_config(DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_MIN_KEYWORD_LEN)
    }

    /// Create a keyword extractor with custom threshold and keyword length floor
    pub fn with_config(relevance_threshold: f64, min_keyword_len: usize) -> Self {
        let stopwords = STOPWORDS.iter().copied().collect();

        Self {
            stopwords,
            relevance_threshold,
            min_keyword_len,
        }
    }

    pub fn from_config(config: &BreakoutConfig) -> Self {
        Self::with_config(config.relevance_threshold, config.min_keyword_len)
    }

    /// Tokenize text into lower-cased words, dropping stopwords
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        WORD_SEPARATOR
            .split(&lower)
            .filter(|word| !word.is_empty() && !self.stopwords.contains(*word))
            .map(str::to_string)
            .collect()
    }

    fn is_keyword(&self, term: &str, score: f64) -> bool {
        score > self.relevance_threshold && term.chars().count() >= self.min_keyword_len
    }

    /// Builds a corpus with one document per message, in message order.
    pub fn build_corpus(&self, messages: &[ChatMessage]) -> TfIdfCorpus {
        let mut corpus = TfIdfCorpus::new();
        for message in messages {
            corpus.add_document(self.tokenize(&message.content));
        }
        corpus
    }

    /// Extract the keyword index for a transcript
    pub fn extract(&self, messages: &[ChatMessage]) -> KeywordIndex {
        self.extract_with_corpus(messages).index
    }

    /// Extract keywords and keep the intermediate corpus and per-author sets
    #[instrument(skip_all, fields(messages = messages.len()))]
    pub fn extract_with_corpus(&self, messages: &[ChatMessage]) -> Extraction {
        let corpus = self.build_corpus(messages);

        let mut by_author = InterestMap::new();
        for (index, message) in messages.iter().enumerate() {
            let mut retained = 0usize;
            for term in corpus.list_terms(index) {
                if self.is_keyword(&term.term, term.score) {
                    by_author.insert(&message.author_id, &term.term);
                    retained += 1;
                }
            }
            if retained == 0 {
                debug!(author = %message.author_id, index, "Message contributed no keywords");
            }
        }

        let index = by_author.invert();
        debug!(
            authors = by_author.len(),
            keywords = index.len(),
            "Keyword extraction finished"
        );

        Extraction {
            corpus,
            by_author,
            index,
        }
    }
}
