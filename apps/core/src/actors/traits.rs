use crate::brain::{KeywordExtractor, KeywordIndex};
use crate::models::ChatMessage;

/// Source of the keyword index the coordinator partitions on.
///
/// Abstracts the analysis step so the coordinator can be driven by the TF-IDF
/// extractor in production and by fixed indices in tests.
pub trait InterestAnalyzer: Send + Sync + 'static {
    fn analyze(&self, messages: &[ChatMessage]) -> KeywordIndex;
}

impl InterestAnalyzer for KeywordExtractor {
    fn analyze(&self, messages: &[ChatMessage]) -> KeywordIndex {
        self.extract(messages)
    }
}
