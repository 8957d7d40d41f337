//! TF-IDF corpus.
//!
//! A corpus is a plain value: callers build one per extraction and drop it (or keep it
//! for inspection) afterwards. Nothing is shared between extraction calls.

use serde::Serialize;
use std::collections::HashMap;

/// Relevance of one term inside one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermScore {
    /// The term (already lower-cased)
    pub term: String,
    /// TF-IDF score
    pub score: f64,
    /// Raw count of the term in the document
    pub frequency: usize,
}

/// Distinct terms of a document with their counts, in order of first appearance.
#[derive(Debug, Clone, Default)]
struct Document {
    terms: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl Document {
    fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut doc = Document::default();
        for token in tokens {
            match doc.positions.get(&token) {
                Some(&pos) => doc.terms[pos].1 += 1,
                None => {
                    doc.positions.insert(token.clone(), doc.terms.len());
                    doc.terms.push((token, 1));
                }
            }
        }
        doc
    }

    fn count(&self, term: &str) -> usize {
        self.positions
            .get(term)
            .map(|&pos| self.terms[pos].1)
            .unwrap_or(0)
    }
}

/// Term-weighting corpus over a set of tokenized documents.
///
/// * `tf(t, d)` is the raw count of `t` in `d`
/// * `idf(t) = 1 + ln(N / (1 + df(t)))`
#[derive(Debug, Clone, Default)]
pub struct TfIdfCorpus {
    documents: Vec<Document>,
    doc_freq: HashMap<String, usize>,
}

impl TfIdfCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document and returns its index.
    pub fn add_document<I>(&mut self, tokens: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let doc = Document::from_tokens(tokens);
        for (term, _) in &doc.terms {
            *self.doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
        self.documents.push(doc);
        self.documents.len() - 1
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of documents containing `term`.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    pub fn idf(&self, term: &str) -> f64 {
        let n = self.documents.len() as f64;
        let df = self.document_frequency(term) as f64;
        1.0 + (n / (1.0 + df)).ln()
    }

    /// Score of `term` in the document at `index`; 0 for unknown documents or absent terms.
    pub fn tfidf(&self, term: &str, index: usize) -> f64 {
        match self.documents.get(index) {
            Some(doc) => doc.count(term) as f64 * self.idf(term),
            None => 0.0,
        }
    }

    /// All distinct terms of a document, highest score first.
    ///
    /// Ties keep first-appearance order. Unknown indices yield an empty list.
    pub fn list_terms(&self, index: usize) -> Vec<TermScore> {
        let Some(doc) = self.documents.get(index) else {
            return vec![];
        };

        let mut scores: Vec<TermScore> = doc
            .terms
            .iter()
            .map(|(term, count)| TermScore {
                term: term.clone(),
                score: *count as f64 * self.idf(term),
                frequency: *count,
            })
            .collect();

        // sort_by is stable
        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scores
    }
}
