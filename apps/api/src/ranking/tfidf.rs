//! Request-scoped TF-IDF vector space and cosine scoring.
//!
//! Vocabulary and IDF weights are fitted over exactly the documents of one
//! request (the description plus every resume), so a resume's score depends on
//! which other resumes it was submitted with.
//!
//! Weighting:
//! - tokens: lowercase, Unicode `\b\w\w+\b` (two or more word characters)
//! - tf: raw count of the term in the document
//! - idf: `ln((1 + n) / (1 + df)) + 1`, `n` = number of documents
//! - each document vector is L2-normalized

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

type SparseVector = HashMap<usize, f64>;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex"))
}

pub fn tokenize(document: &str) -> Vec<String> {
    let lowered = document.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A fitted vector space. Row `i` is the vector of the `i`th input document.
#[derive(Debug)]
pub struct TfIdfSpace {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    vectors: Vec<SparseVector>,
}

impl TfIdfSpace {
    pub fn fit_transform<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        let mut counts: Vec<HashMap<usize, usize>> = Vec::with_capacity(tokenized.len());

        for tokens in &tokenized {
            let mut doc_counts: HashMap<usize, usize> = HashMap::new();
            for token in tokens {
                let next_id = vocabulary.len();
                let term_id = *vocabulary.entry(token.clone()).or_insert(next_id);
                if term_id == document_frequency.len() {
                    document_frequency.push(0);
                }
                *doc_counts.entry(term_id).or_insert(0) += 1;
            }
            for term_id in doc_counts.keys() {
                document_frequency[*term_id] += 1;
            }
            counts.push(doc_counts);
        }

        let n = documents.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = counts
            .into_iter()
            .map(|doc_counts| {
                let mut vector: SparseVector = doc_counts
                    .into_iter()
                    .map(|(term_id, tf)| (term_id, tf as f64 * idf[term_id]))
                    .collect();
                l2_normalize(&mut vector);
                vector
            })
            .collect();

        Self {
            vocabulary,
            idf,
            vectors,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn document_count(&self) -> usize {
        self.vectors.len()
    }

    #[cfg(test)]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&id| self.idf[id])
    }

    /// Cosine similarity of documents `a` and `b`, in [0, 1].
    /// A document with no vocabulary terms scores 0.0 against everything.
    pub fn cosine(&self, a: usize, b: usize) -> f64 {
        cosine_similarity(&self.vectors[a], &self.vectors[b])
    }
}

fn l2_normalize(vector: &mut SparseVector) {
    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
}

fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|v| w * v))
        .sum();
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Scores each resume against the description, in input order.
///
/// Callers must not pass an empty `resumes` slice; there is nothing to rank and
/// the pipeline short-circuits before getting here.
pub fn score_against_description<S: AsRef<str>>(description: &str, resumes: &[S]) -> Vec<f64> {
    debug_assert!(!resumes.is_empty(), "scorer invoked with no resumes");

    let mut documents: Vec<&str> = Vec::with_capacity(resumes.len() + 1);
    documents.push(description);
    documents.extend(resumes.iter().map(|r| r.as_ref()));

    let space = TfIdfSpace::fit_transform(&documents);
    debug!(
        "Fitted TF-IDF space: {} documents, {} terms",
        space.document_count(),
        space.vocabulary_size()
    );
    (1..space.document_count())
        .map(|i| space.cosine(0, i))
        .collect()
}
