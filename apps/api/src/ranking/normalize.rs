use crate::ranking::stopwords::StopWords;

/// Lowercases `text`, splits it on whitespace and drops stopwords.
///
/// No punctuation stripping and no stemming: "python," and "python" stay distinct
/// tokens here and are only reconciled later by the vectorizer's token pattern.
/// The result is whitespace-joined and may be empty.
pub fn normalize_text(text: &str, stopwords: &StopWords) -> String {
    text.to_lowercase()
        .split_whitespace()
        .filter(|word| !stopwords.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
