use serde::Serialize;

/// One line of the ranking: a resume identifier and its raw cosine score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub resume: String,
    pub score: f64,
}

impl RankedResult {
    /// Score scaled to a percentage and rounded to 2 decimals, as the JSON API reports it.
    pub fn percentage(&self) -> f64 {
        (self.score * 100.0 * 100.0).round() / 100.0
    }
}

/// Pairs identifiers with scores and sorts by score, highest first.
///
/// Equal scores keep their input order. Panics if the two sequences differ in
/// length; that is a caller bug, not a runtime condition.
pub fn rank(identifiers: Vec<String>, scores: Vec<f64>) -> Vec<RankedResult> {
    assert_eq!(
        identifiers.len(),
        scores.len(),
        "every resume needs exactly one score"
    );

    let mut ranked: Vec<RankedResult> = identifiers
        .into_iter()
        .zip(scores)
        .map(|(resume, score)| RankedResult { resume, score })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
