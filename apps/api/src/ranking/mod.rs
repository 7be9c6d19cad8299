// Resume ranking: PDF text extraction, normalization, TF-IDF scoring, ordering.
// Everything below `handlers`/`views` is synchronous and request-scoped; the
// handlers run it through `pipeline::rank_resumes_blocking`.

pub mod aggregate;
pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod stopwords;
pub mod tfidf;
pub mod views;

pub use pipeline::{FailurePolicy, RankingOutcome};
