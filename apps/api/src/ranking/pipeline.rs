//! Extract → normalize → score → rank, for one request.
//!
//! `rank_resumes` is synchronous and CPU-bound. Handlers go through
//! `rank_resumes_blocking`, which moves the work onto the blocking pool.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::models::resume::{Intake, JobDescription, ResumeUpload};
use crate::ranking::aggregate::{rank, RankedResult};
use crate::ranking::extract::{extract_upload, ExtractionOutcome};
use crate::ranking::normalize::normalize_text;
use crate::ranking::stopwords::StopWords;
use crate::ranking::tfidf::score_against_description;

/// What a resume that fails extraction does to the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The whole request fails with the first extraction error.
    Abort,
    /// The failed resume is left out of the ranking and reported as skipped.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(anyhow!(
                "EXTRACTION_FAILURE_POLICY must be 'abort' or 'skip', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Skip => write!(f, "skip"),
        }
    }
}

/// A resume that took no part in ranking, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedResume {
    pub resume: String,
    pub reason: String,
}

#[derive(Debug)]
pub enum RankingOutcome {
    Ranked {
        ranked: Vec<RankedResult>,
        skipped: Vec<SkippedResume>,
    },
    /// No resume produced text; the scorer was not run.
    NoResults { skipped: Vec<SkippedResume> },
}

pub fn rank_resumes(
    description: &JobDescription,
    resumes: &[ResumeUpload],
    intake: Intake,
    stopwords: &StopWords,
    policy: FailurePolicy,
) -> Result<RankingOutcome, AppError> {
    let normalized_description = normalize_text(&description.text, stopwords);

    let mut identifiers = Vec::with_capacity(resumes.len());
    let mut texts = Vec::with_capacity(resumes.len());
    let mut skipped = Vec::new();

    for upload in resumes {
        match extract_upload(upload, intake) {
            ExtractionOutcome::Extracted(text) => {
                let normalized = normalize_text(&text, stopwords);
                if normalized.is_empty() {
                    debug!("{} has no usable text; it will score 0", upload.identifier);
                }
                identifiers.push(upload.identifier.clone());
                texts.push(normalized);
            }
            ExtractionOutcome::Skipped(reason) => {
                debug!("Skipping {:?}: {}", upload.filename, reason.describe());
                skipped.push(SkippedResume {
                    resume: upload.identifier.clone(),
                    reason: reason.describe().to_string(),
                });
            }
            ExtractionOutcome::Failed(source) => match policy {
                FailurePolicy::Abort => {
                    return Err(AppError::Extraction {
                        resume: upload.identifier.clone(),
                        source,
                    });
                }
                FailurePolicy::Skip => {
                    warn!("Excluding {} from ranking: {source}", upload.identifier);
                    skipped.push(SkippedResume {
                        resume: upload.identifier.clone(),
                        reason: source.to_string(),
                    });
                }
            },
        }
    }

    if texts.is_empty() {
        info!(
            "No rankable resumes for '{}' ({} skipped)",
            description.title,
            skipped.len()
        );
        return Ok(RankingOutcome::NoResults { skipped });
    }

    let scores = score_against_description(&normalized_description, &texts);
    let ranked = rank(identifiers, scores);

    if let Some(top) = ranked.first() {
        info!(
            "Ranked {} resumes for '{}'; top: {} ({:.4})",
            ranked.len(),
            description.title,
            top.resume,
            top.score
        );
    }

    Ok(RankingOutcome::Ranked { ranked, skipped })
}

/// Runs `rank_resumes` on the blocking pool so PDF parsing and vectorizing do not
/// stall the async executor.
pub async fn rank_resumes_blocking(
    description: JobDescription,
    resumes: Vec<ResumeUpload>,
    intake: Intake,
    stopwords: Arc<StopWords>,
    policy: FailurePolicy,
) -> Result<RankingOutcome, AppError> {
    tokio::task::spawn_blocking(move || {
        rank_resumes(&description, &resumes, intake, &stopwords, policy)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("spawn_blocking failed in ranking: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{minimal_pdf, upload};

    fn job(text: &str) -> JobDescription {
        JobDescription {
            title: "Backend Engineer".to_string(),
            text: text.to_string(),
        }
    }

    fn ranked_of(outcome: RankingOutcome) -> (Vec<RankedResult>, Vec<SkippedResume>) {
        match outcome {
            RankingOutcome::Ranked { ranked, skipped } => (ranked, skipped),
            RankingOutcome::NoResults { .. } => panic!("expected a ranking"),
        }
    }

    #[test]
    fn test_matching_resume_ranks_first() {
        let resumes = vec![
            upload("b.pdf", &minimal_pdf(&["junior frontend designer"])),
            upload("a.pdf", &minimal_pdf(&["senior python backend engineer"])),
        ];
        let outcome = rank_resumes(
            &job("senior python backend engineer"),
            &resumes,
            Intake::Api,
            &StopWords::english(),
            FailurePolicy::Abort,
        )
        .unwrap();

        let (ranked, skipped) = ranked_of(outcome);
        assert!(skipped.is_empty());
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].resume, "a.pdf");
        assert!((ranked[0].score - 1.0).abs() < 1e-9);
        assert_eq!(ranked[1].resume, "b.pdf");
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_resume_without_text_is_still_ranked() {
        let resumes = vec![
            upload("scan.pdf", &minimal_pdf(&[""])),
            upload("typed.pdf", &minimal_pdf(&["rust engineer"])),
        ];
        let outcome = rank_resumes(
            &job("rust engineer"),
            &resumes,
            Intake::Form,
            &StopWords::english(),
            FailurePolicy::Abort,
        )
        .unwrap();

        let (ranked, _) = ranked_of(outcome);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[1].resume, "scan.pdf");
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_form_intake_with_no_pdfs_has_no_results() {
        let resumes = vec![upload("cover.docx", b"PK..."), upload("notes.txt", b"hi")];
        let outcome = rank_resumes(
            &job("rust engineer"),
            &resumes,
            Intake::Form,
            &StopWords::english(),
            FailurePolicy::Abort,
        )
        .unwrap();

        match outcome {
            RankingOutcome::NoResults { skipped } => assert_eq!(skipped.len(), 2),
            RankingOutcome::Ranked { .. } => panic!("nothing should have been ranked"),
        }
    }

    #[test]
    fn test_abort_policy_fails_the_whole_batch() {
        let resumes = vec![
            upload("good.pdf", &minimal_pdf(&["rust engineer"])),
            upload("bad.pdf", b"garbage"),
        ];
        let err = rank_resumes(
            &job("rust engineer"),
            &resumes,
            Intake::Api,
            &StopWords::english(),
            FailurePolicy::Abort,
        )
        .unwrap_err();

        match err {
            AppError::Extraction { resume, .. } => assert_eq!(resume, "bad.pdf"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_skip_policy_reports_failed_resume() {
        let resumes = vec![
            upload("good.pdf", &minimal_pdf(&["rust engineer"])),
            upload("bad.pdf", b"garbage"),
        ];
        let outcome = rank_resumes(
            &job("rust engineer"),
            &resumes,
            Intake::Api,
            &StopWords::english(),
            FailurePolicy::Skip,
        )
        .unwrap();

        let (ranked, skipped) = ranked_of(outcome);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].resume, "good.pdf");
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].resume, "bad.pdf");
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::Abort);
        assert_eq!(" SKIP ".parse::<FailurePolicy>().unwrap(), FailurePolicy::Skip);
        assert!("ignore".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::Skip.to_string(), "skip");
    }

    #[tokio::test]
    async fn test_blocking_wrapper_returns_outcome() {
        let outcome = rank_resumes_blocking(
            job("rust engineer"),
            vec![upload("a.pdf", &minimal_pdf(&["rust engineer"]))],
            Intake::Api,
            Arc::new(StopWords::english()),
            FailurePolicy::Abort,
        )
        .await
        .unwrap();
        let (ranked, _) = ranked_of(outcome);
        assert_eq!(ranked.len(), 1);
    }
}
