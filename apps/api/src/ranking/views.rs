use askama::Template;

use crate::ranking::aggregate::RankedResult;
use crate::ranking::pipeline::SkippedResume;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {}

/// Ranking view for the form path. Scores are shown as raw fractions.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsPage<'a> {
    pub job_title: &'a str,
    pub ranked_resumes: &'a [RankedResult],
    pub skipped: &'a [SkippedResume],
}
