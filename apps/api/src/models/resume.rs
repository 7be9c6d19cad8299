use bytes::Bytes;

/// The role being hired for. `title` is an opaque label carried to the output;
/// only `text` takes part in scoring.
#[derive(Debug, Clone)]
pub struct JobDescription {
    pub title: String,
    pub text: String,
}

/// One uploaded resume, held in memory for the duration of a request.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    /// Display key in the ranking. Not guaranteed unique within a request.
    pub identifier: String,
    /// Filename exactly as the client supplied it.
    pub filename: String,
    pub content: Bytes,
}

/// Which entry point received the uploads. Form intake filters by filename
/// suffix; API intake ranks whatever it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intake {
    Form,
    Api,
}
