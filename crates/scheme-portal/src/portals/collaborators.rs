use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationDraft, ApplicationId, SchemeId};

/// Receipt returned once the submission collaborator accepts a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub application_id: ApplicationId,
    pub scheme: SchemeId,
    pub submitted_at: DateTime<Utc>,
}

/// Application-submission endpoint the form hands its record to.
pub trait SubmissionSink: Send + Sync {
    fn submit(
        &self,
        scheme: SchemeId,
        draft: &ApplicationDraft,
    ) -> Result<SubmissionReceipt, SubmissionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("submission rejected: {reason}")]
    Rejected { reason: String },
    #[error("submission endpoint unavailable: {0}")]
    Unavailable(String),
}

/// Application-status endpoint supplying the current stage key.
pub trait StatusSource: Send + Sync {
    fn current_stage(&self, scheme: SchemeId) -> Result<String, StatusError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("no status recorded for {0}")]
    NotFound(SchemeId),
    #[error("status endpoint unavailable: {0}")]
    Unavailable(String),
}
