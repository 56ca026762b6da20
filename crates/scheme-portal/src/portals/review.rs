use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{ReviewRecord, ValidationError};
use super::rubric::{clamp_score, Rubric, RubricScores};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Shortlisted,
    Rejected,
}

impl ReviewDecision {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewDecision::Shortlisted => "shortlisted",
            ReviewDecision::Rejected => "rejected",
        }
    }
}

/// Queue entry plus the reviewer's working scores and outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewEntry {
    pub record: ReviewRecord,
    pub scores: RubricScores,
    pub saved_total: Option<u8>,
    pub decision: Option<ReviewDecision>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("application '{0}' is not in the review queue")]
    UnknownApplication(String),
    #[error("review queue is empty")]
    EmptyQueue,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Reviewer console: pick an application, score it, shortlist or reject.
#[derive(Debug, Clone)]
pub struct ReviewConsole {
    rubric: Rubric,
    entries: Vec<ReviewEntry>,
    active: usize,
}

impl ReviewConsole {
    pub fn new(rubric: Rubric, queue: Vec<ReviewRecord>) -> Result<Self, ReviewError> {
        if queue.is_empty() {
            return Err(ReviewError::EmptyQueue);
        }
        let entries = queue
            .into_iter()
            .map(|record| ReviewEntry {
                record,
                scores: rubric.neutral_scores(),
                saved_total: None,
                decision: None,
            })
            .collect();

        Ok(Self {
            rubric,
            entries,
            active: 0,
        })
    }

    pub fn queue(&self) -> &[ReviewEntry] {
        &self.entries
    }

    pub fn active(&self) -> &ReviewEntry {
        &self.entries[self.active]
    }

    pub fn select(&mut self, application_id: &str) -> Result<&ReviewEntry, ReviewError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.record.id == application_id)
            .ok_or_else(|| ReviewError::UnknownApplication(application_id.to_string()))?;
        self.active = index;
        Ok(&self.entries[index])
    }

    /// Sets one criterion from raw slider input, clamped into range.
    pub fn set_score(&mut self, criterion: &str, raw: i64) -> Result<u8, ReviewError> {
        if self.rubric.weight(criterion).is_none() {
            return Err(ValidationError::UnknownField {
                field: criterion.to_string(),
            }
            .into());
        }
        let score = clamp_score(raw);
        self.entries[self.active]
            .scores
            .insert(criterion.to_string(), score);
        Ok(score)
    }

    /// Live total for the active application.
    pub fn total(&self) -> Result<u8, ReviewError> {
        Ok(self.rubric.total(&self.active().scores)?)
    }

    pub fn save_score(&mut self) -> Result<u8, ReviewError> {
        let total = self.total()?;
        let entry = &mut self.entries[self.active];
        entry.saved_total = Some(total);
        info!(application_id = %entry.record.id, total, "review score saved");
        Ok(total)
    }

    /// Records the decision along with the score it was based on.
    pub fn decide(&mut self, decision: ReviewDecision) -> Result<&ReviewEntry, ReviewError> {
        let total = self.save_score()?;
        let entry = &mut self.entries[self.active];
        entry.decision = Some(decision);
        info!(
            application_id = %entry.record.id,
            total,
            decision = decision.label(),
            "review decision recorded"
        );
        Ok(&self.entries[self.active])
    }

    pub fn shortlisted(&self) -> impl Iterator<Item = &ReviewEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.decision == Some(ReviewDecision::Shortlisted))
    }
}
