use std::sync::Arc;

use tracing::{info, warn};

use super::super::blueprint::PortalBlueprint;
use super::super::collaborators::{SubmissionError, SubmissionReceipt, SubmissionSink};
use super::super::domain::{ApplicationDraft, FieldValue, FormStep, ValidationError};
use super::store::{DraftStore, PersistenceError};

/// Multi-step application form: one state per step plus a terminal
/// submitted state.
pub struct DraftForm<S> {
    blueprint: Arc<PortalBlueprint>,
    store: Arc<S>,
    step: usize,
    record: ApplicationDraft,
    submitted: bool,
}

/// Errors raised while editing or submitting a draft.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("application already submitted")]
    AlreadySubmitted,
}

impl<S> DraftForm<S>
where
    S: DraftStore,
{
    /// Opens at step 0 with the stored draft, or an empty record when
    /// nothing is stored or the store fails. A failure is handed back as a
    /// warning rather than an error.
    pub fn open(
        blueprint: Arc<PortalBlueprint>,
        store: Arc<S>,
    ) -> (Self, Option<PersistenceError>) {
        let (record, warning) = match store.load(blueprint.storage_key) {
            Ok(Some(record)) => (record, None),
            Ok(None) => (ApplicationDraft::new(), None),
            Err(err) => {
                warn!(
                    scheme = %blueprint.scheme,
                    error = %err,
                    "stored draft unreadable, starting empty"
                );
                (ApplicationDraft::new(), Some(err))
            }
        };

        let form = Self {
            blueprint,
            store,
            step: 0,
            record,
            submitted: false,
        };
        (form, warning)
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.blueprint.steps.len()
    }

    pub fn current_step(&self) -> Option<&FormStep> {
        self.blueprint.steps.get(self.step)
    }

    pub fn is_last_step(&self) -> bool {
        self.step + 1 >= self.step_count()
    }

    pub fn record(&self) -> &ApplicationDraft {
        &self.record
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn next(&mut self) -> usize {
        let last = self.step_count().saturating_sub(1);
        self.step = (self.step + 1).min(last);
        self.step
    }

    pub fn prev(&mut self) -> usize {
        self.step = self.step.saturating_sub(1);
        self.step
    }

    pub fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        self.ensure_open()?;
        self.blueprint.validate_field(key, &value)?;
        self.record.insert(key, value);
        Ok(())
    }

    /// Appends a filename to a file-list field.
    pub fn add_document(&mut self, key: &str, name: &str) -> Result<(), FormError> {
        self.ensure_open()?;
        let mut files = self.record.files(key).to_vec();
        files.push(name.trim().to_string());
        let value = FieldValue::Files(files);
        self.blueprint.validate_field(key, &value)?;
        self.record.insert(key, value);
        Ok(())
    }

    pub fn save_draft(&self) -> Result<(), FormError> {
        self.ensure_open()?;
        self.store.save(self.blueprint.storage_key, &self.record)?;
        info!(
            scheme = %self.blueprint.scheme,
            step = self.step,
            fields = self.record.len(),
            "draft saved"
        );
        Ok(())
    }

    /// Hands the record to `sink` when on the final step; `Ok(None)` anywhere
    /// else. A rejected submission leaves the form and stored draft untouched.
    pub fn submit<K>(&mut self, sink: &K) -> Result<Option<SubmissionReceipt>, FormError>
    where
        K: SubmissionSink + ?Sized,
    {
        self.ensure_open()?;
        if !self.is_last_step() {
            return Ok(None);
        }

        let receipt = hand_off(&self.blueprint, self.store.as_ref(), sink, &self.record)?;
        self.submitted = true;
        Ok(Some(receipt))
    }

    fn ensure_open(&self) -> Result<(), FormError> {
        if self.submitted {
            Err(FormError::AlreadySubmitted)
        } else {
            Ok(())
        }
    }
}

/// Validates and submits a draft, then discards the stored copy. Clearing is
/// best effort: a store failure after acceptance is only logged.
pub(crate) fn hand_off<S, K>(
    blueprint: &PortalBlueprint,
    store: &S,
    sink: &K,
    draft: &ApplicationDraft,
) -> Result<SubmissionReceipt, FormError>
where
    S: DraftStore + ?Sized,
    K: SubmissionSink + ?Sized,
{
    blueprint.validate_draft(draft)?;
    let receipt = sink.submit(blueprint.scheme, draft)?;

    if let Err(err) = store.clear(blueprint.storage_key) {
        warn!(
            scheme = %blueprint.scheme,
            error = %err,
            "submitted draft could not be cleared"
        );
    }

    info!(
        scheme = %blueprint.scheme,
        application_id = %receipt.application_id,
        "application submitted"
    );
    Ok(receipt)
}
