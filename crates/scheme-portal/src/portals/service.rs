use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::blueprint::PortalBlueprint;
use super::collaborators::{
    StatusError, StatusSource, SubmissionError, SubmissionReceipt, SubmissionSink,
};
use super::dashboard::DashboardSnapshot;
use super::domain::{ApplicationDraft, SchemeId, ValidationError};
use super::draft::{hand_off, DraftForm, DraftStore, FormError, PersistenceError};
use super::eligibility::{EligibilityAnswers, EligibilityEngine, EligibilityOutcome, PolicyError};
use super::review::{ReviewConsole, ReviewError};
use super::rubric::RubricScores;
use super::shell::TabShell;
use super::status::StatusView;

struct Portal {
    blueprint: Arc<PortalBlueprint>,
    engine: EligibilityEngine,
}

/// Service composing the per-scheme blueprints with the draft store and the
/// submission and status collaborators.
pub struct PortalService<S, K, T> {
    portals: BTreeMap<SchemeId, Portal>,
    store: Arc<S>,
    sink: Arc<K>,
    status: Arc<T>,
}

/// Stored draft as seen by a client. A store failure is reported as a
/// warning next to an empty draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSnapshot {
    pub scheme: SchemeId,
    pub draft: ApplicationDraft,
    pub restored: bool,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricTotal {
    pub scheme: SchemeId,
    pub total: u8,
    pub weighted: f64,
}

impl<S, K, T> PortalService<S, K, T>
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    /// Serves both built-in portals.
    pub fn new(store: Arc<S>, sink: Arc<K>, status: Arc<T>) -> Result<Self, PortalServiceError> {
        let blueprints = SchemeId::ordered().map(PortalBlueprint::for_scheme);
        Self::with_blueprints(blueprints, store, sink, status)
    }

    pub fn with_blueprints(
        blueprints: impl IntoIterator<Item = PortalBlueprint>,
        store: Arc<S>,
        sink: Arc<K>,
        status: Arc<T>,
    ) -> Result<Self, PortalServiceError> {
        let mut portals = BTreeMap::new();
        for blueprint in blueprints {
            let engine = EligibilityEngine::new(blueprint.eligibility.clone())?;
            portals.insert(
                blueprint.scheme,
                Portal {
                    blueprint: Arc::new(blueprint),
                    engine,
                },
            );
        }

        Ok(Self {
            portals,
            store,
            sink,
            status,
        })
    }

    pub fn schemes(&self) -> impl Iterator<Item = SchemeId> + '_ {
        self.portals.keys().copied()
    }

    fn portal(&self, scheme: SchemeId) -> Result<&Portal, PortalServiceError> {
        self.portals
            .get(&scheme)
            .ok_or(PortalServiceError::NotConfigured(scheme))
    }

    pub fn blueprint(&self, scheme: SchemeId) -> Result<Arc<PortalBlueprint>, PortalServiceError> {
        Ok(Arc::clone(&self.portal(scheme)?.blueprint))
    }

    pub fn evaluate(
        &self,
        scheme: SchemeId,
        answers: &EligibilityAnswers,
    ) -> Result<EligibilityOutcome, PortalServiceError> {
        let outcome = self.portal(scheme)?.engine.evaluate(answers)?;
        debug!(
            %scheme,
            score = outcome.score,
            verdict = outcome.verdict.label(),
            answered = outcome.answered,
            "eligibility evaluated"
        );
        Ok(outcome)
    }

    pub fn load_draft(&self, scheme: SchemeId) -> Result<DraftSnapshot, PortalServiceError> {
        let blueprint = &self.portal(scheme)?.blueprint;
        let snapshot = match self.store.load(blueprint.storage_key) {
            Ok(Some(draft)) => DraftSnapshot {
                scheme,
                draft,
                restored: true,
                warning: None,
            },
            Ok(None) => DraftSnapshot {
                scheme,
                draft: ApplicationDraft::new(),
                restored: false,
                warning: None,
            },
            Err(err) => {
                warn!(%scheme, error = %err, "stored draft unreadable, serving empty draft");
                DraftSnapshot {
                    scheme,
                    draft: ApplicationDraft::new(),
                    restored: false,
                    warning: Some(err.to_string()),
                }
            }
        };
        Ok(snapshot)
    }

    pub fn save_draft(
        &self,
        scheme: SchemeId,
        draft: &ApplicationDraft,
    ) -> Result<(), PortalServiceError> {
        let blueprint = &self.portal(scheme)?.blueprint;
        blueprint.validate_draft(draft)?;
        self.store.save(blueprint.storage_key, draft)?;
        info!(%scheme, fields = draft.len(), "draft saved");
        Ok(())
    }

    pub fn discard_draft(&self, scheme: SchemeId) -> Result<(), PortalServiceError> {
        let blueprint = &self.portal(scheme)?.blueprint;
        self.store.clear(blueprint.storage_key)?;
        info!(%scheme, "draft discarded");
        Ok(())
    }

    /// Submits a complete record directly; a rejected submission leaves any
    /// stored draft in place.
    pub fn submit(
        &self,
        scheme: SchemeId,
        draft: &ApplicationDraft,
    ) -> Result<SubmissionReceipt, PortalServiceError> {
        let blueprint = &self.portal(scheme)?.blueprint;
        let receipt = hand_off(blueprint, self.store.as_ref(), self.sink.as_ref(), draft)?;
        Ok(receipt)
    }

    pub fn status(&self, scheme: SchemeId) -> Result<StatusView, PortalServiceError> {
        let blueprint = &self.portal(scheme)?.blueprint;
        let current = self.status.current_stage(scheme)?;
        Ok(StatusView::project(
            scheme,
            &blueprint.stages,
            &current,
            &blueprint.milestones,
        ))
    }

    pub fn score_rubric(
        &self,
        scheme: SchemeId,
        scores: &RubricScores,
    ) -> Result<RubricTotal, PortalServiceError> {
        let blueprint = &self.portal(scheme)?.blueprint;
        let rubric = blueprint
            .rubric
            .as_ref()
            .ok_or(PortalServiceError::NotSupported {
                scheme,
                feature: "rubric",
            })?;
        let weighted = rubric.weighted_total(scores)?;
        let total = rubric.total(scores)?;
        Ok(RubricTotal {
            scheme,
            total,
            weighted,
        })
    }

    pub fn dashboard(&self, scheme: SchemeId) -> Result<DashboardSnapshot, PortalServiceError> {
        Ok(self.portal(scheme)?.blueprint.dashboard.clone())
    }

    /// Opens a form over the shared store, restoring any saved draft.
    pub fn open_form(
        &self,
        scheme: SchemeId,
    ) -> Result<(DraftForm<S>, Option<PersistenceError>), PortalServiceError> {
        let blueprint = self.blueprint(scheme)?;
        Ok(DraftForm::open(blueprint, Arc::clone(&self.store)))
    }

    pub fn open_shell(&self, scheme: SchemeId) -> Result<TabShell, PortalServiceError> {
        Ok(TabShell::new(self.blueprint(scheme)?))
    }

    pub fn review_console(&self, scheme: SchemeId) -> Result<ReviewConsole, PortalServiceError> {
        let blueprint = &self.portal(scheme)?.blueprint;
        let rubric = blueprint
            .rubric
            .clone()
            .ok_or(PortalServiceError::NotSupported {
                scheme,
                feature: "review",
            })?;
        Ok(ReviewConsole::new(rubric, blueprint.review_queue.clone())?)
    }

    /// Hands the form's record to the configured submission collaborator.
    pub fn submit_form(
        &self,
        form: &mut DraftForm<S>,
    ) -> Result<Option<SubmissionReceipt>, PortalServiceError> {
        Ok(form.submit(self.sink.as_ref())?)
    }
}

/// Error raised by the portal service.
#[derive(Debug, thiserror::Error)]
pub enum PortalServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Status(#[from] StatusError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Form(FormError),
    #[error("portal '{0}' is not configured")]
    NotConfigured(SchemeId),
    #[error("{feature} is not offered by the {scheme} portal")]
    NotSupported {
        scheme: SchemeId,
        feature: &'static str,
    },
}

impl From<FormError> for PortalServiceError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(err) => Self::Validation(err),
            FormError::Persistence(err) => Self::Persistence(err),
            FormError::Submission(err) => Self::Submission(err),
            other => Self::Form(other),
        }
    }
}
