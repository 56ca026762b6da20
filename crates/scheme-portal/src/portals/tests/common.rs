use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::portals::{
    ApplicationDraft, ApplicationId, DraftStore, EligibilityAnswers, MemoryDraftStore,
    PersistenceError, PortalService, SchemeId, StatusError, StatusSource, SubmissionError,
    SubmissionReceipt, SubmissionSink,
};

#[derive(Default)]
pub(super) struct RecordingSink {
    submissions: Mutex<Vec<(SchemeId, ApplicationDraft)>>,
}

impl RecordingSink {
    pub(super) fn submissions(&self) -> Vec<(SchemeId, ApplicationDraft)> {
        self.submissions.lock().expect("sink mutex poisoned").clone()
    }
}

impl SubmissionSink for RecordingSink {
    fn submit(
        &self,
        scheme: SchemeId,
        draft: &ApplicationDraft,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let mut guard = self.submissions.lock().expect("sink mutex poisoned");
        guard.push((scheme, draft.clone()));
        Ok(SubmissionReceipt {
            application_id: ApplicationId(format!("APP-{}", 2000 + guard.len())),
            scheme,
            submitted_at: Utc::now(),
        })
    }
}

pub(super) struct RejectingSink;

impl SubmissionSink for RejectingSink {
    fn submit(
        &self,
        _scheme: SchemeId,
        _draft: &ApplicationDraft,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        Err(SubmissionError::Rejected {
            reason: "intake window closed".to_string(),
        })
    }
}

pub(super) struct FixedStatus {
    stages: BTreeMap<SchemeId, String>,
}

impl FixedStatus {
    pub(super) fn demo() -> Self {
        let mut stages = BTreeMap::new();
        stages.insert(SchemeId::Samridh, "due_diligence".to_string());
        stages.insert(SchemeId::Genesis, "mentor_review".to_string());
        Self { stages }
    }

    pub(super) fn only(scheme: SchemeId, stage: &str) -> Self {
        let mut stages = BTreeMap::new();
        stages.insert(scheme, stage.to_string());
        Self { stages }
    }
}

impl StatusSource for FixedStatus {
    fn current_stage(&self, scheme: SchemeId) -> Result<String, StatusError> {
        self.stages
            .get(&scheme)
            .cloned()
            .ok_or(StatusError::NotFound(scheme))
    }
}

pub(super) struct UnavailableStore;

impl DraftStore for UnavailableStore {
    fn load(&self, _key: &str) -> Result<Option<ApplicationDraft>, PersistenceError> {
        Err(PersistenceError::Unavailable("storage quota exceeded".to_string()))
    }

    fn save(&self, _key: &str, _draft: &ApplicationDraft) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("storage quota exceeded".to_string()))
    }

    fn clear(&self, _key: &str) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("storage quota exceeded".to_string()))
    }
}

pub(super) type TestService = PortalService<MemoryDraftStore, RecordingSink, FixedStatus>;

pub(super) fn build_service() -> (TestService, Arc<MemoryDraftStore>, Arc<RecordingSink>) {
    let store = Arc::new(MemoryDraftStore::default());
    let sink = Arc::new(RecordingSink::default());
    let service = PortalService::new(store.clone(), sink.clone(), Arc::new(FixedStatus::demo()))
        .expect("built-in portals are valid");
    (service, store, sink)
}

pub(super) fn samridh_answers(yes: usize) -> EligibilityAnswers {
    ["incorporated", "dpiit", "ip", "revenue", "accelerator"]
        .into_iter()
        .enumerate()
        .fold(EligibilityAnswers::new(), |answers, (index, key)| {
            answers.flag(key, index < yes)
        })
}

pub(super) fn genesis_answers(
    incorporated: bool,
    dpiit: bool,
    revenue: &str,
    ip_status: &str,
) -> EligibilityAnswers {
    EligibilityAnswers::new()
        .flag("incorporated", incorporated)
        .flag("dpiit", dpiit)
        .choice("revenue", revenue)
        .choice("ipStatus", ip_status)
}

pub(super) fn genesis_draft() -> ApplicationDraft {
    use crate::portals::FieldValue;

    ApplicationDraft::new()
        .with("orgName", FieldValue::text("Sarvam Civic Labs"))
        .with("email", FieldValue::text("team@sarvamcivic.in"))
        .with("challengeTrack", FieldValue::text("AI for Governance"))
        .with("docs", FieldValue::Files(vec!["pitch.pdf".to_string()]))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
