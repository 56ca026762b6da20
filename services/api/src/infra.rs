use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use scheme_portal::config::DraftStorageConfig;
use scheme_portal::portals::{
    AnswerValue, ApplicationDraft, ApplicationId, DraftStore, FileDraftStore, MemoryDraftStore,
    PersistenceError, SchemeId, StatusError, StatusSource, SubmissionError, SubmissionReceipt,
    SubmissionSink,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Draft store selected by `PORTAL_DRAFT_DIR`.
#[derive(Debug)]
pub(crate) enum ConfiguredDraftStore {
    Memory(MemoryDraftStore),
    Files(FileDraftStore),
}

impl ConfiguredDraftStore {
    pub(crate) fn from_config(config: &DraftStorageConfig) -> Self {
        match &config.directory {
            Some(directory) => Self::Files(FileDraftStore::new(directory)),
            None => Self::Memory(MemoryDraftStore::default()),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::Files(store) => store.root().display().to_string(),
        }
    }
}

impl DraftStore for ConfiguredDraftStore {
    fn load(&self, key: &str) -> Result<Option<ApplicationDraft>, PersistenceError> {
        match self {
            Self::Memory(store) => store.load(key),
            Self::Files(store) => store.load(key),
        }
    }

    fn save(&self, key: &str, draft: &ApplicationDraft) -> Result<(), PersistenceError> {
        match self {
            Self::Memory(store) => store.save(key, draft),
            Self::Files(store) => store.save(key, draft),
        }
    }

    fn clear(&self, key: &str) -> Result<(), PersistenceError> {
        match self {
            Self::Memory(store) => store.clear(key),
            Self::Files(store) => store.clear(key),
        }
    }
}

/// Accepts submissions in process memory and numbers them after the
/// sample review queue.
pub(crate) struct InMemoryApplicationRegistry {
    sequence: AtomicU64,
    received: Mutex<Vec<(SubmissionReceipt, ApplicationDraft)>>,
}

impl Default for InMemoryApplicationRegistry {
    fn default() -> Self {
        Self {
            sequence: AtomicU64::new(1004),
            received: Mutex::new(Vec::new()),
        }
    }
}

impl InMemoryApplicationRegistry {
    pub(crate) fn received(&self) -> Vec<(SubmissionReceipt, ApplicationDraft)> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SubmissionSink for InMemoryApplicationRegistry {
    fn submit(
        &self,
        scheme: SchemeId,
        draft: &ApplicationDraft,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        if draft.is_empty() {
            return Err(SubmissionError::Rejected {
                reason: "application has no fields".to_string(),
            });
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let receipt = SubmissionReceipt {
            application_id: ApplicationId(format!("APP-{id}")),
            scheme,
            submitted_at: Utc::now(),
        };
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((receipt.clone(), draft.clone()));
        info!(%scheme, application_id = %receipt.application_id, "application registered");
        Ok(receipt)
    }
}

/// Reports a fixed stage per scheme.
#[derive(Debug, Clone)]
pub(crate) struct FixedStatusSource {
    stages: BTreeMap<SchemeId, String>,
}

impl FixedStatusSource {
    pub(crate) fn demo() -> Self {
        let stages = [
            (SchemeId::Samridh, "due_diligence"),
            (SchemeId::Genesis, "mentor_review"),
        ]
        .into_iter()
        .map(|(scheme, stage)| (scheme, stage.to_string()))
        .collect();
        Self { stages }
    }
}

impl StatusSource for FixedStatusSource {
    fn current_stage(&self, scheme: SchemeId) -> Result<String, StatusError> {
        self.stages
            .get(&scheme)
            .cloned()
            .ok_or(StatusError::NotFound(scheme))
    }
}

pub(crate) fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// `yes`/`no` style values become flags; anything else is an option.
pub(crate) fn parse_answer(raw: &str) -> Result<(String, AnswerValue), String> {
    let (key, value) = parse_key_value(raw)?;
    let answer = match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => AnswerValue::Flag(true),
        "false" | "no" | "n" => AnswerValue::Flag(false),
        _ => AnswerValue::Choice(value),
    };
    Ok((key, answer))
}

pub(crate) fn parse_score(raw: &str) -> Result<(String, i64), String> {
    let (key, value) = parse_key_value(raw)?;
    let score = value
        .parse::<i64>()
        .map_err(|err| format!("score for '{key}' must be an integer ({err})"))?;
    Ok((key, score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_answers_as_flags_or_choices() {
        assert_eq!(
            parse_answer("dpiit=yes"),
            Ok(("dpiit".to_string(), AnswerValue::Flag(true)))
        );
        assert_eq!(
            parse_answer("incorporated = false"),
            Ok(("incorporated".to_string(), AnswerValue::Flag(false)))
        );
        assert_eq!(
            parse_answer("revenue=50L-1Cr"),
            Ok(("revenue".to_string(), AnswerValue::Choice("50L-1Cr".to_string())))
        );
        assert!(parse_answer("revenue").is_err());
        assert!(parse_answer("=yes").is_err());
    }

    #[test]
    fn parses_integer_scores() {
        assert_eq!(parse_score("team=4"), Ok(("team".to_string(), 4)));
        assert_eq!(parse_score("market=-1"), Ok(("market".to_string(), -1)));
        assert!(parse_score("market=high").is_err());
    }

    #[test]
    fn registry_numbers_submissions_after_the_sample_queue() {
        let registry = InMemoryApplicationRegistry::default();
        let draft = ApplicationDraft::new().with(
            "orgName",
            scheme_portal::portals::FieldValue::text("Agnika Tech"),
        );

        let first = registry
            .submit(SchemeId::Samridh, &draft)
            .expect("accepted");
        let second = registry
            .submit(SchemeId::Genesis, &draft)
            .expect("accepted");
        assert_eq!(first.application_id.0, "APP-1004");
        assert_eq!(second.application_id.0, "APP-1005");
        assert_eq!(registry.received().len(), 2);

        assert!(matches!(
            registry.submit(SchemeId::Genesis, &ApplicationDraft::new()),
            Err(SubmissionError::Rejected { .. })
        ));
    }

    #[test]
    fn configured_store_follows_draft_directory() {
        let memory = ConfiguredDraftStore::from_config(&DraftStorageConfig::default());
        assert_eq!(memory.describe(), "memory");

        let files = ConfiguredDraftStore::from_config(&DraftStorageConfig {
            directory: Some("/tmp/portal-drafts".into()),
        });
        assert!(matches!(files, ConfiguredDraftStore::Files(_)));
    }
}
