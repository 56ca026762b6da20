//! Scheme application portals: eligibility scoring, draft forms, status
//! tracking, reviewer rubric and the shell that ties them together.
//!
//! Each portal is described by a [`PortalBlueprint`]; [`PortalService`]
//! composes blueprints with a draft store and the submission and status
//! collaborators, and [`portal_router`] exposes it over HTTP.

pub mod blueprint;
pub mod collaborators;
pub mod dashboard;
pub mod domain;
pub mod draft;
pub mod eligibility;
pub mod notice;
pub mod review;
pub mod router;
pub mod rubric;
pub mod service;
pub mod shell;
pub mod status;

#[cfg(test)]
mod tests;

pub use blueprint::{BlueprintSummary, PortalBlueprint};
pub use collaborators::{
    StatusError, StatusSource, SubmissionError, SubmissionReceipt, SubmissionSink,
};
pub use dashboard::{DashboardSnapshot, DataPoint, DataSeries, Kpi};
pub use domain::{
    ApplicationDraft, ApplicationId, FieldKind, FieldSpec, FieldValue, FormStep, Milestone,
    MilestoneStatus, ReviewRecord, Role, SchemeId, Stage, TabSpec, Theme, ValidationError,
};
pub use draft::{
    DraftForm, DraftStore, FileDraftStore, FormError, MemoryDraftStore, PersistenceError,
};
pub use eligibility::{
    AnswerValue, CompletionRule, EligibilityAnswers, EligibilityEngine, EligibilityOutcome,
    EligibilityPolicy, EligibilityQuestion, PolicyError, QuestionKind, ScoreComponent,
    ScoringRule, Verdict, VerdictLabels,
};
pub use notice::{Notice, NoticeBoard};
pub use review::{ReviewConsole, ReviewDecision, ReviewEntry, ReviewError};
pub use router::portal_router;
pub use rubric::{
    clamp_score, Rubric, RubricCriterion, RubricError, RubricScores, MAX_SCORE, MIN_SCORE,
};
pub use service::{DraftSnapshot, PortalService, PortalServiceError, RubricTotal};
pub use shell::{ShellError, TabShell};
pub use status::{StageMarker, StatusView};
