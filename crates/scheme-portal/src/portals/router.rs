use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::collaborators::{StatusError, StatusSource, SubmissionError, SubmissionSink};
use super::domain::{ApplicationDraft, SchemeId, ValidationError};
use super::draft::DraftStore;
use super::eligibility::EligibilityAnswers;
use super::review::ReviewError;
use super::rubric::RubricScores;
use super::service::{PortalService, PortalServiceError};

/// Router builder exposing the per-scheme portal endpoints.
pub fn portal_router<S, K, T>(service: Arc<PortalService<S, K, T>>) -> Router
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    Router::new()
        .route("/api/v1/portals/:scheme", get(summary_handler::<S, K, T>))
        .route(
            "/api/v1/portals/:scheme/eligibility",
            post(eligibility_handler::<S, K, T>),
        )
        .route(
            "/api/v1/portals/:scheme/draft",
            get(load_draft_handler::<S, K, T>)
                .put(save_draft_handler::<S, K, T>)
                .delete(discard_draft_handler::<S, K, T>),
        )
        .route(
            "/api/v1/portals/:scheme/applications",
            post(submit_handler::<S, K, T>),
        )
        .route(
            "/api/v1/portals/:scheme/status",
            get(status_handler::<S, K, T>),
        )
        .route(
            "/api/v1/portals/:scheme/rubric",
            post(rubric_handler::<S, K, T>),
        )
        .route(
            "/api/v1/portals/:scheme/dashboard",
            get(dashboard_handler::<S, K, T>),
        )
        .with_state(service)
}

fn resolve(raw: &str) -> Result<SchemeId, PortalServiceError> {
    Ok(raw.parse::<SchemeId>()?)
}

pub(crate) fn status_for(error: &PortalServiceError) -> StatusCode {
    match error {
        PortalServiceError::Validation(ValidationError::UnknownScheme(_))
        | PortalServiceError::NotConfigured(_)
        | PortalServiceError::NotSupported { .. }
        | PortalServiceError::Status(StatusError::NotFound(_))
        | PortalServiceError::Review(ReviewError::UnknownApplication(_)) => StatusCode::NOT_FOUND,
        PortalServiceError::Validation(_)
        | PortalServiceError::Review(ReviewError::Validation(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PortalServiceError::Persistence(_)
        | PortalServiceError::Status(StatusError::Unavailable(_))
        | PortalServiceError::Submission(SubmissionError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        PortalServiceError::Submission(SubmissionError::Rejected { .. }) => StatusCode::BAD_GATEWAY,
        PortalServiceError::Form(_) => StatusCode::CONFLICT,
        PortalServiceError::Policy(_) | PortalServiceError::Review(ReviewError::EmptyQueue) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn error_response(error: PortalServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status_for(&error), axum::Json(payload)).into_response()
}

/// Body extraction failures use the same `{ "error": ... }` envelope.
fn json_body<B>(body: Result<axum::Json<B>, JsonRejection>) -> Result<B, Response> {
    body.map(|axum::Json(value)| value).map_err(|rejection| {
        let payload = json!({
            "error": rejection.body_text(),
        });
        (rejection.status(), axum::Json(payload)).into_response()
    })
}

pub(crate) async fn summary_handler<S, K, T>(
    State(service): State<Arc<PortalService<S, K, T>>>,
    Path(scheme): Path<String>,
) -> Response
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    match resolve(&scheme).and_then(|scheme| service.blueprint(scheme)) {
        Ok(blueprint) => (StatusCode::OK, axum::Json(blueprint.summary())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<S, K, T>(
    State(service): State<Arc<PortalService<S, K, T>>>,
    Path(scheme): Path<String>,
    body: Result<axum::Json<EligibilityAnswers>, JsonRejection>,
) -> Response
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    let answers = match json_body(body) {
        Ok(answers) => answers,
        Err(response) => return response,
    };
    match resolve(&scheme).and_then(|scheme| service.evaluate(scheme, &answers)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn load_draft_handler<S, K, T>(
    State(service): State<Arc<PortalService<S, K, T>>>,
    Path(scheme): Path<String>,
) -> Response
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    match resolve(&scheme).and_then(|scheme| service.load_draft(scheme)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn save_draft_handler<S, K, T>(
    State(service): State<Arc<PortalService<S, K, T>>>,
    Path(scheme): Path<String>,
    body: Result<axum::Json<ApplicationDraft>, JsonRejection>,
) -> Response
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    let draft = match json_body(body) {
        Ok(draft) => draft,
        Err(response) => return response,
    };
    let saved = resolve(&scheme).and_then(|scheme| {
        service.save_draft(scheme, &draft)?;
        service.blueprint(scheme)
    });
    match saved {
        Ok(blueprint) => {
            let payload = json!({
                "scheme": blueprint.scheme,
                "fields": draft.len(),
                "notice": blueprint.draft_saved_notice,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn discard_draft_handler<S, K, T>(
    State(service): State<Arc<PortalService<S, K, T>>>,
    Path(scheme): Path<String>,
) -> Response
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    match resolve(&scheme).and_then(|scheme| service.discard_draft(scheme)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<S, K, T>(
    State(service): State<Arc<PortalService<S, K, T>>>,
    Path(scheme): Path<String>,
    body: Result<axum::Json<ApplicationDraft>, JsonRejection>,
) -> Response
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    let draft = match json_body(body) {
        Ok(draft) => draft,
        Err(response) => return response,
    };
    let submitted = resolve(&scheme).and_then(|scheme| {
        let receipt = service.submit(scheme, &draft)?;
        Ok((receipt, service.blueprint(scheme)?))
    });
    match submitted {
        Ok((receipt, blueprint)) => {
            let payload = json!({
                "application_id": receipt.application_id,
                "scheme": receipt.scheme,
                "submitted_at": receipt.submitted_at,
                "notice": blueprint.submission_notice,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<S, K, T>(
    State(service): State<Arc<PortalService<S, K, T>>>,
    Path(scheme): Path<String>,
) -> Response
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    match resolve(&scheme).and_then(|scheme| service.status(scheme)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rubric_handler<S, K, T>(
    State(service): State<Arc<PortalService<S, K, T>>>,
    Path(scheme): Path<String>,
    body: Result<axum::Json<RubricScores>, JsonRejection>,
) -> Response
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    let scores = match json_body(body) {
        Ok(scores) => scores,
        Err(response) => return response,
    };
    match resolve(&scheme).and_then(|scheme| service.score_rubric(scheme, &scores)) {
        Ok(total) => (StatusCode::OK, axum::Json(total)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<S, K, T>(
    State(service): State<Arc<PortalService<S, K, T>>>,
    Path(scheme): Path<String>,
) -> Response
where
    S: DraftStore + 'static,
    K: SubmissionSink + 'static,
    T: StatusSource + 'static,
{
    match resolve(&scheme).and_then(|scheme| service.dashboard(scheme)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}
