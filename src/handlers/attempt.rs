// src/handlers/attempt.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::attempt::{
        FlagRequest, NavigateRequest, SelectOptionRequest, StartAttemptRequest,
        StartAttemptResponse,
    },
    models::exam::ExamView,
    session::AttemptSession,
    state::AppState,
};

/// Starts a fresh attempt on an exam.
///
/// The session is created in the in-process registry and the timers
/// begin counting on the next sweep. Returns 201 with the attempt id
/// and the taker's view of the exam.
pub async fn start_attempt(
    State(state): State<AppState>,
    Path(exam_id): Path<i64>,
    Json(payload): Json<StartAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let exam = state
        .store
        .fetch_exam(exam_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))?;

    // Authoring already refuses empty exams; this guard covers content
    // written around the admin API.
    if exam.questions.is_empty() {
        return Err(AppError::BadRequest(
            "Exam has no questions".to_string(),
        ));
    }

    let session = AttemptSession::new(exam, payload.student_id);
    let response = StartAttemptResponse {
        attempt_id: session.id(),
        started_at: session.started_at(),
        exam: ExamView::from(session.exam()),
    };

    tracing::info!(
        "Attempt {} started on exam {} by student {}",
        session.id(),
        exam_id,
        payload.student_id
    );

    state.attempts.insert(session);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Live attempt status: current index, both countdowns, answered count,
/// and flags.
pub async fn attempt_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let status = state
        .attempts
        .with_session(id, |session| session.status())
        .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))?;

    Ok(Json(status))
}

/// Adds or removes one option from a question's answer set.
pub async fn select_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectOptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .attempts
        .with_session(id, |session| {
            session.select_option(payload.question_id, payload.option, payload.selected)
        })
        .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))??;

    Ok(StatusCode::NO_CONTENT)
}

/// Moves the current question pointer. Navigation is free in both
/// directions.
pub async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<NavigateRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .attempts
        .with_session(id, |session| session.go_to(payload.index))
        .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))??;

    Ok(StatusCode::NO_CONTENT)
}

/// Marks or unmarks a question for later review.
pub async fn toggle_flag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FlagRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .attempts
        .with_session(id, |session| session.toggle_flag(payload.question_id))
        .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))??;

    Ok(StatusCode::NO_CONTENT)
}

/// Finalizes the attempt and returns the graded result.
///
/// Finalization is idempotent: submitting an attempt that the timer (or
/// an earlier call) already sealed returns the identical result, and
/// the persistence step is an upsert so a failed write can be retried
/// by calling submit again.
pub async fn submit_attempt(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .attempts
        .with_session(id, |session| session.finalize_record())
        .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))?;

    state.store.save_result(&record).await?;

    tracing::info!(
        "Attempt {} submitted: {}/{} ({}%)",
        record.attempt_id,
        record.result.total_score,
        record.result.max_score,
        record.result.percentage
    );

    Ok(Json(record.result))
}
