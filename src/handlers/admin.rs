// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::exam::{CreateExamRequest, UpdateExamRequest},
    store::SharedStore,
    utils::html::clean_text,
};

/// Creates an exam together with its questions.
///
/// This is the boundary that enforces what the grading engine assumes:
/// validation rejects zero-question exams, empty or out-of-range
/// correct sets, duplicate labels, and non-positive durations/points.
/// Authored text is sanitized before it is stored.
pub async fn create_exam(
    State(store): State<SharedStore>,
    Json(mut payload): Json<CreateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    payload.title = clean_text(&payload.title);
    for question in &mut payload.questions {
        question.prompt = clean_text(&question.prompt);
        for option in &mut question.options {
            option.text = clean_text(&option.text);
        }
    }

    let id = store.create_exam(&payload).await?;

    tracing::info!("Exam {} created with {} questions", id, payload.questions.len());

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Updates exam metadata. Fields are optional; question edits go
/// through re-authoring the exam.
pub async fn update_exam(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
    Json(mut payload): Json<UpdateExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if let Some(title) = &payload.title {
        payload.title = Some(clean_text(title));
    }

    store.update_exam(id, &payload).await?;

    Ok(StatusCode::OK)
}

/// Deletes an exam and its questions. Attempts already submitted
/// against it are kept for the record.
pub async fn delete_exam(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    store.delete_exam(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists submitted attempts for one exam, newest first.
pub async fn list_results(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    store
        .fetch_exam(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))?;

    let summaries = store.list_results(id).await?;
    Ok(Json(summaries))
}
