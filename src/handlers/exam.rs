// src/handlers/exam.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, models::exam::ExamView, store::SharedStore};

/// Lists the exam catalogue (id, title, duration, question count).
pub async fn list_exams(State(store): State<SharedStore>) -> Result<impl IntoResponse, AppError> {
    let summaries = store.list_exams().await?;
    Ok(Json(summaries))
}

/// Returns one exam as seen by a taker. Correct answer sets are
/// stripped by the `ExamView` DTO.
pub async fn get_exam(
    State(store): State<SharedStore>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let exam = store
        .fetch_exam(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))?;

    Ok(Json(ExamView::from(&exam)))
}
