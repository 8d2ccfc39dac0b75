// src/store/mod.rs

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::attempt::{AttemptSummary, FinishedAttempt};
use crate::models::exam::{CreateExamRequest, Exam, ExamSummary, UpdateExamRequest};

pub type SharedStore = Arc<dyn ContentStore>;

/// Narrow contract against the external content system: exam
/// definitions in, finished attempts out. Postgres in production, an
/// in-memory map for local development and tests.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_exams(&self) -> Result<Vec<ExamSummary>, AppError>;

    /// Full exam definition including correct answers; callers decide
    /// what to expose (see `ExamView`).
    async fn fetch_exam(&self, id: i64) -> Result<Option<Exam>, AppError>;

    /// Persists an authored exam (already validated and sanitized) and
    /// returns its id.
    async fn create_exam(&self, req: &CreateExamRequest) -> Result<i64, AppError>;

    async fn update_exam(&self, id: i64, req: &UpdateExamRequest) -> Result<(), AppError>;

    async fn delete_exam(&self, id: i64) -> Result<(), AppError>;

    /// Writes the attempt record plus one answer row per question.
    /// Idempotent on the attempt id so a failed write can be retried.
    async fn save_result(&self, record: &FinishedAttempt) -> Result<(), AppError>;

    /// Submitted attempts for one exam, newest first.
    async fn list_results(&self, exam_id: i64) -> Result<Vec<AttemptSummary>, AppError>;
}
