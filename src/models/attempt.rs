// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::models::exam::{ExamView, OptionLabel};
use crate::models::result::ExamResult;

/// DTO for starting an attempt. The caller is assumed to have already
/// authenticated the student; only an opaque reference is passed here.
#[derive(Debug, Deserialize)]
pub struct StartAttemptRequest {
    pub student_id: i64,
}

#[derive(Debug, Serialize)]
pub struct StartAttemptResponse {
    pub attempt_id: Uuid,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub exam: ExamView,
}

/// DTO for toggling one option on a question's answer set.
#[derive(Debug, Deserialize)]
pub struct SelectOptionRequest {
    pub question_id: i64,
    pub option: OptionLabel,

    /// True adds the label, false removes it.
    pub selected: bool,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct FlagRequest {
    pub question_id: i64,
}

/// Live view of an in-progress (or just-submitted) attempt.
#[derive(Debug, Serialize)]
pub struct AttemptStatusResponse {
    pub attempt_id: Uuid,
    pub exam_id: i64,
    pub current_index: usize,
    pub answered_count: usize,
    pub flagged: Vec<i64>,
    pub overall_remaining_seconds: u64,
    pub question_remaining_seconds: Option<u64>,
    pub submitted: bool,
}

/// The finalized attempt handed to the content store for persistence.
#[derive(Debug, Clone, Serialize)]
pub struct FinishedAttempt {
    pub attempt_id: Uuid,
    pub exam_id: i64,
    pub student_id: i64,
    pub result: ExamResult,
}

/// Row for the admin review listing of submitted attempts.
#[derive(Debug, Serialize, FromRow)]
pub struct AttemptSummary {
    pub attempt_id: String,
    pub student_id: i64,
    pub total_score: i64,
    pub max_score: i64,
    pub percentage: i64,
    pub time_taken_seconds: i64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
