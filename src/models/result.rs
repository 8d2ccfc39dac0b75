// src/models/result.rs

use serde::{Deserialize, Serialize};

use crate::models::exam::OptionLabel;

/// Outcome of grading one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: i64,

    /// The labels the student had selected at submission, in label order.
    pub selected: Vec<OptionLabel>,

    /// True only when the selected set equals the correct set exactly.
    pub correct: bool,

    pub points_earned: i64,
}

/// Write-once grading outcome for a whole attempt. Persisted verbatim
/// as one attempt row plus one answer row per question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub per_question: Vec<QuestionResult>,
    pub total_score: i64,
    pub max_score: i64,

    /// Rounded percentage in [0, 100]. 0 when `max_score` is 0.
    pub percentage: i64,

    pub time_taken_seconds: i64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
