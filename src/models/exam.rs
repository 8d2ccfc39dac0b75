// src/models/exam.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use url::Url;
use validator::Validate;

/// Closed set of option labels. A question carries between two and four
/// options, so C and D may be absent on a given question.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl std::fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        };
        write!(f, "{}", letter)
    }
}

/// One labeled option on a question. Text is plain UTF-8 and may be
/// Arabic or English; the backend treats both the same.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamOption {
    pub label: OptionLabel,
    pub text: String,
}

/// A single multiple-choice question. `correct` holds the full set of
/// labels that must be selected for credit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub prompt: String,
    pub image_url: Option<String>,
    pub options: Vec<ExamOption>,
    pub correct: Vec<OptionLabel>,
    pub points: i64,
}

impl Question {
    pub fn correct_set(&self) -> BTreeSet<OptionLabel> {
        self.correct.iter().copied().collect()
    }
}

/// An exam definition as loaded from the content store. Questions are
/// ordered by their stored position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub title: String,

    /// Overall time limit for the whole exam.
    pub duration_minutes: i64,

    /// Optional pacing cap per question. When set, the taking flow runs
    /// a second countdown that auto-advances on expiry.
    pub per_question_seconds: Option<i64>,

    pub questions: Vec<Question>,
}

impl Exam {
    pub fn total_seconds(&self) -> u64 {
        self.duration_minutes.max(0) as u64 * 60
    }

    pub fn has_question(&self, question_id: i64) -> bool {
        self.questions.iter().any(|q| q.id == question_id)
    }
}

/// Row for the exam catalogue listing.
#[derive(Debug, Serialize, FromRow)]
pub struct ExamSummary {
    pub id: i64,
    pub title: String,
    pub duration_minutes: i64,
    pub question_count: i64,
}

/// DTO for sending a question to an exam taker (excludes the correct set).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub prompt: String,
    pub image_url: Option<String>,
    pub options: Vec<ExamOption>,
}

/// DTO for the exam as seen by a taker: metadata plus public questions.
#[derive(Debug, Serialize)]
pub struct ExamView {
    pub id: i64,
    pub title: String,
    pub duration_minutes: i64,
    pub per_question_seconds: Option<i64>,
    pub questions: Vec<PublicQuestion>,
}

impl From<&Exam> for ExamView {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id,
            title: exam.title.clone(),
            duration_minutes: exam.duration_minutes,
            per_question_seconds: exam.per_question_seconds,
            questions: exam
                .questions
                .iter()
                .map(|q| PublicQuestion {
                    id: q.id,
                    prompt: q.prompt.clone(),
                    image_url: q.image_url.clone(),
                    options: q.options.clone(),
                })
                .collect(),
        }
    }
}

/// DTO for authoring a new exam with its questions.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: i64,
    #[validate(range(min = 5, max = 3600))]
    pub per_question_seconds: Option<i64>,
    #[validate(length(min = 1, max = 200), nested)]
    pub questions: Vec<CreateQuestionRequest>,
}

/// DTO for one authored question.
///
/// The schema-level check enforces what the grading engine assumes:
/// a non-empty correct set drawn only from labels present on the question.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_answer_key))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 2000))]
    pub prompt: String,
    #[validate(custom(function = validate_image_url))]
    pub image_url: Option<String>,
    #[validate(custom(function = validate_options))]
    pub options: Vec<ExamOption>,
    #[validate(length(min = 1, max = 4))]
    pub correct: Vec<OptionLabel>,
    #[validate(range(min = 1, max = 100))]
    pub points: i64,
}

/// DTO for updating exam metadata. Fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateExamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(range(min = 1, max = 600))]
    pub duration_minutes: Option<i64>,
    #[validate(range(min = 5, max = 3600))]
    pub per_question_seconds: Option<i64>,
}

/// Validates that a string is a correctly formatted URL.
fn validate_image_url(url: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}

fn validate_options(options: &[ExamOption]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 || options.len() > 4 {
        return Err(validator::ValidationError::new("options_count_out_of_range"));
    }
    let mut seen = BTreeSet::new();
    for opt in options {
        if !seen.insert(opt.label) {
            return Err(validator::ValidationError::new("duplicate_option_label"));
        }
        if opt.text.is_empty() || opt.text.len() > 500 {
            return Err(validator::ValidationError::new("option_text_length"));
        }
    }
    Ok(())
}

fn validate_answer_key(question: &CreateQuestionRequest) -> Result<(), validator::ValidationError> {
    let labels: BTreeSet<OptionLabel> = question.options.iter().map(|o| o.label).collect();
    let mut seen = BTreeSet::new();
    for label in &question.correct {
        if !seen.insert(*label) {
            return Err(validator::ValidationError::new("duplicate_correct_label"));
        }
        if !labels.contains(label) {
            return Err(validator::ValidationError::new(
                "correct_label_not_among_options",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateExamRequest {
        CreateExamRequest {
            title: "Exam".to_string(),
            duration_minutes: 20,
            per_question_seconds: None,
            questions: vec![CreateQuestionRequest {
                prompt: "Pick A".to_string(),
                image_url: None,
                options: vec![
                    ExamOption { label: OptionLabel::A, text: "first".to_string() },
                    ExamOption { label: OptionLabel::B, text: "second".to_string() },
                ],
                correct: vec![OptionLabel::A],
                points: 1,
            }],
        }
    }

    #[test]
    fn valid_request_passes_validation() {
        assert!(valid_request().validate().is_ok());
    }

    // The derived length check reports the offending field value in its
    // error params, so it must be able to serialize the question list.
    #[test]
    fn empty_question_list_fails_the_length_check() {
        let mut request = valid_request();
        request.questions.clear();

        let errors = request.validate().unwrap_err();
        assert!(errors.to_string().contains("questions"));
    }

    #[test]
    fn correct_label_must_be_among_the_options() {
        let mut request = valid_request();
        request.questions[0].correct = vec![OptionLabel::D];

        assert!(request.validate().is_err());
    }
}
