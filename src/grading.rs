// src/grading.rs

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use crate::models::exam::{Exam, OptionLabel};
use crate::models::result::{ExamResult, QuestionResult};

/// Per-question answer sets keyed by question id. A missing entry and an
/// empty set both mean "unanswered".
pub type AnswerMap = BTreeMap<i64, BTreeSet<OptionLabel>>;

/// Grades a finished attempt.
///
/// Scoring is all-or-nothing per question: the selected set must equal
/// the correct set exactly (same size, same members). Partial overlap
/// earns zero. `percentage` is rounded and guarded against an exam with
/// no questions, where it is 0 rather than NaN.
pub fn grade(exam: &Exam, answers: &AnswerMap, time_taken_seconds: u64) -> ExamResult {
    let mut per_question = Vec::with_capacity(exam.questions.len());
    let mut total_score: i64 = 0;
    let mut max_score: i64 = 0;

    for question in &exam.questions {
        let selected = answers.get(&question.id).cloned().unwrap_or_default();
        let correct = selected == question.correct_set();
        let points_earned = if correct { question.points } else { 0 };

        total_score += points_earned;
        max_score += question.points;

        per_question.push(QuestionResult {
            question_id: question.id,
            selected: selected.into_iter().collect(),
            correct,
            points_earned,
        });
    }

    let percentage = if max_score == 0 {
        0
    } else {
        ((total_score as f64 / max_score as f64) * 100.0).round() as i64
    };

    ExamResult {
        per_question,
        total_score,
        max_score,
        percentage,
        time_taken_seconds: time_taken_seconds as i64,
        submitted_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exam::{ExamOption, Question};

    fn question(id: i64, correct: &[OptionLabel], points: i64) -> Question {
        Question {
            id,
            prompt: format!("Question {}", id),
            image_url: None,
            options: vec![
                ExamOption { label: OptionLabel::A, text: "a".to_string() },
                ExamOption { label: OptionLabel::B, text: "b".to_string() },
                ExamOption { label: OptionLabel::C, text: "c".to_string() },
            ],
            correct: correct.to_vec(),
            points,
        }
    }

    fn exam(questions: Vec<Question>) -> Exam {
        Exam {
            id: 1,
            title: "Test".to_string(),
            duration_minutes: 10,
            per_question_seconds: None,
            questions,
        }
    }

    #[test]
    fn exact_match_earns_full_points() {
        let exam = exam(vec![question(1, &[OptionLabel::A], 3)]);
        let mut answers = AnswerMap::new();
        answers.insert(1, BTreeSet::from([OptionLabel::A]));

        let result = grade(&exam, &answers, 30);
        assert_eq!(result.total_score, 3);
        assert_eq!(result.percentage, 100);
        assert!(result.per_question[0].correct);
    }

    #[test]
    fn subset_earns_zero() {
        let exam = exam(vec![question(1, &[OptionLabel::B, OptionLabel::C], 2)]);
        let mut answers = AnswerMap::new();
        answers.insert(1, BTreeSet::from([OptionLabel::B]));

        let result = grade(&exam, &answers, 10);
        assert_eq!(result.total_score, 0);
        assert!(!result.per_question[0].correct);
    }

    #[test]
    fn empty_exam_is_zero_percent_not_nan() {
        let result = grade(&exam(vec![]), &AnswerMap::new(), 0);
        assert_eq!(result.max_score, 0);
        assert_eq!(result.percentage, 0);
    }
}
