// tests/grading_tests.rs

use std::collections::BTreeSet;

use examhall_backend::grading::{AnswerMap, grade};
use examhall_backend::models::exam::{Exam, ExamOption, OptionLabel, Question};

fn question(id: i64, correct: &[OptionLabel], points: i64) -> Question {
    let labels = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];
    Question {
        id,
        prompt: format!("Question {}", id),
        image_url: None,
        options: labels
            .iter()
            .map(|label| ExamOption {
                label: *label,
                text: format!("Option {}", label),
            })
            .collect(),
        correct: correct.to_vec(),
        points,
    }
}

fn exam(questions: Vec<Question>) -> Exam {
    Exam {
        id: 1,
        title: "Grading test exam".to_string(),
        duration_minutes: 30,
        per_question_seconds: None,
        questions,
    }
}

fn answers(entries: &[(i64, &[OptionLabel])]) -> AnswerMap {
    entries
        .iter()
        .map(|(id, labels)| (*id, labels.iter().copied().collect::<BTreeSet<_>>()))
        .collect()
}

#[test]
fn two_question_exam_scores_fifty_percent() {
    // Correct sets {A} and {B,C}; the student answers {A} and {B}.
    let exam = exam(vec![
        question(1, &[OptionLabel::A], 1),
        question(2, &[OptionLabel::B, OptionLabel::C], 1),
    ]);
    let answers = answers(&[
        (1, &[OptionLabel::A]),
        (2, &[OptionLabel::B]),
    ]);

    let result = grade(&exam, &answers, 120);

    assert!(result.per_question[0].correct);
    assert_eq!(result.per_question[0].points_earned, 1);
    // {B} != {B,C}: partial overlap earns nothing.
    assert!(!result.per_question[1].correct);
    assert_eq!(result.per_question[1].points_earned, 0);
    assert_eq!(result.total_score, 1);
    assert_eq!(result.max_score, 2);
    assert_eq!(result.percentage, 50);
    assert_eq!(result.time_taken_seconds, 120);
}

#[test]
fn superset_selection_earns_zero() {
    let exam = exam(vec![question(1, &[OptionLabel::A], 5)]);
    let answers = answers(&[(1, &[OptionLabel::A, OptionLabel::B])]);

    let result = grade(&exam, &answers, 10);

    assert!(!result.per_question[0].correct);
    assert_eq!(result.total_score, 0);
    assert_eq!(result.percentage, 0);
}

#[test]
fn unanswered_question_is_incorrect_with_empty_selection() {
    let exam = exam(vec![question(1, &[OptionLabel::C], 2)]);

    let result = grade(&exam, &AnswerMap::new(), 0);

    assert!(!result.per_question[0].correct);
    assert!(result.per_question[0].selected.is_empty());
    assert_eq!(result.total_score, 0);
    assert_eq!(result.max_score, 2);
}

#[test]
fn empty_exam_grades_to_zero_percent() {
    // Guarded edge case: no questions must not produce NaN.
    let result = grade(&exam(vec![]), &AnswerMap::new(), 5);

    assert_eq!(result.total_score, 0);
    assert_eq!(result.max_score, 0);
    assert_eq!(result.percentage, 0);
    assert!(result.per_question.is_empty());
}

#[test]
fn scores_are_additive_and_percentage_is_rounded() {
    let exam = exam(vec![
        question(1, &[OptionLabel::A], 1),
        question(2, &[OptionLabel::B], 1),
        question(3, &[OptionLabel::C], 1),
    ]);
    let answers = answers(&[
        (1, &[OptionLabel::A]),
        (2, &[OptionLabel::A]),
        (3, &[OptionLabel::A]),
    ]);

    let result = grade(&exam, &answers, 60);

    let sum: i64 = result.per_question.iter().map(|q| q.points_earned).sum();
    assert_eq!(result.total_score, sum);
    let max: i64 = exam.questions.iter().map(|q| q.points).sum();
    assert_eq!(result.max_score, max);
    // 1/3 rounds to 33.
    assert_eq!(result.percentage, 33);
    assert!(result.percentage >= 0 && result.percentage <= 100);
}

#[test]
fn weighted_questions_respect_point_values() {
    let exam = exam(vec![
        question(1, &[OptionLabel::A], 1),
        question(2, &[OptionLabel::B], 4),
    ]);
    let answers = answers(&[(2, &[OptionLabel::B])]);

    let result = grade(&exam, &answers, 15);

    assert_eq!(result.total_score, 4);
    assert_eq!(result.max_score, 5);
    assert_eq!(result.percentage, 80);
}

#[test]
fn answers_for_unknown_questions_are_ignored() {
    let exam = exam(vec![question(1, &[OptionLabel::A], 1)]);
    let answers = answers(&[
        (1, &[OptionLabel::A]),
        (99, &[OptionLabel::D]),
    ]);

    let result = grade(&exam, &answers, 5);

    assert_eq!(result.per_question.len(), 1);
    assert_eq!(result.total_score, 1);
    assert_eq!(result.percentage, 100);
}
