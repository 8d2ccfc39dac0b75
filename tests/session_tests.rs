// tests/session_tests.rs

use examhall_backend::models::exam::{Exam, ExamOption, OptionLabel, Question};
use examhall_backend::session::{AttemptSession, TickOutcome};

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

fn exam(per_question_seconds: Option<i64>, question_count: usize) -> Exam {
    Exam {
        id: 7,
        title: "Session test exam".to_string(),
        duration_minutes: 1,
        per_question_seconds,
        questions: (1..=question_count as i64)
            .map(|id| question(id, &[OptionLabel::A], 1))
            .collect(),
    }
}

#[test]
fn select_then_unselect_leaves_question_unanswered() {
    let mut session = AttemptSession::new(exam(None, 2), 42);

    session.select_option(1, OptionLabel::A, true).unwrap();
    assert_eq!(session.answered_count(), 1);

    session.select_option(1, OptionLabel::A, false).unwrap();
    assert_eq!(session.answered_count(), 0);

    // Submitting now must grade question 1 from an empty set, not {A}.
    let result = session.finalize();
    assert!(result.per_question[0].selected.is_empty());
    assert!(!result.per_question[0].correct);
}

#[test]
fn multi_select_accumulates_labels() {
    let mut session = AttemptSession::new(exam(None, 1), 42);

    session.select_option(1, OptionLabel::A, true).unwrap();
    session.select_option(1, OptionLabel::C, true).unwrap();

    let result = session.finalize();
    assert_eq!(
        result.per_question[0].selected,
        vec![OptionLabel::A, OptionLabel::C]
    );
}

#[test]
fn navigation_is_free_in_both_directions() {
    let mut session = AttemptSession::new(exam(None, 3), 42);

    session.go_to(2).unwrap();
    assert_eq!(session.current_index(), 2);
    session.go_to(0).unwrap();
    assert_eq!(session.current_index(), 0);
    session.go_to(1).unwrap();
    assert_eq!(session.current_index(), 1);

    assert!(session.go_to(3).is_err());
}

#[test]
fn flags_are_advisory_and_toggle() {
    let mut session = AttemptSession::new(exam(None, 2), 42);

    session.toggle_flag(2).unwrap();
    assert_eq!(session.status().flagged, vec![2]);
    session.toggle_flag(2).unwrap();
    assert!(session.status().flagged.is_empty());

    // Flagging never affects grading.
    session.toggle_flag(1).unwrap();
    session.select_option(1, OptionLabel::A, true).unwrap();
    let result = session.finalize();
    assert!(result.per_question[0].correct);
}

#[test]
fn overall_expiry_auto_submits_with_current_answers() {
    // 1-minute exam, no answers given: expires on the 60th tick.
    let mut session = AttemptSession::new(exam(None, 2), 42);

    for _ in 0..59 {
        assert!(matches!(session.tick(), TickOutcome::Running));
    }
    match session.tick() {
        TickOutcome::AutoSubmitted(record) => {
            assert_eq!(record.result.total_score, 0);
            assert_eq!(record.result.max_score, 2);
            assert_eq!(record.result.percentage, 0);
            assert_eq!(record.result.time_taken_seconds, 60);
        }
        TickOutcome::Running => panic!("expected auto-submit on timer expiry"),
    }
    assert!(session.is_submitted());

    // A stray tick after finalization is a no-op.
    assert!(matches!(session.tick(), TickOutcome::Running));
}

#[test]
fn per_question_timer_advances_and_stops_on_last_question() {
    // 5-second pacing, 3 questions, student never interacts.
    let mut session = AttemptSession::new(exam(Some(5), 3), 42);

    for _ in 0..5 {
        session.tick();
    }
    assert_eq!(session.current_index(), 1);

    for _ in 0..5 {
        session.tick();
    }
    assert_eq!(session.current_index(), 2);

    for _ in 0..5 {
        session.tick();
    }
    // Last question: no wraparound, no auto-submit from this timer.
    assert_eq!(session.current_index(), 2);
    assert!(!session.is_submitted());
    assert_eq!(session.status().question_remaining_seconds, None);
}

#[test]
fn navigation_resets_per_question_timer_only() {
    let mut session = AttemptSession::new(exam(Some(10), 3), 42);

    for _ in 0..4 {
        session.tick();
    }
    assert_eq!(session.status().question_remaining_seconds, Some(6));
    let overall_before = session.status().overall_remaining_seconds;

    session.go_to(2).unwrap();

    let status = session.status();
    assert_eq!(status.question_remaining_seconds, Some(10));
    // The overall countdown is monotonic and unaffected by navigation.
    assert_eq!(status.overall_remaining_seconds, overall_before);
}

#[test]
fn finalize_is_idempotent() {
    let mut session = AttemptSession::new(exam(None, 2), 42);
    session.select_option(1, OptionLabel::A, true).unwrap();

    let first = session.finalize();
    let second = session.finalize();
    assert_eq!(first, second);

    let record = session.finalize_record();
    assert_eq!(record.result, first);
}

#[test]
fn mutations_after_submission_are_rejected() {
    let mut session = AttemptSession::new(exam(None, 2), 42);
    session.finalize();

    assert!(session.select_option(1, OptionLabel::A, true).is_err());
    assert!(session.go_to(1).is_err());
    assert!(session.toggle_flag(1).is_err());
}

#[test]
fn unknown_question_ids_are_rejected_at_the_boundary() {
    let mut session = AttemptSession::new(exam(None, 2), 42);

    assert!(session.select_option(99, OptionLabel::A, true).is_err());
    assert!(session.toggle_flag(99).is_err());
}
