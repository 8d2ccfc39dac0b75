// src/session/mod.rs

pub mod sweeper;
pub mod timer;

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;
use crate::grading::{self, AnswerMap};
use crate::models::attempt::{AttemptStatusResponse, FinishedAttempt};
use crate::models::exam::{Exam, OptionLabel};
use crate::models::result::ExamResult;

use self::timer::{TimerController, TimerEvent};

/// Lifecycle of one attempt. A submitted attempt keeps its result so
/// that repeated finalization returns the identical record.
#[derive(Debug, Clone)]
enum AttemptPhase {
    InProgress,
    Submitted(ExamResult),
}

/// Outcome of one countdown step over a session.
#[derive(Debug, Clone)]
pub enum TickOutcome {
    Running,

    /// The overall timer expired; the attempt was finalized with the
    /// answers present at that instant and must now be persisted.
    AutoSubmitted(FinishedAttempt),
}

/// Single source of truth for one in-progress attempt: answer sets,
/// flags, current question pointer, and both countdowns. Constructed
/// fresh per attempt and owned by the registry until process exit; an
/// attempt abandoned before submission is simply dropped.
#[derive(Debug, Clone)]
pub struct AttemptSession {
    id: Uuid,
    student_id: i64,
    exam: Exam,
    answers: AnswerMap,
    flagged: BTreeSet<i64>,
    current: usize,
    timer: TimerController,
    started_at: DateTime<Utc>,
    phase: AttemptPhase,
}

impl AttemptSession {
    pub fn new(exam: Exam, student_id: i64) -> Self {
        let timer = TimerController::new(
            exam.total_seconds(),
            exam.per_question_seconds.map(|s| s.max(0) as u64),
        );
        Self {
            id: Uuid::new_v4(),
            student_id,
            exam,
            answers: AnswerMap::new(),
            flagged: BTreeSet::new(),
            current: 0,
            timer,
            started_at: Utc::now(),
            phase: AttemptPhase::InProgress,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, AttemptPhase::Submitted(_))
    }

    pub fn timer(&self) -> &TimerController {
        &self.timer
    }

    /// Number of questions with a non-empty answer set.
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|set| !set.is_empty()).count()
    }

    /// Adds or removes `option` from the question's answer set. Answers
    /// commit immediately; unselecting the only choice leaves the
    /// question unanswered again.
    pub fn select_option(
        &mut self,
        question_id: i64,
        option: OptionLabel,
        selected: bool,
    ) -> Result<(), AppError> {
        self.ensure_in_progress()?;
        if !self.exam.has_question(question_id) {
            return Err(AppError::BadRequest(format!(
                "Question {} is not part of this exam",
                question_id
            )));
        }
        let set = self.answers.entry(question_id).or_default();
        if selected {
            set.insert(option);
        } else {
            set.remove(&option);
        }
        Ok(())
    }

    /// Free navigation to any valid index, forward or backward. Resets
    /// the per-question countdown when one is configured.
    pub fn go_to(&mut self, index: usize) -> Result<(), AppError> {
        self.ensure_in_progress()?;
        if index >= self.exam.questions.len() {
            return Err(AppError::BadRequest(format!(
                "Question index {} out of range",
                index
            )));
        }
        self.current = index;
        self.timer.reset_question_timer();
        Ok(())
    }

    /// Marks or unmarks a question for review. Purely advisory.
    pub fn toggle_flag(&mut self, question_id: i64) -> Result<(), AppError> {
        self.ensure_in_progress()?;
        if !self.exam.has_question(question_id) {
            return Err(AppError::BadRequest(format!(
                "Question {} is not part of this exam",
                question_id
            )));
        }
        if !self.flagged.remove(&question_id) {
            self.flagged.insert(question_id);
        }
        Ok(())
    }

    pub fn status(&self) -> AttemptStatusResponse {
        AttemptStatusResponse {
            attempt_id: self.id,
            exam_id: self.exam.id,
            current_index: self.current,
            answered_count: self.answered_count(),
            flagged: self.flagged.iter().copied().collect(),
            overall_remaining_seconds: self.timer.overall_remaining(),
            question_remaining_seconds: self.timer.question_remaining(),
            submitted: self.is_submitted(),
        }
    }

    /// One countdown step. The decrement, the expiry check, and the side
    /// effect (advance or finalize) happen as a single step; callers hold
    /// the registry lock for the duration. A tick on a submitted session
    /// is a no-op, so a stray tick can never re-trigger finalization.
    pub fn tick(&mut self) -> TickOutcome {
        if self.is_submitted() {
            return TickOutcome::Running;
        }
        let on_last = self.current + 1 >= self.exam.questions.len();
        match self.timer.tick(on_last) {
            TimerEvent::OverallExpired => TickOutcome::AutoSubmitted(self.finalize_record()),
            TimerEvent::AdvanceQuestion => {
                self.current += 1;
                TickOutcome::Running
            }
            TimerEvent::Running => TickOutcome::Running,
        }
    }

    /// Grades and seals the attempt. Idempotent: the first call computes
    /// the result and stops the timers, later calls return the stored
    /// result unchanged.
    pub fn finalize(&mut self) -> ExamResult {
        if let AttemptPhase::Submitted(result) = &self.phase {
            return result.clone();
        }
        let result = grading::grade(&self.exam, &self.answers, self.timer.elapsed_seconds());
        self.timer.stop();
        self.phase = AttemptPhase::Submitted(result.clone());
        result
    }

    /// Finalizes (if still in progress) and packages the persistable record.
    pub fn finalize_record(&mut self) -> FinishedAttempt {
        let result = self.finalize();
        FinishedAttempt {
            attempt_id: self.id,
            exam_id: self.exam.id,
            student_id: self.student_id,
            result,
        }
    }

    fn ensure_in_progress(&self) -> Result<(), AppError> {
        if self.is_submitted() {
            return Err(AppError::Conflict(
                "Attempt has already been submitted".to_string(),
            ));
        }
        Ok(())
    }
}

/// In-process registry of attempt sessions. The single lock serializes
/// timer ticks and user actions, so no tick can observe a half-applied
/// update.
#[derive(Clone, Default)]
pub struct AttemptRegistry {
    inner: Arc<Mutex<HashMap<Uuid, AttemptSession>>>,
}

impl AttemptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: AttemptSession) {
        self.lock().insert(session.id(), session);
    }

    /// Runs `f` on the session under the lock. `None` when the attempt
    /// is unknown (never started, or lost with a restart).
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut AttemptSession) -> R,
    ) -> Option<R> {
        self.lock().get_mut(&id).map(f)
    }

    /// Ticks every in-progress session once and returns the attempts
    /// that auto-submitted on this step. Persistence happens outside
    /// the lock.
    pub fn tick_all(&self) -> Vec<FinishedAttempt> {
        let mut finished = Vec::new();
        for session in self.lock().values_mut() {
            if let TickOutcome::AutoSubmitted(record) = session.tick() {
                finished.push(record);
            }
        }
        finished
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, AttemptSession>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
