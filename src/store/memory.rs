// src/store/memory.rs

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::attempt::{AttemptSummary, FinishedAttempt};
use crate::models::exam::{
    CreateExamRequest, Exam, ExamOption, ExamSummary, OptionLabel, Question, UpdateExamRequest,
};
use crate::store::ContentStore;

/// In-memory content store for local development and tests. Content
/// does not survive a restart; finished attempts are kept only so the
/// review endpoints have something to show.
pub struct MemoryStore {
    exams: RwLock<BTreeMap<i64, Exam>>,
    results: RwLock<Vec<FinishedAttempt>>,
    next_exam_id: AtomicI64,
    next_question_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            exams: RwLock::new(BTreeMap::new()),
            results: RwLock::new(Vec::new()),
            next_exam_id: AtomicI64::new(1),
            next_question_id: AtomicI64::new(1),
        }
    }

    /// Dev-mode store preloaded with one short bilingual exam so the
    /// attempt flow can be exercised without any authoring step.
    pub fn with_sample_exam() -> Self {
        let store = Self::new();
        let exam_id = store.next_exam_id.fetch_add(1, Ordering::Relaxed);
        let exam = Exam {
            id: exam_id,
            title: "Unit 1 Review — مراجعة الوحدة الأولى".to_string(),
            duration_minutes: 10,
            per_question_seconds: Some(60),
            questions: vec![
                Question {
                    id: store.next_question_id.fetch_add(1, Ordering::Relaxed),
                    prompt: "What is 7 × 8?".to_string(),
                    image_url: None,
                    options: vec![
                        ExamOption { label: OptionLabel::A, text: "54".to_string() },
                        ExamOption { label: OptionLabel::B, text: "56".to_string() },
                        ExamOption { label: OptionLabel::C, text: "64".to_string() },
                    ],
                    correct: vec![OptionLabel::B],
                    points: 1,
                },
                Question {
                    id: store.next_question_id.fetch_add(1, Ordering::Relaxed),
                    prompt: "اختر الأعداد الزوجية — pick the even numbers".to_string(),
                    image_url: None,
                    options: vec![
                        ExamOption { label: OptionLabel::A, text: "12".to_string() },
                        ExamOption { label: OptionLabel::B, text: "7".to_string() },
                        ExamOption { label: OptionLabel::C, text: "20".to_string() },
                        ExamOption { label: OptionLabel::D, text: "9".to_string() },
                    ],
                    correct: vec![OptionLabel::A, OptionLabel::C],
                    points: 2,
                },
            ],
        };
        store.exams_write().insert(exam_id, exam);
        store
    }

    fn exams_read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<i64, Exam>> {
        self.exams.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn exams_write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<i64, Exam>> {
        self.exams.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn list_exams(&self) -> Result<Vec<ExamSummary>, AppError> {
        let exams = self.exams_read();
        Ok(exams
            .values()
            .map(|exam| ExamSummary {
                id: exam.id,
                title: exam.title.clone(),
                duration_minutes: exam.duration_minutes,
                question_count: exam.questions.len() as i64,
            })
            .collect())
    }

    async fn fetch_exam(&self, id: i64) -> Result<Option<Exam>, AppError> {
        Ok(self.exams_read().get(&id).cloned())
    }

    async fn create_exam(&self, req: &CreateExamRequest) -> Result<i64, AppError> {
        let exam_id = self.next_exam_id.fetch_add(1, Ordering::Relaxed);
        let questions = req
            .questions
            .iter()
            .map(|q| Question {
                id: self.next_question_id.fetch_add(1, Ordering::Relaxed),
                prompt: q.prompt.clone(),
                image_url: q.image_url.clone(),
                options: q.options.clone(),
                correct: q.correct.clone(),
                points: q.points,
            })
            .collect();

        self.exams_write().insert(
            exam_id,
            Exam {
                id: exam_id,
                title: req.title.clone(),
                duration_minutes: req.duration_minutes,
                per_question_seconds: req.per_question_seconds,
                questions,
            },
        );

        Ok(exam_id)
    }

    async fn update_exam(&self, id: i64, req: &UpdateExamRequest) -> Result<(), AppError> {
        let mut exams = self.exams_write();
        let exam = exams
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Exam not found".to_string()))?;

        if let Some(title) = &req.title {
            exam.title = title.clone();
        }
        if let Some(duration) = req.duration_minutes {
            exam.duration_minutes = duration;
        }
        if let Some(limit) = req.per_question_seconds {
            exam.per_question_seconds = Some(limit);
        }

        Ok(())
    }

    async fn delete_exam(&self, id: i64) -> Result<(), AppError> {
        if self.exams_write().remove(&id).is_none() {
            return Err(AppError::NotFound("Exam not found".to_string()));
        }
        Ok(())
    }

    async fn save_result(&self, record: &FinishedAttempt) -> Result<(), AppError> {
        let mut results = self.results.write().unwrap_or_else(PoisonError::into_inner);
        if results
            .iter()
            .any(|existing| existing.attempt_id == record.attempt_id)
        {
            return Ok(());
        }
        results.push(record.clone());
        Ok(())
    }

    async fn list_results(&self, exam_id: i64) -> Result<Vec<AttemptSummary>, AppError> {
        let results = self.results.read().unwrap_or_else(PoisonError::into_inner);
        let mut summaries: Vec<AttemptSummary> = results
            .iter()
            .filter(|record| record.exam_id == exam_id)
            .map(|record| AttemptSummary {
                attempt_id: record.attempt_id.to_string(),
                student_id: record.student_id,
                total_score: record.result.total_score,
                max_score: record.result.max_score,
                percentage: record.result.percentage,
                time_taken_seconds: record.result.time_taken_seconds,
                submitted_at: record.result.submitted_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(summaries)
    }
}
