// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, prelude::FromRow};

use crate::error::AppError;
use crate::models::attempt::{AttemptSummary, FinishedAttempt};
use crate::models::exam::{
    CreateExamRequest, Exam, ExamOption, ExamSummary, OptionLabel, Question, UpdateExamRequest,
};
use crate::store::ContentStore;

/// Postgres-backed content store. Queries are bound at runtime so the
/// crate builds without a live database.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ExamRow {
    id: i64,
    title: String,
    duration_minutes: i64,
    per_question_seconds: Option<i64>,
}

#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    prompt: String,
    image_url: Option<String>,
    options: Json<Vec<ExamOption>>,
    correct: Json<Vec<OptionLabel>>,
    points: i64,
}

#[async_trait]
impl ContentStore for PgStore {
    async fn list_exams(&self) -> Result<Vec<ExamSummary>, AppError> {
        let summaries = sqlx::query_as::<_, ExamSummary>(
            r#"
            SELECT e.id, e.title, e.duration_minutes, COUNT(q.id) AS question_count
            FROM exams e
            LEFT JOIN questions q ON q.exam_id = e.id
            GROUP BY e.id, e.title, e.duration_minutes
            ORDER BY e.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list exams: {:?}", e);
            AppError::from(e)
        })?;

        Ok(summaries)
    }

    async fn fetch_exam(&self, id: i64) -> Result<Option<Exam>, AppError> {
        let row = sqlx::query_as::<_, ExamRow>(
            "SELECT id, title, duration_minutes, per_question_seconds FROM exams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let question_rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, prompt, image_url, options, correct, points
            FROM questions
            WHERE exam_id = $1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let questions = question_rows
            .into_iter()
            .map(|q| Question {
                id: q.id,
                prompt: q.prompt,
                image_url: q.image_url,
                options: q.options.0,
                correct: q.correct.0,
                points: q.points,
            })
            .collect();

        Ok(Some(Exam {
            id: row.id,
            title: row.title,
            duration_minutes: row.duration_minutes,
            per_question_seconds: row.per_question_seconds,
            questions,
        }))
    }

    async fn create_exam(&self, req: &CreateExamRequest) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let exam_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO exams (title, duration_minutes, per_question_seconds)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&req.title)
        .bind(req.duration_minutes)
        .bind(req.per_question_seconds)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create exam: {:?}", e);
            AppError::from(e)
        })?;

        for (position, question) in req.questions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO questions
                (exam_id, position, prompt, image_url, options, correct, points)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(exam_id)
            .bind(position as i64)
            .bind(&question.prompt)
            .bind(&question.image_url)
            .bind(Json(&question.options))
            .bind(Json(&question.correct))
            .bind(question.points)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(exam_id)
    }

    async fn update_exam(&self, id: i64, req: &UpdateExamRequest) -> Result<(), AppError> {
        if req.title.is_none()
            && req.duration_minutes.is_none()
            && req.per_question_seconds.is_none()
        {
            return Ok(());
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE exams SET ");
        let mut separated = builder.separated(", ");

        if let Some(title) = &req.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }

        if let Some(duration) = req.duration_minutes {
            separated.push("duration_minutes = ");
            separated.push_bind_unseparated(duration);
        }

        if let Some(limit) = req.per_question_seconds {
            separated.push("per_question_seconds = ");
            separated.push_bind_unseparated(limit);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to update exam: {:?}", e);
            AppError::from(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Exam not found".to_string()));
        }

        Ok(())
    }

    async fn delete_exam(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete exam: {:?}", e);
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Exam not found".to_string()));
        }

        Ok(())
    }

    async fn save_result(&self, record: &FinishedAttempt) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO attempts
            (id, exam_id, student_id, total_score, max_score, percentage,
             time_taken_seconds, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(record.attempt_id.to_string())
        .bind(record.exam_id)
        .bind(record.student_id)
        .bind(record.result.total_score)
        .bind(record.result.max_score)
        .bind(record.result.percentage)
        .bind(record.result.time_taken_seconds)
        .bind(record.result.submitted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save attempt record: {:?}", e);
            AppError::from(e)
        })?;

        // Already persisted by an earlier call; the answer rows went in
        // with it.
        if inserted.rows_affected() == 0 {
            return Ok(());
        }

        for answer in &record.result.per_question {
            sqlx::query(
                r#"
                INSERT INTO attempt_answers
                (attempt_id, question_id, selected, is_correct, points_earned)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(record.attempt_id.to_string())
            .bind(answer.question_id)
            .bind(Json(&answer.selected))
            .bind(answer.correct)
            .bind(answer.points_earned)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_results(&self, exam_id: i64) -> Result<Vec<AttemptSummary>, AppError> {
        let summaries = sqlx::query_as::<_, AttemptSummary>(
            r#"
            SELECT id AS attempt_id, student_id, total_score, max_score,
                   percentage, time_taken_seconds, submitted_at
            FROM attempts
            WHERE exam_id = $1
            ORDER BY submitted_at DESC
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list attempt results: {:?}", e);
            AppError::from(e)
        })?;

        Ok(summaries)
    }
}
