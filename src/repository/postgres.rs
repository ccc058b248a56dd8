// src/repository/postgres.rs

//! Postgres-backed repositories.
//!
//! Statistics updates are single `UPDATE` statements that read and write the
//! counters in one step, so concurrent submissions never lose an increment.
//! Result inserts compute the next attempt number and enforce the attempt
//! limit inside the same statement; the unique key on
//! `(user_id, exam_id, attempt_no)` settles any remaining race.

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};

use crate::{
    error::AppError,
    models::{
        exam::{Exam, ExamStats},
        question::{Question, QuestionOutcome},
        result::{ExamResult, LeaderboardEntry, NewResult},
    },
};

use super::{ExamRepository, Insertion, QuestionRepository, ResultRepository};

const RESULT_COLUMNS: &str = "id, user_id, exam_id, attempt_no, score, total_questions, \
     correct_answers, wrong_answers, unattempted, total_marks, obtained_marks, \
     time_taken, is_passed, answers, submitted_at";

/// Rounds an insert is retried when it loses an attempt-number race.
const INSERT_RACE_RETRIES: usize = 3;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_results(&self, user_id: i64, exam_id: i64) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM results WHERE user_id = $1 AND exam_id = $2")
                .bind(user_id)
                .bind(exam_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[async_trait]
impl ExamRepository for PgStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Exam>, AppError> {
        let exam = sqlx::query_as::<_, Exam>(
            r#"
            SELECT
                id, title, description, is_active, sections,
                negative_marking_enabled, negative_marking_default,
                passing_marks, duration_minutes,
                total_attempts, average_score, pass_rate,
                created_at
            FROM exams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch exam {}: {:?}", id, e);
            AppError::from(e)
        })?;

        Ok(exam)
    }

    async fn record_attempt(
        &self,
        id: i64,
        score: i64,
        passed: bool,
    ) -> Result<ExamStats, AppError> {
        let pass_value = if passed { 100.0 } else { 0.0 };

        sqlx::query_as::<_, ExamStats>(
            r#"
            UPDATE exams SET
                total_attempts = total_attempts + 1,
                average_score = (average_score * total_attempts + $2) / (total_attempts + 1),
                pass_rate = (pass_rate * total_attempts + $3) / (total_attempts + 1)
            WHERE id = $1
            RETURNING total_attempts, average_score, pass_rate
            "#,
        )
        .bind(id)
        .bind(score as f64)
        .bind(pass_value)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))
    }
}

#[async_trait]
impl QuestionRepository for PgStore {
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let questions = sqlx::query_as::<_, Question>(
            r#"
            SELECT
                id, type, content, options, answer, analysis,
                marks, negative_marks, difficulty, subject, topic, is_active,
                total_attempts, correct_attempts, accuracy_rate,
                created_at
            FROM questions
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch questions: {:?}", e);
            AppError::from(e)
        })?;

        Ok(questions)
    }

    async fn record_attempts(&self, outcomes: &[QuestionOutcome]) -> Result<(), AppError> {
        if outcomes.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = outcomes.iter().map(|o| o.question_id).collect();
        let correct: Vec<bool> = outcomes.iter().map(|o| o.is_correct).collect();

        sqlx::query(
            r#"
            UPDATE questions AS q SET
                total_attempts = q.total_attempts + 1,
                correct_attempts = q.correct_attempts + CASE WHEN o.is_correct THEN 1 ELSE 0 END,
                accuracy_rate =
                    (q.correct_attempts + CASE WHEN o.is_correct THEN 1 ELSE 0 END)::DOUBLE PRECISION
                    * 100 / (q.total_attempts + 1)
            FROM UNNEST($1::BIGINT[], $2::BOOLEAN[]) AS o(question_id, is_correct)
            WHERE q.id = o.question_id
            "#,
        )
        .bind(ids)
        .bind(correct)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ResultRepository for PgStore {
    async fn insert_within_limit(
        &self,
        result: NewResult,
        max_attempts: u32,
    ) -> Result<Insertion, AppError> {
        let sql = format!(
            r#"
            INSERT INTO results (
                user_id, exam_id, attempt_no, score, total_questions,
                correct_answers, wrong_answers, unattempted, total_marks,
                obtained_marks, time_taken, is_passed, answers
            )
            SELECT $1, $2, COALESCE(MAX(attempt_no), 0) + 1, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12
            FROM results
            WHERE user_id = $1 AND exam_id = $2
            HAVING COUNT(*) < $13
            ON CONFLICT (user_id, exam_id, attempt_no) DO NOTHING
            RETURNING {RESULT_COLUMNS}
            "#
        );

        for _ in 0..INSERT_RACE_RETRIES {
            let inserted = sqlx::query_as::<_, ExamResult>(&sql)
                .bind(result.user_id)
                .bind(result.exam_id)
                .bind(result.score)
                .bind(result.total_questions)
                .bind(result.correct_answers)
                .bind(result.wrong_answers)
                .bind(result.unattempted)
                .bind(result.total_marks)
                .bind(result.obtained_marks)
                .bind(result.time_taken)
                .bind(result.is_passed)
                .bind(Json(&result.answers))
                .bind(i64::from(max_attempts))
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to insert result: {:?}", e);
                    AppError::from(e)
                })?;

            if let Some(stored) = inserted {
                return Ok(Insertion::Created(stored));
            }

            // Nothing inserted: either the limit is reached or a concurrent
            // insert took this attempt number.
            if self.count_results(result.user_id, result.exam_id).await? >= i64::from(max_attempts)
            {
                if let Some(first) = self.find_first(result.user_id, result.exam_id).await? {
                    return Ok(Insertion::Existing(first));
                }
            }
        }

        Err(AppError::Conflict(format!(
            "Could not record result for user {} on exam {}",
            result.user_id, result.exam_id
        )))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ExamResult>, AppError> {
        let sql = format!("SELECT {RESULT_COLUMNS} FROM results WHERE id = $1");
        let result = sqlx::query_as::<_, ExamResult>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(result)
    }

    async fn find_first(
        &self,
        user_id: i64,
        exam_id: i64,
    ) -> Result<Option<ExamResult>, AppError> {
        let sql = format!(
            "SELECT {RESULT_COLUMNS} FROM results \
             WHERE user_id = $1 AND exam_id = $2 \
             ORDER BY attempt_no ASC LIMIT 1"
        );
        let result = sqlx::query_as::<_, ExamResult>(&sql)
            .bind(user_id)
            .bind(exam_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(result)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ExamResult>, AppError> {
        let sql = format!(
            "SELECT {RESULT_COLUMNS} FROM results WHERE user_id = $1 \
             ORDER BY submitted_at DESC, id DESC"
        );
        let results = sqlx::query_as::<_, ExamResult>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(results)
    }

    async fn leaderboard(
        &self,
        exam_id: i64,
        limit: i64,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT user_id, score, obtained_marks, time_taken, submitted_at
            FROM results
            WHERE exam_id = $1 AND attempt_no = 1
            ORDER BY score DESC, time_taken ASC, id ASC
            LIMIT $2
            "#,
        )
        .bind(exam_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch leaderboard: {:?}", e);
            AppError::from(e)
        })?;

        Ok(entries)
    }
}
