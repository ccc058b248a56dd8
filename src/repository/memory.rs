// src/repository/memory.rs

//! In-process store backing all three repositories.
//!
//! One mutex guards every table, so each trait method runs as a single
//! critical section. No lock is held across an `.await`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sqlx::types::Json;

use crate::{
    error::AppError,
    models::{
        exam::{Exam, ExamStats},
        question::{Question, QuestionOutcome, QuestionStats},
        result::{ExamResult, LeaderboardEntry, NewResult},
    },
};

use super::{ExamRepository, Insertion, QuestionRepository, ResultRepository};

#[derive(Default)]
struct Tables {
    exams: HashMap<i64, Exam>,
    questions: HashMap<i64, Question>,
    results: Vec<ExamResult>,
    next_result_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::InternalServerError("memory store lock poisoned".to_string()))
    }

    /// Adds or replaces an exam definition.
    pub fn put_exam(&self, exam: Exam) -> Result<(), AppError> {
        self.lock()?.exams.insert(exam.id, exam);
        Ok(())
    }

    /// Adds or replaces a question.
    pub fn put_question(&self, question: Question) -> Result<(), AppError> {
        self.lock()?.questions.insert(question.id, question);
        Ok(())
    }

    /// Drops a question outright, as if its row had been deleted.
    pub fn remove_question(&self, id: i64) -> Result<Option<Question>, AppError> {
        Ok(self.lock()?.questions.remove(&id))
    }

    pub fn exam_stats(&self, id: i64) -> Result<Option<ExamStats>, AppError> {
        Ok(self.lock()?.exams.get(&id).map(|exam| exam.stats))
    }

    pub fn question_stats(&self, id: i64) -> Result<Option<QuestionStats>, AppError> {
        Ok(self.lock()?.questions.get(&id).map(|q| q.stats))
    }

    pub fn result_count(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.results.len())
    }
}

#[async_trait]
impl ExamRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Exam>, AppError> {
        Ok(self.lock()?.exams.get(&id).cloned())
    }

    async fn record_attempt(
        &self,
        id: i64,
        score: i64,
        passed: bool,
    ) -> Result<ExamStats, AppError> {
        let mut tables = self.lock()?;
        let exam = tables
            .exams
            .get_mut(&id)
            .ok_or(AppError::NotFound("Exam not found".to_string()))?;
        exam.stats.record(score, passed);
        Ok(exam.stats)
    }
}

#[async_trait]
impl QuestionRepository for MemoryStore {
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError> {
        let tables = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| tables.questions.get(id).cloned())
            .collect())
    }

    async fn record_attempts(&self, outcomes: &[QuestionOutcome]) -> Result<(), AppError> {
        let mut tables = self.lock()?;
        for outcome in outcomes {
            if let Some(question) = tables.questions.get_mut(&outcome.question_id) {
                question.stats.record(outcome.is_correct);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for MemoryStore {
    async fn insert_within_limit(
        &self,
        result: NewResult,
        max_attempts: u32,
    ) -> Result<Insertion, AppError> {
        let mut tables = self.lock()?;

        let previous: Vec<&ExamResult> = tables
            .results
            .iter()
            .filter(|r| r.user_id == result.user_id && r.exam_id == result.exam_id)
            .collect();

        if previous.len() >= max_attempts as usize {
            let first = previous
                .into_iter()
                .min_by_key(|r| r.attempt_no)
                .cloned()
                .ok_or(AppError::Conflict("Attempt limit reached".to_string()))?;
            return Ok(Insertion::Existing(first));
        }

        let attempt_no = previous.len() as i32 + 1;
        tables.next_result_id += 1;
        let stored = ExamResult {
            id: tables.next_result_id,
            user_id: result.user_id,
            exam_id: result.exam_id,
            attempt_no,
            score: result.score,
            total_questions: result.total_questions,
            correct_answers: result.correct_answers,
            wrong_answers: result.wrong_answers,
            unattempted: result.unattempted,
            total_marks: result.total_marks,
            obtained_marks: result.obtained_marks,
            time_taken: result.time_taken,
            is_passed: result.is_passed,
            answers: Json(result.answers),
            submitted_at: chrono::Utc::now(),
        };
        tables.results.push(stored.clone());

        Ok(Insertion::Created(stored))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ExamResult>, AppError> {
        Ok(self.lock()?.results.iter().find(|r| r.id == id).cloned())
    }

    async fn find_first(
        &self,
        user_id: i64,
        exam_id: i64,
    ) -> Result<Option<ExamResult>, AppError> {
        Ok(self
            .lock()?
            .results
            .iter()
            .filter(|r| r.user_id == user_id && r.exam_id == exam_id)
            .min_by_key(|r| r.attempt_no)
            .cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ExamResult>, AppError> {
        let tables = self.lock()?;
        // Ids grow with insertion order.
        let mut results: Vec<ExamResult> = tables
            .results
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(results)
    }

    async fn leaderboard(
        &self,
        exam_id: i64,
        limit: i64,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let tables = self.lock()?;
        let mut firsts: Vec<&ExamResult> = tables
            .results
            .iter()
            .filter(|r| r.exam_id == exam_id && r.attempt_no == 1)
            .collect();
        firsts.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.time_taken.cmp(&b.time_taken))
                .then(a.id.cmp(&b.id))
        });

        Ok(firsts
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|r| LeaderboardEntry {
                user_id: r.user_id,
                score: r.score,
                obtained_marks: r.obtained_marks,
                time_taken: r.time_taken,
                submitted_at: r.submitted_at,
            })
            .collect())
    }
}
