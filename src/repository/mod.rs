// src/repository/mod.rs

//! Storage contracts required by the scoring engine.
//!
//! Backends must make `ExamRepository::record_attempt`,
//! `QuestionRepository::record_attempts` and
//! `ResultRepository::insert_within_limit` atomic with respect to
//! concurrent callers.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        exam::{Exam, ExamStats},
        question::{Question, QuestionOutcome},
        result::{ExamResult, LeaderboardEntry, NewResult},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait ExamRepository: Send + Sync {
    /// Fetches an exam regardless of its active flag.
    async fn find_by_id(&self, id: i64) -> Result<Option<Exam>, AppError>;

    /// Atomically folds one result into the exam's running statistics and
    /// returns the updated values.
    async fn record_attempt(&self, id: i64, score: i64, passed: bool)
    -> Result<ExamStats, AppError>;
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetches every question among `ids` that exists. Unknown ids are
    /// silently absent from the output.
    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>, AppError>;

    /// Atomically bumps each question's accuracy counters.
    async fn record_attempts(&self, outcomes: &[QuestionOutcome]) -> Result<(), AppError>;
}

/// Outcome of a result insert under an attempt limit.
#[derive(Debug, Clone)]
pub enum Insertion {
    /// The result was stored.
    Created(ExamResult),
    /// The limit was already reached; carries the user's first result for the exam.
    Existing(ExamResult),
}

#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Stores `result` unless the user already holds `max_attempts` results
    /// for the exam. The check and the insert are one atomic step.
    async fn insert_within_limit(
        &self,
        result: NewResult,
        max_attempts: u32,
    ) -> Result<Insertion, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<ExamResult>, AppError>;

    /// The earliest result for a (user, exam) pair.
    async fn find_first(&self, user_id: i64, exam_id: i64)
    -> Result<Option<ExamResult>, AppError>;

    /// All results of a user, newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<ExamResult>, AppError>;

    /// First-attempt results for an exam, best score first, faster first on ties.
    async fn leaderboard(&self, exam_id: i64, limit: i64)
    -> Result<Vec<LeaderboardEntry>, AppError>;
}
