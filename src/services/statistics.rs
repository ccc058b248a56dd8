// src/services/statistics.rs

//! Folds a stored result into the exam and question running statistics.

use crate::{
    error::AppError,
    models::{question::QuestionOutcome, result::ExamResult},
    state::Repositories,
    utils::retry::{RetryConfig, retry_async_when},
};

/// What happened to each statistics write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsReport {
    pub exam_updated: bool,
    pub questions_updated: bool,
}

/// Applies `result` to the running statistics.
///
/// Called once, after the result is stored. Failures are logged and
/// reported but never returned: the stored result stands either way.
/// Every question in the result counts, unattempted ones included.
pub async fn apply_result(
    repos: &Repositories,
    result: &ExamResult,
    retry: &RetryConfig,
) -> StatsReport {
    let exam_updated = match retry_async_when(retry, is_transient, || {
        repos
            .exams
            .record_attempt(result.exam_id, result.score, result.is_passed)
    })
    .await
    {
        Ok(stats) => {
            tracing::debug!(
                "Exam {} stats: attempts={} average={:.2} pass_rate={:.2}",
                result.exam_id,
                stats.total_attempts,
                stats.average_score,
                stats.pass_rate
            );
            true
        }
        Err(e) => {
            log_failure("exam", result, &e);
            false
        }
    };

    let outcomes: Vec<QuestionOutcome> = result
        .answers
        .iter()
        .map(|answer| QuestionOutcome {
            question_id: answer.question_id,
            is_correct: answer.is_correct,
        })
        .collect();

    let questions_updated =
        match retry_async_when(retry, is_transient, || repos.questions.record_attempts(&outcomes))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                log_failure("question", result, &e);
                false
            }
        };

    StatsReport {
        exam_updated,
        questions_updated,
    }
}

/// Storage failures are retried; `NotFound` and the rest are final.
fn is_transient(error: &AppError) -> bool {
    matches!(error, AppError::InternalServerError(_))
}

fn log_failure(target: &str, result: &ExamResult, error: &AppError) {
    tracing::error!(
        "Failed to update {} statistics for result {} (exam {}): {}",
        target,
        result.id,
        result.exam_id,
        error
    );
}
