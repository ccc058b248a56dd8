// src/services/submission.rs

//! Attempt submission: resolve exam and questions, score, store, update stats.

use std::collections::HashMap;

use crate::{
    config::AttemptPolicy,
    error::AppError,
    models::result::SubmitResponse,
    repository::Insertion,
    scoring::score_attempt,
    state::Repositories,
    utils::retry::RetryConfig,
};

use super::statistics::apply_result;

/// One submission as received from the transport layer.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub exam_id: i64,
    pub user_id: i64,
    pub answers: HashMap<i64, String>,
    pub elapsed_seconds: i64,
}

/// Scores and records an attempt.
///
/// Reading the exam or its questions aborts the whole submission on failure;
/// nothing is written in that case. Once the result is stored, statistics
/// are best-effort. If the user is already at the attempt limit for this
/// exam, the first stored result is returned and no statistics are applied.
pub async fn submit(
    repos: &Repositories,
    policy: AttemptPolicy,
    retry: &RetryConfig,
    attempt: Attempt,
) -> Result<SubmitResponse, AppError> {
    let exam = repos
        .exams
        .find_by_id(attempt.exam_id)
        .await?
        .filter(|exam| exam.is_active)
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let question_ids = exam.question_ids();
    let questions = repos.questions.find_by_ids(&question_ids).await?;

    if !question_ids.is_empty() && questions.is_empty() {
        tracing::warn!(
            "Exam {} references {} question(s), none of which exist",
            exam.id,
            question_ids.len()
        );
        return Err(AppError::NotFound("Exam questions not found".to_string()));
    }

    let scored = score_attempt(
        &exam,
        &questions,
        attempt.user_id,
        &attempt.answers,
        attempt.elapsed_seconds,
    );

    match repos
        .results
        .insert_within_limit(scored, policy.max_attempts_per_exam)
        .await?
    {
        Insertion::Created(result) => {
            tracing::info!(
                "User {} submitted exam {}: result={} score={} passed={}",
                result.user_id,
                result.exam_id,
                result.id,
                result.score,
                result.is_passed
            );

            apply_result(repos, &result, retry).await;

            Ok(SubmitResponse {
                result_id: result.id,
                score: result.score,
                is_passed: result.is_passed,
                duplicate: false,
            })
        }
        Insertion::Existing(first) => {
            tracing::info!(
                "User {} already holds {} result(s) for exam {}; returning result {}",
                first.user_id,
                policy.max_attempts_per_exam,
                first.exam_id,
                first.id
            );

            Ok(SubmitResponse {
                result_id: first.id,
                score: first.score,
                is_passed: first.is_passed,
                duplicate: true,
            })
        }
    }
}
