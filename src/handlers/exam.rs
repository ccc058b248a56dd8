// src/handlers/exam.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::result::{LeaderboardParams, SubmitExamRequest},
    services::{
        results,
        submission::{self, Attempt},
    },
    state::Repositories,
    utils::{jwt::Claims, retry::RetryConfig},
};

/// Submits a user's answers for an exam.
///
/// * Validates the token and extracts the User ID.
/// * Scores the sheet against the exam's questions.
/// * Returns 201 for a new result, or 200 pointing at the stored result when
///   the user has no attempts left.
pub async fn submit_exam(
    State(repos): State<Repositories>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Path(exam_id): Path<i64>,
    payload: Result<Json<SubmitExamRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    req.validate()?;

    let user_id = claims.user_id()?;
    let attempt = Attempt {
        exam_id,
        user_id,
        answers: req.selected_answers(),
        elapsed_seconds: req.elapsed_seconds,
    };

    let retry = RetryConfig::with_attempts(config.stats_retry_attempts);
    let response =
        submission::submit(&repos, config.attempt_policy(), &retry, attempt).await?;

    let status = if response.duplicate {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((status, Json(response)))
}

/// Retrieves the best first attempts for an exam.
pub async fn get_leaderboard(
    State(repos): State<Repositories>,
    Path(exam_id): Path<i64>,
    Query(params): Query<LeaderboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let entries = results::leaderboard(&repos, exam_id, params.limit).await?;
    Ok(Json(entries))
}

/// Exam and per-question running statistics.
/// Admin only.
pub async fn get_exam_statistics(
    State(repos): State<Repositories>,
    Path(exam_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let statistics = results::exam_statistics(&repos, exam_id).await?;
    Ok(Json(statistics))
}
