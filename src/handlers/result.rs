// src/handlers/result.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{error::AppError, services::results, state::Repositories, utils::jwt::Claims};

/// Full breakdown of one result.
/// Visible to the result's owner and to admins.
pub async fn get_result_detail(
    State(repos): State<Repositories>,
    Extension(claims): Extension<Claims>,
    Path(result_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let requester_id = claims.user_id()?;
    let detail = results::get_detail(&repos, result_id, requester_id, &claims.role).await?;
    Ok(Json(detail))
}

/// Lists the current user's results.
pub async fn list_my_results(
    State(repos): State<Repositories>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let summaries = results::list_for_user(&repos, user_id).await?;
    Ok(Json(summaries))
}
