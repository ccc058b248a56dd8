// src/services/results.rs

//! Read-side views over stored results.

use std::collections::HashMap;

use crate::{
    config::{DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT},
    error::AppError,
    models::{
        exam::ExamStatisticsResponse,
        question::{Question, QuestionStatsEntry},
        result::{AnswerDetail, LeaderboardEntry, ResultDetail, ResultSummary},
    },
    scoring::map_to_sections,
    state::Repositories,
    utils::{
        html::{clean_all, clean_html},
        jwt::ADMIN_ROLE,
    },
};

/// Builds the full view of a result for its owner or an admin.
///
/// Scoring fields come from the stored result unchanged. Question content is
/// looked up fresh and the section breakdown is recomputed from the exam's
/// current layout.
pub async fn get_detail(
    repos: &Repositories,
    result_id: i64,
    requester_id: i64,
    requester_role: &str,
) -> Result<ResultDetail, AppError> {
    let result = repos
        .results
        .find_by_id(result_id)
        .await?
        .ok_or(AppError::NotFound("Result not found".to_string()))?;

    if result.user_id != requester_id && requester_role != ADMIN_ROLE {
        tracing::warn!(
            "User {} ({}) denied access to result {}",
            requester_id,
            requester_role,
            result_id
        );
        return Err(AppError::Forbidden(
            "Not allowed to view this result".to_string(),
        ));
    }

    let exam = repos
        .exams
        .find_by_id(result.exam_id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let question_ids: Vec<i64> = result.answers.iter().map(|a| a.question_id).collect();
    let content: HashMap<i64, Question> = repos
        .questions
        .find_by_ids(&question_ids)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();

    let sections = map_to_sections(&exam, &result.answers);

    let answers = result
        .answers
        .iter()
        .map(|answer| {
            let question = content.get(&answer.question_id);
            AnswerDetail {
                answer: answer.clone(),
                question_type: question.map(|q| q.question_type.clone()),
                content: question.map(|q| clean_html(&q.content)),
                options: question.map(|q| clean_all(&q.options)).unwrap_or_default(),
                analysis: question
                    .and_then(|q| q.analysis.as_deref())
                    .map(clean_html),
            }
        })
        .collect();

    Ok(ResultDetail {
        id: result.id,
        user_id: result.user_id,
        exam_id: result.exam_id,
        exam_title: exam.title,
        attempt_no: result.attempt_no,
        score: result.score,
        total_questions: result.total_questions,
        correct_answers: result.correct_answers,
        wrong_answers: result.wrong_answers,
        unattempted: result.unattempted,
        total_marks: result.total_marks,
        obtained_marks: result.obtained_marks,
        time_taken: result.time_taken,
        is_passed: result.is_passed,
        submitted_at: result.submitted_at,
        answers,
        sections,
    })
}

/// Lists a user's own results, newest first.
pub async fn list_for_user(
    repos: &Repositories,
    user_id: i64,
) -> Result<Vec<ResultSummary>, AppError> {
    let results = repos.results.list_by_user(user_id).await?;
    Ok(results.iter().map(ResultSummary::from).collect())
}

/// Top first-attempt results for an exam.
pub async fn leaderboard(
    repos: &Repositories,
    exam_id: i64,
    limit: Option<i64>,
) -> Result<Vec<LeaderboardEntry>, AppError> {
    let limit = limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    repos
        .exams
        .find_by_id(exam_id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    repos.results.leaderboard(exam_id, limit).await
}

/// Exam running statistics together with each of its questions' counters.
pub async fn exam_statistics(
    repos: &Repositories,
    exam_id: i64,
) -> Result<ExamStatisticsResponse, AppError> {
    let exam = repos
        .exams
        .find_by_id(exam_id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;

    let question_ids = exam.question_ids();
    let by_id: HashMap<i64, Question> = repos
        .questions
        .find_by_ids(&question_ids)
        .await?
        .into_iter()
        .map(|q| (q.id, q))
        .collect();

    let questions = question_ids
        .iter()
        .filter_map(|id| by_id.get(id))
        .map(|q| QuestionStatsEntry {
            question_id: q.id,
            stats: q.stats,
        })
        .collect();

    Ok(ExamStatisticsResponse {
        exam_id: exam.id,
        title: exam.title,
        stats: exam.stats,
        questions,
    })
}
