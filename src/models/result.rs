// src/models/result.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

/// Represents the 'results' table in the database.
/// One scored attempt; never modified after creation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: i64,
    pub user_id: i64,
    pub exam_id: i64,

    /// 1 for the first result of a (user, exam) pair.
    pub attempt_no: i32,

    /// Rounded percentage of `obtained_marks / total_marks`. May be negative.
    pub score: i64,

    pub total_questions: i32,
    pub correct_answers: i32,
    pub wrong_answers: i32,
    pub unattempted: i32,

    pub total_marks: f64,

    /// Signed; negative marking can push it below zero.
    pub obtained_marks: f64,

    /// Seconds reported by the client.
    pub time_taken: i64,

    pub is_passed: bool,

    /// Per-question breakdown in the exam's flattened order.
    pub answers: Json<Vec<ProcessedAnswer>>,

    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// Scoring of a single question inside a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedAnswer {
    pub question_id: i64,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    /// Positive for a correct answer, negative for a penalised wrong one.
    pub marks_awarded: f64,
    /// Section the question was assigned to when the result was scored.
    pub section_id: Option<i64>,
}

/// A scored attempt that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResult {
    pub user_id: i64,
    pub exam_id: i64,
    pub score: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub wrong_answers: i32,
    pub unattempted: i32,
    pub total_marks: f64,
    pub obtained_marks: f64,
    pub time_taken: i64,
    pub is_passed: bool,
    pub answers: Vec<ProcessedAnswer>,
}

/// DTO for submitting an exam attempt.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitExamRequest {
    /// User's answers map.
    /// Key: Question ID (i64)
    /// Value: User's selected option. Missing keys and `null` are unattempted.
    #[validate(length(max = 1000, message = "Too many answers submitted."))]
    #[serde(default)]
    pub answers: HashMap<i64, Option<String>>,

    #[validate(range(min = 0, max = 604800))]
    pub elapsed_seconds: i64,
}

impl SubmitExamRequest {
    /// The answered questions only; explicit `null` entries are dropped.
    pub fn selected_answers(&self) -> HashMap<i64, String> {
        self.answers
            .iter()
            .filter_map(|(&id, answer)| answer.clone().map(|a| (id, a)))
            .collect()
    }
}

/// Response for a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub result_id: i64,
    pub score: i64,
    pub is_passed: bool,
    /// True when the submission resolved to an already stored result.
    pub duplicate: bool,
}

/// Per-section correctness, rebuilt on demand from the exam layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionReport {
    pub section_id: i64,
    pub name: String,
    pub total: i32,
    pub correct: i32,
    pub score: i64,
}

/// Processed answer joined with the question's display content.
#[derive(Debug, Serialize)]
pub struct AnswerDetail {
    #[serde(flatten)]
    pub answer: ProcessedAnswer,
    pub question_type: Option<String>,
    pub content: Option<String>,
    pub options: Vec<String>,
    pub analysis: Option<String>,
}

/// Full view of a result for its owner or an admin.
#[derive(Debug, Serialize)]
pub struct ResultDetail {
    pub id: i64,
    pub user_id: i64,
    pub exam_id: i64,
    pub exam_title: String,
    pub attempt_no: i32,
    pub score: i64,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub wrong_answers: i32,
    pub unattempted: i32,
    pub total_marks: f64,
    pub obtained_marks: f64,
    pub time_taken: i64,
    pub is_passed: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub answers: Vec<AnswerDetail>,
    pub sections: Vec<SectionReport>,
}

/// Short form used by result listings.
#[derive(Debug, Serialize)]
pub struct ResultSummary {
    pub id: i64,
    pub exam_id: i64,
    pub attempt_no: i32,
    pub score: i64,
    pub is_passed: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl From<&ExamResult> for ResultSummary {
    fn from(result: &ExamResult) -> Self {
        Self {
            id: result.id,
            exam_id: result.exam_id,
            attempt_no: result.attempt_no,
            score: result.score,
            is_passed: result.is_passed,
            submitted_at: result.submitted_at,
        }
    }
}

/// One row of an exam leaderboard.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub score: i64,
    pub obtained_marks: f64,
    pub time_taken: i64,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<i64>,
}
