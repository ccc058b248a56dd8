// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Represents the 'questions' table in the database.
///
/// Scoring only reads `answer`, `marks` and `negative_marks`; the rest is
/// display content or descriptive metadata.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// Question type: 'single', 'multiple', 'numeric', ...
    /// Mapped from the database column 'type' since `type` is a reserved keyword in Rust.
    #[sqlx(rename = "type")]
    pub question_type: String,

    /// The text content of the question.
    pub content: String,

    /// List of options (e.g., ["Option A", "Option B"]).
    /// Stored as a JSON array in the database.
    pub options: Json<Vec<String>>,

    /// The correct answer, compared by exact string equality.
    pub answer: String,

    /// Explanation shown after submission.
    pub analysis: Option<String>,

    /// Marks awarded for a correct answer.
    pub marks: f64,

    /// Per-question deduction for a wrong answer. When unset, the exam's
    /// default deduction applies.
    pub negative_marks: Option<f64>,

    pub difficulty: Option<String>,
    pub subject: Option<String>,
    pub topic: Option<String>,

    /// Soft-deactivation flag. Questions are never deleted.
    pub is_active: bool,

    #[sqlx(flatten)]
    pub stats: QuestionStats,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Question {
    /// Deduction applied for a wrong answer when negative marking is enabled.
    pub fn effective_negative_marks(&self, exam_default: f64) -> f64 {
        self.negative_marks.unwrap_or(exam_default)
    }
}

/// Running accuracy counters for one question.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct QuestionStats {
    pub total_attempts: i64,
    pub correct_attempts: i64,
    /// `correct_attempts / total_attempts * 100`.
    pub accuracy_rate: f64,
}

/// Outcome of one question inside a scored attempt, fed to the
/// question statistics counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub question_id: i64,
    pub is_correct: bool,
}

/// Admin view of one question's counters.
#[derive(Debug, Serialize)]
pub struct QuestionStatsEntry {
    pub question_id: i64,
    #[serde(flatten)]
    pub stats: QuestionStats,
}
