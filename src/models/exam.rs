// src/models/exam.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

use crate::models::question::QuestionStatsEntry;

/// Represents the 'exams' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,

    pub title: String,

    pub description: Option<String>,

    /// Inactive exams cannot be submitted.
    pub is_active: bool,

    /// Ordered sections. Each question id belongs to at most one section.
    /// Stored as a JSON array in the database.
    pub sections: Json<Vec<Section>>,

    #[sqlx(flatten)]
    pub negative_marking: NegativeMarking,

    /// Passing threshold as a percentage (0-100).
    pub passing_marks: f64,

    pub duration_minutes: Option<i32>,

    #[sqlx(flatten)]
    pub stats: ExamStats,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Exam {
    /// Flat question-id list: each section's ids, in section order.
    pub fn question_ids(&self) -> Vec<i64> {
        self.sections
            .iter()
            .flat_map(|section| section.question_ids.iter().copied())
            .collect()
    }
}

/// A named, ordered subset of an exam's questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub question_ids: Vec<i64>,
    #[serde(default)]
    pub marks: Option<f64>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
}

/// Exam-wide negative marking policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct NegativeMarking {
    #[sqlx(rename = "negative_marking_enabled")]
    pub enabled: bool,

    /// Deduction used when a question has no value of its own.
    #[sqlx(rename = "negative_marking_default")]
    pub default_value: f64,
}

/// Running aggregates over every result recorded for an exam.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ExamStats {
    pub total_attempts: i64,
    /// Mean of result scores, as a percentage.
    pub average_score: f64,
    /// Share of passing results, as a percentage.
    pub pass_rate: f64,
}

/// Admin statistics view for one exam.
#[derive(Debug, Serialize)]
pub struct ExamStatisticsResponse {
    pub exam_id: i64,
    pub title: String,
    #[serde(flatten)]
    pub stats: ExamStats,
    pub questions: Vec<QuestionStatsEntry>,
}
