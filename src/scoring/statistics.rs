// src/scoring/statistics.rs

//! Incremental (online mean) updates of the running statistics.
//!
//! Every store backend must apply exactly these rules; the Postgres store
//! expresses them as single `UPDATE` statements.

use crate::models::{exam::ExamStats, question::QuestionStats};

impl ExamStats {
    /// Folds one result into the running averages.
    pub fn record(&mut self, score: i64, passed: bool) {
        let previous = self.total_attempts as f64;
        self.total_attempts += 1;
        let count = self.total_attempts as f64;

        self.average_score = (self.average_score * previous + score as f64) / count;
        let pass_value = if passed { 100.0 } else { 0.0 };
        self.pass_rate = (self.pass_rate * previous + pass_value) / count;
    }
}

impl QuestionStats {
    /// Counts one exposure of the question. Unattempted questions count too.
    pub fn record(&mut self, correct: bool) {
        self.total_attempts += 1;
        if correct {
            self.correct_attempts += 1;
        }
        self.accuracy_rate = self.correct_attempts as f64 / self.total_attempts as f64 * 100.0;
    }
}
