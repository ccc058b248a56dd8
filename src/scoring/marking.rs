// src/scoring/marking.rs

//! Marking of a submitted answer sheet against an exam's questions.

use std::collections::{HashMap, HashSet};

use crate::models::{
    exam::Exam,
    question::Question,
    result::{NewResult, ProcessedAnswer},
};

use super::{percentage, sections::SectionIndex};

/// Scores one attempt.
///
/// Questions are walked in the exam's flattened section order. Ids with no
/// matching entry in `questions` are skipped and contribute nothing to the
/// totals. The function performs no I/O.
pub fn score_attempt(
    exam: &Exam,
    questions: &[Question],
    user_id: i64,
    answers: &HashMap<i64, String>,
    elapsed_seconds: i64,
) -> NewResult {
    let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();
    let index = SectionIndex::build(exam);

    let mut sheet = Tally::default();
    let mut seen = HashSet::new();
    let mut missing = Vec::new();

    for question_id in exam.question_ids() {
        let Some(question) = by_id.get(&question_id) else {
            missing.push(question_id);
            continue;
        };

        // A question listed twice in the exam is only marked once.
        if !seen.insert(question_id) {
            continue;
        }

        let user_answer = answers.get(&question_id).cloned();
        let section_id = index.section_id_of(exam, question_id);
        sheet.mark(exam, question, user_answer, section_id);
    }

    if !missing.is_empty() {
        tracing::warn!(
            "Exam {}: {} referenced question(s) not found, skipped from scoring: {:?}",
            exam.id,
            missing.len(),
            missing
        );
    }

    let score = percentage(sheet.obtained_marks, sheet.total_marks);

    NewResult {
        user_id,
        exam_id: exam.id,
        score,
        total_questions: sheet.processed.len() as i32,
        correct_answers: sheet.correct,
        wrong_answers: sheet.wrong,
        unattempted: sheet.unattempted,
        total_marks: sheet.total_marks,
        obtained_marks: sheet.obtained_marks,
        time_taken: elapsed_seconds,
        is_passed: score as f64 >= exam.passing_marks,
        answers: sheet.processed,
    }
}

#[derive(Default)]
struct Tally {
    total_marks: f64,
    obtained_marks: f64,
    correct: i32,
    wrong: i32,
    unattempted: i32,
    processed: Vec<ProcessedAnswer>,
}

impl Tally {
    fn mark(
        &mut self,
        exam: &Exam,
        question: &Question,
        user_answer: Option<String>,
        section_id: Option<i64>,
    ) {
        self.total_marks += question.marks;

        let (is_correct, marks_awarded) = match user_answer.as_deref() {
            None => {
                self.unattempted += 1;
                (false, 0.0)
            }
            Some(given) if given == question.answer => {
                self.correct += 1;
                (true, question.marks)
            }
            Some(_) => {
                self.wrong += 1;
                let penalty = if exam.negative_marking.enabled {
                    question.effective_negative_marks(exam.negative_marking.default_value)
                } else {
                    0.0
                };
                (false, -penalty)
            }
        };

        self.obtained_marks += marks_awarded;
        self.processed.push(ProcessedAnswer {
            question_id: question.id,
            user_answer,
            correct_answer: question.answer.clone(),
            is_correct,
            marks_awarded,
            section_id,
        });
    }
}
