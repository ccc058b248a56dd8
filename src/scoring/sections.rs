// src/scoring/sections.rs

//! Section membership lookup and per-section aggregation.

use std::collections::HashMap;

use crate::models::{
    exam::Exam,
    result::{ProcessedAnswer, SectionReport},
};

use super::percentage;

/// Question id -> position of its owning section in `exam.sections`.
///
/// Built once per exam so lookups during scoring are O(1). When a question
/// id appears in several sections, the first section wins.
#[derive(Debug, Default)]
pub struct SectionIndex {
    owner: HashMap<i64, usize>,
}

impl SectionIndex {
    pub fn build(exam: &Exam) -> Self {
        let mut owner: HashMap<i64, usize> = HashMap::new();

        for (position, section) in exam.sections.iter().enumerate() {
            for &question_id in &section.question_ids {
                if let Some(&first) = owner.get(&question_id) {
                    if first != position {
                        tracing::warn!(
                            "Exam {}: question {} listed in section {} and section {}; keeping section {}",
                            exam.id,
                            question_id,
                            exam.sections[first].id,
                            section.id,
                            exam.sections[first].id
                        );
                    } else {
                        tracing::warn!(
                            "Exam {}: question {} listed twice in section {}",
                            exam.id,
                            question_id,
                            section.id
                        );
                    }
                    continue;
                }
                owner.insert(question_id, position);
            }
        }

        Self { owner }
    }

    /// Position of the section owning `question_id`.
    pub fn position_of(&self, question_id: i64) -> Option<usize> {
        self.owner.get(&question_id).copied()
    }

    /// Id of the section owning `question_id`.
    pub fn section_id_of(&self, exam: &Exam, question_id: i64) -> Option<i64> {
        self.position_of(question_id)
            .map(|position| exam.sections[position].id)
    }
}

/// Builds one report per exam section, in definition order.
///
/// Answers whose question is in no section are left out of every report.
pub fn map_to_sections(exam: &Exam, answers: &[ProcessedAnswer]) -> Vec<SectionReport> {
    let index = SectionIndex::build(exam);
    let mut tallies = vec![(0i32, 0i32); exam.sections.len()];

    for answer in answers {
        match index.position_of(answer.question_id) {
            Some(position) => {
                let (total, correct) = &mut tallies[position];
                *total += 1;
                if answer.is_correct {
                    *correct += 1;
                }
            }
            None => tracing::debug!(
                "Exam {}: answered question {} is not in any section",
                exam.id,
                answer.question_id
            ),
        }
    }

    exam.sections
        .iter()
        .zip(tallies)
        .map(|(section, (total, correct))| SectionReport {
            section_id: section.id,
            name: section.name.clone(),
            total,
            correct,
            score: percentage(correct as f64, total as f64),
        })
        .collect()
}
