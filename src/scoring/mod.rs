// src/scoring/mod.rs

//! Pure scoring engine: marking, section breakdown and statistics math.
//! Nothing in here touches storage.

pub mod marking;
pub mod sections;
pub mod statistics;

pub use marking::score_attempt;
pub use sections::{SectionIndex, map_to_sections};

/// `part / whole * 100`, with halves rounded up (`-12.5` becomes `-12`).
/// Zero when `whole` is not positive.
pub fn percentage(part: f64, whole: f64) -> i64 {
    if whole <= 0.0 {
        return 0;
    }
    (part / whole * 100.0 + 0.5).floor() as i64
}
