// src/services/mod.rs

pub mod results;
pub mod statistics;
pub mod submission;
