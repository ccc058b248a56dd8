// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{
    config::Config,
    repository::{ExamRepository, MemoryStore, PgStore, QuestionRepository, ResultRepository},
};

/// The three stores the scoring engine reads from and writes to.
#[derive(Clone)]
pub struct Repositories {
    pub exams: Arc<dyn ExamRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub results: Arc<dyn ResultRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            exams: store.clone(),
            questions: store.clone(),
            results: store,
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            exams: store.clone(),
            questions: store.clone(),
            results: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub config: Config,
}

impl FromRef<AppState> for Repositories {
    fn from_ref(state: &AppState) -> Self {
        state.repos.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
