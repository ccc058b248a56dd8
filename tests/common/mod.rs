// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use exam_engine::{
    config::Config,
    models::{
        exam::{Exam, ExamStats, NegativeMarking, Section},
        question::{Question, QuestionStats},
    },
    repository::MemoryStore,
    routes,
    state::{AppState, Repositories},
    utils::jwt::sign_jwt,
};
use sqlx::types::Json;

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";

pub fn test_config(max_attempts_per_exam: u32) -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        max_attempts_per_exam,
        stats_retry_attempts: 1,
    }
}

pub struct TestApp {
    pub address: String,
    pub store: Arc<MemoryStore>,
}

/// Spawns the app on a random port backed by a fresh in-memory store.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(1)).await
}

pub async fn spawn_app_with(config: Config) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        repos: Repositories::memory(store.clone()),
        config,
    };

    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, store }
}

pub fn token_for(user_id: i64, role: &str) -> String {
    sign_jwt(user_id, role, JWT_SECRET, 600).expect("Failed to sign token")
}

pub fn question(id: i64, answer: &str, marks: f64) -> Question {
    Question {
        id,
        question_type: "single".to_string(),
        content: format!("<p>Question {}</p>", id),
        options: Json(vec!["A".into(), "B".into(), "C".into(), "D".into()]),
        answer: answer.to_string(),
        analysis: Some(format!("Because {} is right", answer)),
        marks,
        negative_marks: None,
        difficulty: Some("easy".to_string()),
        subject: None,
        topic: None,
        is_active: true,
        stats: QuestionStats::default(),
        created_at: None,
    }
}

pub fn exam(id: i64, sections: &[(&str, &[i64])], passing_marks: f64) -> Exam {
    Exam {
        id,
        title: format!("Exam {}", id),
        description: None,
        is_active: true,
        sections: Json(
            sections
                .iter()
                .enumerate()
                .map(|(i, (name, ids))| Section {
                    id: id * 100 + i as i64,
                    name: name.to_string(),
                    question_ids: ids.to_vec(),
                    marks: None,
                    duration_minutes: None,
                })
                .collect(),
        ),
        negative_marking: NegativeMarking::default(),
        passing_marks,
        duration_minutes: Some(30),
        stats: ExamStats::default(),
        created_at: None,
    }
}

/// Seeds the two-question exam used across the scenarios: answers "A" and
/// "B", one mark each, 50% to pass.
pub fn seed_two_question_exam(store: &MemoryStore, exam_id: i64, negative: Option<f64>) {
    let mut exam = exam(exam_id, &[("Main", &[1, 2])], 50.0);
    if let Some(value) = negative {
        exam.negative_marking = NegativeMarking {
            enabled: true,
            default_value: value,
        };
    }
    store.put_exam(exam).unwrap();
    store.put_question(question(1, "A", 1.0)).unwrap();
    store.put_question(question(2, "B", 1.0)).unwrap();
}
