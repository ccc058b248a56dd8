// tests/api_tests.rs

mod common;

use common::{exam, question, seed_two_question_exam, spawn_app, spawn_app_with, test_config, token_for};
use serde_json::{Value, json};

async fn submit(
    client: &reqwest::Client,
    address: &str,
    exam_id: i64,
    token: &str,
    body: Value,
) -> reqwest::Response {
    client
        .post(format!("{}/api/exams/{}/submit", address, exam_id))
        .header("Authorization", format!("Bearer {}", token))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn submit_without_token_is_unauthorized() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/exams/1/submit", app.address))
        .json(&json!({ "answers": {}, "elapsed_seconds": 10 }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(app.store.result_count().unwrap(), 0);
}

#[tokio::test]
async fn submit_with_bad_token_is_unauthorized() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();

    let response = submit(
        &client,
        &app.address,
        1,
        "not-a-jwt",
        json!({ "answers": {}, "elapsed_seconds": 10 }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn submit_scores_one_right_one_wrong() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();
    let token = token_for(10, "student");

    let response = submit(
        &client,
        &app.address,
        1,
        &token,
        json!({ "answers": { "1": "A", "2": "C" }, "elapsed_seconds": 95 }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 50);
    assert_eq!(body["is_passed"], true);
    assert_eq!(body["duplicate"], false);

    let stats = app.store.exam_stats(1).unwrap().unwrap();
    assert_eq!(stats.total_attempts, 1);
    assert_eq!(stats.average_score, 50.0);
    assert_eq!(stats.pass_rate, 100.0);
}

#[tokio::test]
async fn submit_treats_null_answer_as_unattempted() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();
    let token = token_for(10, "student");

    let response = submit(
        &client,
        &app.address,
        1,
        &token,
        json!({ "answers": { "1": "A", "2": null }, "elapsed_seconds": 5 }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 50);
    let result_id = body["result_id"].as_i64().unwrap();

    let detail: Value = client
        .get(format!("{}/api/results/{}", app.address, result_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    assert_eq!(detail["correct_answers"], 1);
    assert_eq!(detail["wrong_answers"], 0);
    assert_eq!(detail["unattempted"], 1);
    assert_eq!(detail["answers"][1]["user_answer"], Value::Null);
}

#[tokio::test]
async fn submit_applies_negative_marking() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, Some(0.25));
    let client = reqwest::Client::new();
    let token = token_for(10, "student");

    let response = submit(
        &client,
        &app.address,
        1,
        &token,
        json!({ "answers": { "1": "A", "2": "C" }, "elapsed_seconds": 95 }),
    )
    .await;

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["score"], 38);
    assert_eq!(body["is_passed"], false);
}

#[tokio::test]
async fn submit_to_missing_exam_is_not_found() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();
    let token = token_for(10, "student");

    let response = submit(
        &client,
        &app.address,
        404,
        &token,
        json!({ "answers": {}, "elapsed_seconds": 1 }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Exam not found");
}

#[tokio::test]
async fn submit_to_inactive_exam_is_not_found() {
    let app = spawn_app().await;
    let mut inactive = exam(3, &[("Main", &[1])], 50.0);
    inactive.is_active = false;
    app.store.put_exam(inactive).unwrap();
    app.store.put_question(question(1, "A", 1.0)).unwrap();
    let client = reqwest::Client::new();

    let response = submit(
        &client,
        &app.address,
        3,
        &token_for(10, "student"),
        json!({ "answers": { "1": "A" }, "elapsed_seconds": 1 }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn submit_rejects_negative_elapsed_time() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();

    let response = submit(
        &client,
        &app.address,
        1,
        &token_for(10, "student"),
        json!({ "answers": {}, "elapsed_seconds": -5 }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(app.store.result_count().unwrap(), 0);
}

#[tokio::test]
async fn submit_rejects_malformed_answers_with_json_error() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();

    let response = submit(
        &client,
        &app.address,
        1,
        &token_for(10, "student"),
        json!({ "answers": { "1": 5 }, "elapsed_seconds": 5 }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
    assert_eq!(app.store.result_count().unwrap(), 0);
}

#[tokio::test]
async fn second_submission_returns_first_result() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();
    let token = token_for(10, "student");

    let first: Value = submit(
        &client,
        &app.address,
        1,
        &token,
        json!({ "answers": { "1": "A", "2": "B" }, "elapsed_seconds": 30 }),
    )
    .await
    .json()
    .await
    .unwrap();

    let second = submit(
        &client,
        &app.address,
        1,
        &token,
        json!({ "answers": { "1": "C" }, "elapsed_seconds": 40 }),
    )
    .await;

    assert_eq!(second.status().as_u16(), 200);
    let second: Value = second.json().await.unwrap();
    assert_eq!(second["result_id"], first["result_id"]);
    assert_eq!(second["score"], 100);
    assert_eq!(second["duplicate"], true);

    assert_eq!(app.store.result_count().unwrap(), 1);
    assert_eq!(app.store.exam_stats(1).unwrap().unwrap().total_attempts, 1);
    assert_eq!(app.store.question_stats(1).unwrap().unwrap().total_attempts, 1);
}

#[tokio::test]
async fn retakes_allowed_up_to_configured_limit() {
    let app = spawn_app_with(test_config(2)).await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();
    let token = token_for(10, "student");
    let body = json!({ "answers": { "1": "A" }, "elapsed_seconds": 30 });

    let statuses = [
        submit(&client, &app.address, 1, &token, body.clone()).await.status().as_u16(),
        submit(&client, &app.address, 1, &token, body.clone()).await.status().as_u16(),
        submit(&client, &app.address, 1, &token, body.clone()).await.status().as_u16(),
    ];

    assert_eq!(statuses, [201, 201, 200]);
    assert_eq!(app.store.result_count().unwrap(), 2);
    assert_eq!(app.store.exam_stats(1).unwrap().unwrap().total_attempts, 2);
}

#[tokio::test]
async fn result_detail_for_owner() {
    let app = spawn_app().await;
    app.store
        .put_exam(exam(5, &[("Algebra", &[1, 2]), ("Geometry", &[3])], 50.0))
        .unwrap();
    for (id, answer) in [(1, "A"), (2, "B"), (3, "C")] {
        app.store.put_question(question(id, answer, 1.0)).unwrap();
    }
    let client = reqwest::Client::new();
    let token = token_for(10, "student");

    let submitted: Value = submit(
        &client,
        &app.address,
        5,
        &token,
        json!({ "answers": { "1": "A", "3": "D" }, "elapsed_seconds": 60 }),
    )
    .await
    .json()
    .await
    .unwrap();
    let result_id = submitted["result_id"].as_i64().unwrap();

    let response = client
        .get(format!("{}/api/results/{}", app.address, result_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let detail: Value = response.json().await.unwrap();

    assert_eq!(detail["exam_title"], "Exam 5");
    assert_eq!(detail["total_questions"], 3);
    assert_eq!(detail["correct_answers"], 1);
    assert_eq!(detail["wrong_answers"], 1);
    assert_eq!(detail["unattempted"], 1);

    let answers = detail["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 3);
    assert_eq!(answers[0]["question_id"], 1);
    assert_eq!(answers[0]["content"], "<p>Question 1</p>");
    assert_eq!(answers[0]["analysis"], "Because A is right");
    assert_eq!(answers[1]["user_answer"], Value::Null);

    let sections = detail["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0]["name"], "Algebra");
    assert_eq!(sections[0]["total"], 2);
    assert_eq!(sections[0]["correct"], 1);
    assert_eq!(sections[0]["score"], 50);
    assert_eq!(sections[1]["total"], 1);
    assert_eq!(sections[1]["score"], 0);
}

#[tokio::test]
async fn result_detail_forbidden_for_other_user_but_not_admin() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();

    let submitted: Value = submit(
        &client,
        &app.address,
        1,
        &token_for(10, "student"),
        json!({ "answers": { "1": "A" }, "elapsed_seconds": 5 }),
    )
    .await
    .json()
    .await
    .unwrap();
    let url = format!("{}/api/results/{}", app.address, submitted["result_id"]);

    let stranger = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", token_for(11, "student")))
        .send()
        .await
        .unwrap();
    assert_eq!(stranger.status().as_u16(), 403);

    let admin = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", token_for(1, "admin")))
        .send()
        .await
        .unwrap();
    assert_eq!(admin.status().as_u16(), 200);
}

#[tokio::test]
async fn result_detail_missing_is_not_found() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/results/999", app.address))
        .header("Authorization", format!("Bearer {}", token_for(10, "student")))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn list_my_results_only_shows_own() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();
    let body = json!({ "answers": { "1": "A" }, "elapsed_seconds": 5 });

    submit(&client, &app.address, 1, &token_for(10, "student"), body.clone()).await;
    submit(&client, &app.address, 1, &token_for(11, "student"), body).await;

    let mine: Vec<Value> = client
        .get(format!("{}/api/results", app.address))
        .header("Authorization", format!("Bearer {}", token_for(10, "student")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["exam_id"], 1);
    assert_eq!(mine[0]["attempt_no"], 1);
}

#[tokio::test]
async fn leaderboard_orders_by_score_then_time() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();

    let sheets = [
        (10, json!({ "1": "A" }), 50),
        (11, json!({ "1": "A", "2": "B" }), 90),
        (12, json!({ "1": "A", "2": "B" }), 60),
    ];
    for (user, answers, elapsed) in sheets {
        submit(
            &client,
            &app.address,
            1,
            &token_for(user, "student"),
            json!({ "answers": answers, "elapsed_seconds": elapsed }),
        )
        .await;
    }

    let board: Vec<Value> = client
        .get(format!("{}/api/exams/1/leaderboard?limit=2", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["user_id"], 12);
    assert_eq!(board[1]["user_id"], 11);
}

#[tokio::test]
async fn exam_statistics_requires_admin() {
    let app = spawn_app().await;
    seed_two_question_exam(&app.store, 1, None);
    let client = reqwest::Client::new();

    submit(
        &client,
        &app.address,
        1,
        &token_for(10, "student"),
        json!({ "answers": { "1": "A" }, "elapsed_seconds": 5 }),
    )
    .await;

    let url = format!("{}/api/admin/exams/1/statistics", app.address);

    let as_student = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", token_for(10, "student")))
        .send()
        .await
        .unwrap();
    assert_eq!(as_student.status().as_u16(), 403);

    let as_admin = client
        .get(&url)
        .header("Authorization", format!("Bearer {}", token_for(1, "admin")))
        .send()
        .await
        .unwrap();
    assert_eq!(as_admin.status().as_u16(), 200);

    let stats: Value = as_admin.json().await.unwrap();
    assert_eq!(stats["total_attempts"], 1);
    assert_eq!(stats["questions"][0]["question_id"], 1);
    assert_eq!(stats["questions"][0]["correct_attempts"], 1);
    assert_eq!(stats["questions"][1]["total_attempts"], 1);
    assert_eq!(stats["questions"][1]["accuracy_rate"], 0.0);
}
