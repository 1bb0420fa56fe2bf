// ABOUTME: HTTP integration tests for POST /generate against a stub model endpoint
// ABOUTME: Covers the outbound request, history bounds, and every generation failure mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use helpers::axum_test::AxumTestRequest;
use helpers::stubs::{ModelReply, ModelStub};
use serde_json::{json, Value};
use wodx::models::{DailyWorkout, WorkoutSection, WorkoutType};

fn history(len: i64) -> Vec<DailyWorkout> {
    (1..=len)
        .map(|i| {
            let mut w = common::workout_on(common::day_offset(i - len - 1));
            w.main_workout = WorkoutSection::new(format!("Marker {i}"), "Deadlift 5x5");
            w
        })
        .collect()
}

#[tokio::test]
async fn test_generate_returns_workout_dated_today() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::workout(&common::generated_workout_json());
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let response = AxumTestRequest::post("/generate")
        .json(&json!({"history": []}))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 200);
    let workout: DailyWorkout = response.json();
    assert_eq!(workout.date, common::today());
    assert_eq!(workout.kind, WorkoutType::Workout);
    assert_eq!(workout.main_workout.title, "Fran");
    assert_eq!(
        workout.cooldown.exercises.as_deref(),
        Some(&["Bike".to_owned(), "Couch stretch".to_owned()][..])
    );

    // Generation alone stores nothing
    let records: Vec<DailyWorkout> = AxumTestRequest::get("/records")
        .send(common::app(&resources))
        .await
        .json();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_request_carries_persona_parameters_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::workout(&common::generated_workout_json());
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    for len in [0, 3, 7] {
        let sent = history(len);
        let response = AxumTestRequest::post("/api/generate-workout")
            .json(&json!({ "history": sent }))
            .send(common::app(&resources))
            .await;
        assert_eq!(response.status(), 200);

        let request = stub.requests().pop().unwrap();
        assert_eq!(request["model"], "gpt-4");
        assert_eq!(request["temperature"], 1.0);
        assert_eq!(request["max_tokens"], 1500);
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(
            request["messages"][0]["content"],
            "You are an expert crossfit coach."
        );

        let prompt = request["messages"][1]["content"].as_str().unwrap();
        let embedded = serde_json::to_string(&sent).unwrap();
        assert!(prompt.contains(&embedded), "history of {len} not embedded");
        assert!(prompt.trim_end().ends_with("Today's workout:"));
    }
    assert_eq!(stub.calls(), 3);
}

#[tokio::test]
async fn test_missing_history_defaults_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::workout(&common::generated_workout_json());
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let response = AxumTestRequest::post("/generate")
        .json(&json!({}))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 200);
    let prompt = stub.requests()[0]["messages"][1]["content"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(prompt.contains("[]"));
}

#[tokio::test]
async fn test_history_over_seven_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::workout(&common::generated_workout_json());
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let response = AxumTestRequest::post("/generate")
        .json(&json!({ "history": history(8) }))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_history_is_forwarded_as_sent() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::workout(&common::generated_workout_json());
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let history = r#"[{"id":7,"date":"2024-06-09","type":"workout","warmup":{"title":"W","description":"d","duration":null},"preWorkout":{"title":"P","description":"d"},"mainWorkout":{"title":"M","description":"d","exercises":["Row"]},"cooldown":{"title":"C","description":"d"},"notes":null}]"#;
    let response = AxumTestRequest::post("/generate")
        .raw_json(&format!(r#"{{"history":{history}}}"#))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 200);
    let prompt = stub.requests()[0]["messages"][1]["content"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(prompt.contains(history));
}

#[tokio::test]
async fn test_malformed_history_entry_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::workout(&common::generated_workout_json());
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let mut entry = serde_json::to_value(common::workout_on(common::day_offset(-1))).unwrap();
    entry.as_object_mut().unwrap().remove("mainWorkout");
    let response = AxumTestRequest::post("/generate")
        .json(&json!({ "history": [entry] }))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().contains("mainWorkout"));
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_upstream_failure_is_500_with_message() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::new(ModelReply::Failure(
        429,
        json!({"error": {"message": "Rate limit reached for gpt-4", "type": "requests"}})
            .to_string(),
    ));
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let response = AxumTestRequest::post("/generate")
        .json(&json!({"history": []}))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert_eq!(body["error"], "Rate limit reached for gpt-4");
    assert!(body.get("date").is_none());
}

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    let dir = tempfile::tempdir().unwrap();
    // Nothing listens on the discard port
    let resources =
        common::file_resources(dir.path(), common::llm_config("http://127.0.0.1:9", true));

    let response = AxumTestRequest::post("/generate")
        .json(&json!({"history": []}))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to generate workout"));
}

#[tokio::test]
async fn test_non_json_completion_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::new(ModelReply::Content(
        "Sure! Here is a great workout for today.".to_owned(),
    ));
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let response = AxumTestRequest::post("/generate")
        .json(&json!({"history": []}))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "MALFORMED_GENERATION");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Failed to parse workout JSON from model"));
}

#[tokio::test]
async fn test_fenced_completion_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let fenced = format!("```json\n{}\n```", common::generated_workout_json());
    let stub = ModelStub::new(ModelReply::Content(fenced));
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let response = AxumTestRequest::post("/generate")
        .json(&json!({"history": []}))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_schema_violation_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let mut reply = common::generated_workout_json();
    reply.as_object_mut().unwrap().remove("cooldown");
    let stub = ModelStub::workout(&reply);
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let response = AxumTestRequest::post("/generate")
        .json(&json!({"history": []}))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "SCHEMA_VALIDATION");
    assert!(body["error"].as_str().unwrap().contains("cooldown"));
}

#[tokio::test]
async fn test_missing_credential_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::workout(&common::generated_workout_json());
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, false));

    let response = AxumTestRequest::post("/generate")
        .json(&json!({"history": []}))
        .send(common::app(&resources))
        .await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "CONFIG_MISSING");
    assert_eq!(body["error"], "Missing OpenAI API key.");
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn test_generate_then_store_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let stub = ModelStub::workout(&common::generated_workout_json());
    let base = stub.start().await;
    let resources = common::file_resources(dir.path(), common::llm_config(&base, true));

    let empty: Vec<DailyWorkout> = AxumTestRequest::get("/records")
        .send(common::app(&resources))
        .await
        .json();
    assert!(empty.is_empty());

    let generated: DailyWorkout = AxumTestRequest::post("/generate")
        .json(&json!({ "history": empty }))
        .send(common::app(&resources))
        .await
        .json();

    let stored = AxumTestRequest::post("/records")
        .json(&generated)
        .send(common::app(&resources))
        .await;
    assert_eq!(stored.status(), 201);

    let records: Vec<DailyWorkout> = AxumTestRequest::get("/records")
        .send(common::app(&resources))
        .await
        .json();
    assert_eq!(records, vec![generated]);
    assert_eq!(records[0].date, common::today());
}
