//! Agent endpoint tests with a scripted model.

mod common;

use axum::http::StatusCode;
use recruiter_core::agent::ToolCall;
use recruiter_core::{Config, LlmConfig, LlmError};
use serde_json::json;

use common::{fixtures, TestConfig, TestFixture};

#[tokio::test]
async fn test_brief_runs_tool_loop() {
    let fixture = TestFixture::new().await;
    fixture
        .searcher
        .add_page("Rust", fixtures::page("rust", 5, None))
        .await;
    fixture
        .llm
        .push_tool_calls(vec![
            ToolCall {
                id: "call-1".into(),
                name: "filter_builder".into(),
                input: json!({"filter_type": "skills", "skills": ["Rust"]}),
            },
            ToolCall {
                id: "call-2".into(),
                name: "people_search".into(),
                input: json!({"filters": {"column": "skills", "type": "(.)", "value": "Rust"}}),
            },
        ])
        .await;
    fixture.llm.push_text("Found 5 Rust engineers in Berlin.").await;

    let response = fixture
        .post(
            "/api/v1/agent/brief",
            json!({"brief": "Senior Rust engineers in Berlin"}),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "reply", json!("Found 5 Rust engineers in Berlin."));
    assert_json_path!(response.body, "turns", json!(2));
    assert_eq!(
        response.body["tool_calls"],
        json!([
            {"name": "filter_builder", "is_error": false},
            {"name": "people_search", "is_error": false}
        ])
    );
    assert_eq!(response.body["usage"]["input_tokens"], 200);
    assert_eq!(fixture.searcher.search_count().await, 1);

    let requests = fixture.llm.recorded_requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].messages.len(), 3);
}

#[tokio::test]
async fn test_tool_failures_are_fed_back_to_model() {
    let fixture = TestFixture::new().await;
    fixture
        .llm
        .push_tool_calls(vec![ToolCall {
            id: "call-1".into(),
            name: "send_email".into(),
            input: json!({}),
        }])
        .await;
    fixture.llm.push_text("That tool does not exist.").await;

    let response = fixture
        .post("/api/v1/agent/brief", json!({"brief": "Email the candidates"}))
        .await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["tool_calls"][0]["is_error"], true);
}

#[tokio::test]
async fn test_empty_brief_is_bad_request() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post("/api/v1/agent/brief", json!({"brief": "   "}))
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(fixture.llm.recorded_requests().await.is_empty());
}

#[tokio::test]
async fn test_turn_limit_is_bad_gateway() {
    let fixture = TestFixture::with_config(TestConfig {
        config: Config {
            llm: Some(LlmConfig {
                max_turns: 1,
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    })
    .await;
    fixture
        .llm
        .push_tool_calls(vec![ToolCall {
            id: "call-1".into(),
            name: "filter_builder".into(),
            input: json!({"filter_type": "skills", "skills": ["Go"]}),
        }])
        .await;

    let response = fixture
        .post("/api/v1/agent/brief", json!({"brief": "Go engineers"}))
        .await;

    assert_status!(response, StatusCode::BAD_GATEWAY);
    assert!(response.body["error"].as_str().unwrap().contains("1"));
}

#[tokio::test]
async fn test_model_error_is_bad_gateway() {
    let fixture = TestFixture::new().await;
    fixture
        .llm
        .set_next_error(LlmError::Api {
            status: 529,
            message: "overloaded".into(),
        })
        .await;

    let response = fixture
        .post("/api/v1/agent/brief", json!({"brief": "Data engineers"}))
        .await;

    assert_status!(response, StatusCode::BAD_GATEWAY);
    assert!(response.body["error"]
        .as_str()
        .unwrap()
        .contains("overloaded"));
}

#[tokio::test]
async fn test_without_llm_is_unavailable() {
    let fixture = TestFixture::with_config(TestConfig::without_backends()).await;

    let response = fixture
        .post("/api/v1/agent/brief", json!({"brief": "Data engineers"}))
        .await;

    assert_status!(response, StatusCode::SERVICE_UNAVAILABLE);
}
