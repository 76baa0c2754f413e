use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use oracle::{OracleError, ScriptedOracle};
use serde_json::{json, Value};
use server::config::AppConfig;
use server::{create_router, state::AppState};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_with(oracle: ScriptedOracle) -> (TestServer, Arc<ScriptedOracle>) {
    let oracle = Arc::new(oracle);
    let state = AppState::with_oracle(oracle.clone(), AppConfig::default())
        .expect("Failed to build state");
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");
    (server, oracle)
}

/// Answers by the first rule whose needle occurs in the prompt, else `maybe`.
fn rules(rules: Vec<(&'static str, &'static str)>) -> ScriptedOracle {
    ScriptedOracle::responder(move |prompt| {
        let answer = rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle))
            .map(|(_, answer)| *answer)
            .unwrap_or("maybe");
        Ok(answer.to_string())
    })
}

fn winning_game24() -> ScriptedOracle {
    rules(vec![
        (
            "Current numbers: [4, 9, 10, 13]",
            r#"{"steps":[{"expression":"13 - 9","result":4}]}"#,
        ),
        (
            "Current numbers: [4, 4, 10]",
            r#"{"steps":[{"expression":"10 - 4","result":6}]}"#,
        ),
        (
            "Current numbers: [4, 6]",
            r#"{"steps":[{"expression":"4 * 6","result":24}]}"#,
        ),
    ])
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
}

async fn server_with_mock_oracle(mock: &MockServer) -> TestServer {
    let mut config = AppConfig::default();
    config.oracle.base_url = format!("{}/v1", mock.uri());
    config.oracle.api_key = "test-key".to_string();
    config.oracle.max_retries = 0;
    config.oracle.timeout_secs = 5;

    let state = AppState::from_config(config).expect("Failed to build state");
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let (server, _oracle) = server_with(ScriptedOracle::queue(Vec::<String>::new()));

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert!(body["message"].is_string());
        assert!(body["version"].is_string());
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let (server, _oracle) = server_with(ScriptedOracle::queue(Vec::<String>::new()));

        let response = server.get("/api/openapi.json").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["paths"]["/api/game24"].is_object());
        assert!(body["paths"]["/api/runs/stream"].is_object());
        assert!(body["components"]["schemas"]["RunResult"].is_object());
    }
}

mod runs {
    use super::*;

    #[tokio::test]
    async fn test_game24_success() {
        let (server, oracle) = server_with(winning_game24());

        let response = server
            .post("/api/game24")
            .json(&json!({ "numbers": [4, 9, 10, 13] }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["partial"], false);
        assert_eq!(body["steps"], 3);
        assert_eq!(body["solution"], "13 - 9 = 4\n10 - 4 = 6\n4 * 6 = 24");
        assert_eq!(oracle.call_count(), 5);
    }

    #[tokio::test]
    async fn test_game24_wrong_count_is_rejected() {
        let (server, oracle) = server_with(winning_game24());

        let response = server
            .post("/api/game24")
            .json(&json!({ "numbers": [1, 2, 3] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("array of 4 numbers"));
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (server, _oracle) = server_with(winning_game24());

        let response = server
            .post("/api/runs")
            .text("{not json")
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_unknown_task_is_rejected() {
        let (server, oracle) = server_with(winning_game24());

        let response = server
            .post("/api/runs")
            .json(&json!({ "task": "crosswords", "payload": {} }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "unknown_task");
        assert!(body["message"].as_str().unwrap().contains("crosswords"));
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generic_run_request() {
        let (server, _oracle) = server_with(winning_game24());

        let response = server
            .post("/api/runs")
            .json(&json!({ "task": "game24", "payload": { "numbers": [4, 9, 10, 13] } }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_creative_writing_success() {
        let oracle = ScriptedOracle::responder(|prompt| {
            if prompt.contains("Propose up to 5") {
                Ok(r#"{"steps":[{"content":"The keeper climbed the stairs."}]}"#.to_string())
            } else {
                Ok("sure".to_string())
            }
        });
        let (server, _oracle) = server_with(oracle);

        let response = server
            .post("/api/creative-writing")
            .json(&json!({
                "sentences": [
                    "The lighthouse went dark.",
                    "A bell rang twice.",
                    "Nobody answered the door.",
                    "The tide kept rising."
                ]
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["steps"], 3);
    }

    #[tokio::test]
    async fn test_creative_writing_blank_sentence_is_rejected() {
        let (server, _oracle) = server_with(winning_game24());

        let response = server
            .post("/api/creative-writing")
            .json(&json!({ "sentences": ["a", "b", "  ", "d"] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oracle_failure_is_bad_gateway() {
        let oracle = ScriptedOracle::results([Err(OracleError::Timeout(Duration::from_secs(30)))]);
        let (server, _oracle) = server_with(oracle);

        let response = server
            .post("/api/game24")
            .json(&json!({ "numbers": [4, 9, 10, 13] }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["error"], "oracle_error");
    }
}

mod stream {
    use super::*;

    #[tokio::test]
    async fn test_stream_emits_events_until_solution() {
        let (server, _oracle) = server_with(winning_game24());

        let response = server
            .post("/api/runs/stream")
            .json(&json!({ "task": "game24", "payload": { "numbers": [4, 9, 10, 13] } }))
            .await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("event: init"));
        assert!(body.contains("id: 0"));
        assert!(body.contains("event: round"));
        assert!(body.contains("event: solution"));
        assert!(body.contains(r#""success":true"#));
        assert!(!body.contains("event: error"));
    }

    #[tokio::test]
    async fn test_stream_rejects_invalid_payload() {
        let (server, oracle) = server_with(winning_game24());

        let response = server
            .post("/api/runs/stream")
            .json(&json!({ "task": "game24", "payload": { "numbers": [4, 9] } }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stream_reports_oracle_failure_as_error_event() {
        let oracle = ScriptedOracle::results([Err(OracleError::Timeout(Duration::from_secs(30)))]);
        let (server, _oracle) = server_with(oracle);

        let response = server
            .post("/api/runs/stream")
            .json(&json!({ "task": "game24", "payload": { "numbers": [4, 9, 10, 13] } }))
            .await;

        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("event: error"));
        assert!(!body.contains("event: solution"));
    }
}

mod openai_oracle {
    use super::*;

    #[tokio::test]
    async fn test_game24_against_mock_openai() {
        let mock = MockServer::start().await;

        for (needle, answer) in [
            (
                "Current numbers: [4, 9, 10, 13]",
                r#"{"steps":[{"expression":"13 - 9","result":4}]}"#,
            ),
            (
                "Current numbers: [4, 4, 10]",
                r#"{"steps":[{"expression":"10 - 4","result":6}]}"#,
            ),
            (
                "Current numbers: [4, 6]",
                r#"{"steps":[{"expression":"4 * 6","result":24}]}"#,
            ),
        ] {
            Mock::given(method("POST"))
                .and(path("/v1/chat/completions"))
                .and(body_string_contains(needle))
                .respond_with(ResponseTemplate::new(200).set_body_json(completion(answer)))
                .mount(&mock)
                .await;
        }
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("sure")))
            .with_priority(10)
            .mount(&mock)
            .await;

        let server = server_with_mock_oracle(&mock).await;

        let response = server
            .post("/api/game24")
            .json(&json!({ "numbers": [4, 9, 10, 13] }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["steps"], 3);
    }

    #[tokio::test]
    async fn test_upstream_error_is_bad_gateway() {
        let mock = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .expect(1)
            .mount(&mock)
            .await;

        let server = server_with_mock_oracle(&mock).await;

        let response = server
            .post("/api/game24")
            .json(&json!({ "numbers": [4, 9, 10, 13] }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["error"], "oracle_error");
        assert_eq!(body["message"], "Oracle request failed with status 500");
        assert!(!body["message"].as_str().unwrap().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_null_completion_does_not_abort_run() {
        let mock = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    {
                        "message": { "role": "assistant", "content": null },
                        "finish_reason": "length"
                    }
                ]
            })))
            .mount(&mock)
            .await;

        let server = server_with_mock_oracle(&mock).await;

        let response = server
            .post("/api/game24")
            .json(&json!({ "numbers": [4, 9, 10, 13] }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["solution"], "No solution found within budget");
    }
}
