//! HTTP client tests against a wiremock mock server

use ecoprompt::api::{AddSavedRequest, HttpApi, LoginRequest, OptimizeRequest, SustainabilityApi};
use ecoprompt::config::AppConfig;
use ecoprompt::error::ApiError;

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn client(server: &MockServer) -> HttpApi {
    HttpApi::new(AppConfig::from_values(Some(&server.uri()), None))
}

fn optimize_request() -> OptimizeRequest {
    OptimizeRequest {
        prompt: "Please kindly explain recursion".to_string(),
    }
}

#[tokio::test]
async fn test_optimize_prompt_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prompt-optimize"))
        .and(body_json(json!({ "prompt": "Please kindly explain recursion" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "originalPrompt": "Please kindly explain recursion",
            "optimizedPrompt": "Explain recursion",
            "originalEstimatedTokens": 8.5,
            "optimizedEstimatedTokens": 4,
            "tokensSaved": 4.5,
            "percentageReduction": 52.9,
            "estimatedEnergySavedKwh": 0.0003,
            "estimatedCo2SavedKg": 0.00012
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .optimize_prompt(&optimize_request())
        .await
        .unwrap();

    assert_eq!(result.optimized_prompt, "Explain recursion");
    assert_eq!(result.original_estimated_tokens, 8.5);
    assert_eq!(result.optimized_estimated_tokens, 4.0);
    assert!(result.is_consistent());
}

#[tokio::test]
async fn test_optimize_prompt_server_error_keeps_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prompt-optimize"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model unavailable"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .optimize_prompt(&optimize_request())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            body: "model unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn test_optimize_prompt_malformed_body_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prompt-optimize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "originalPrompt": "a",
            "optimizedPrompt": "b"
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .optimize_prompt(&optimize_request())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_add_saved_accepts_empty_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/add-saved"))
        .and(body_json(json!({ "email": "jane@example.com", "co2Saved": 0.00012 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = AddSavedRequest {
        email: "jane@example.com".to_string(),
        co2_saved: 0.00012,
    };
    client(&mock_server).add_saved(&request).await.unwrap();
}

#[tokio::test]
async fn test_add_saved_ignores_non_json_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/add-saved"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let request = AddSavedRequest {
        email: "jane@example.com".to_string(),
        co2_saved: 0.5,
    };
    assert!(client(&mock_server).add_saved(&request).await.is_ok());
}

#[tokio::test]
async fn test_add_saved_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/add-saved"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "no such user" })))
        .mount(&mock_server)
        .await;

    let request = AddSavedRequest {
        email: "ghost@example.com".to_string(),
        co2_saved: 0.5,
    };
    let err = client(&mock_server).add_saved(&request).await.unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("no such user"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_returns_user_profile() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_json(json!({ "email": "jane@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "jane@example.com",
            "name": "Jane",
            "totalCo2Saved": 1.25
        })))
        .mount(&mock_server)
        .await;

    let request = LoginRequest {
        email: "jane@example.com".to_string(),
        password: "hunter2".to_string(),
    };
    let user = client(&mock_server).login(&request).await.unwrap();

    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.display_name(), "Jane");
    assert_eq!(user.profile["totalCo2Saved"], json!(1.25));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 1.
    let api = HttpApi::new(AppConfig::from_values(Some("http://127.0.0.1:1"), None));

    let err = api.optimize_prompt(&optimize_request()).await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
}
