//! Typed client for the sustainability backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::session::User;

// -- Response types matching the backend --

/// Tolerance when checking the backend's token arithmetic.
const TOKEN_EPSILON: f64 = 1e-6;

/// Result of a prompt optimization. Computed entirely by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub original_estimated_tokens: f64,
    pub optimized_estimated_tokens: f64,
    pub tokens_saved: f64,
    pub percentage_reduction: f64,
    pub estimated_energy_saved_kwh: f64,
    pub estimated_co2_saved_kg: f64,
}

/// One bar of the token comparison chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TokenBar {
    pub name: &'static str,
    pub tokens: f64,
}

impl OptimizationResult {
    /// Whether `tokens_saved` agrees with the two token estimates.
    pub fn is_consistent(&self) -> bool {
        let expected = self.original_estimated_tokens - self.optimized_estimated_tokens;
        (self.tokens_saved - expected).abs() < TOKEN_EPSILON
    }

    pub fn token_series(&self) -> [TokenBar; 2] {
        [
            TokenBar {
                name: "Original",
                tokens: self.original_estimated_tokens,
            },
            TokenBar {
                name: "Optimized",
                tokens: self.optimized_estimated_tokens,
            },
        ]
    }
}

// -- Request bodies --

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizeRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSavedRequest {
    pub email: String,
    pub co2_saved: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Remote operations the dashboard depends on.
#[allow(async_fn_in_trait)]
pub trait SustainabilityApi {
    /// `POST /prompt-optimize`
    async fn optimize_prompt(&self, request: &OptimizeRequest) -> Result<OptimizationResult, ApiError>;

    /// `POST /users/add-saved`. Only success or failure matters.
    async fn add_saved(&self, request: &AddSavedRequest) -> Result<(), ApiError>;

    /// `POST /users/login`
    async fn login(&self, request: &LoginRequest) -> Result<User, ApiError>;
}

/// `reqwest`-backed implementation. Uses the Fetch API when compiled to wasm.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    config: AppConfig,
}

impl HttpApi {
    pub fn new(config: AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::Response, ApiError> {
        let url = self.config.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("POST {} returned {}", url, status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.post(path, body)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl SustainabilityApi for HttpApi {
    async fn optimize_prompt(&self, request: &OptimizeRequest) -> Result<OptimizationResult, ApiError> {
        self.post_json("/prompt-optimize", request).await
    }

    async fn add_saved(&self, request: &AddSavedRequest) -> Result<(), ApiError> {
        self.post("/users/add-saved", request).await.map(|_| ())
    }

    async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        self.post_json("/users/login", request).await
    }
}
