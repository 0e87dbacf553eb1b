//! Typed HTTP client for the gateway API
//!
//! Used by the `gateway-cli` binary. Keeps the bearer token and nothing
//! else; session ids are supplied by the caller on every request.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::api::models::{
    DetailedHealthResponse, HealthResponse, LoginResponse, OrchestrateRequest, RunListQuery,
    RunListResponse, RunResponse, SignupResponse,
};
use crate::api::ErrorResponse;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Client-side failures
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error body
    #[error("{status} {code}: {message}")]
    Api {
        status: StatusCode,
        code: String,
        message: String,
    },

    #[error("This command needs a token; run `login` first or pass --token")]
    MissingToken,
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Gateway API client
#[derive(Debug, Clone)]
pub struct GatewayClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl GatewayClient {
    /// Create a client; orchestration can take minutes so the timeout is generous
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(600)).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(req.bearer_auth(token))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        Err(match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => ClientError::Api {
                status,
                code: body.code,
                message: body.message,
            },
            Err(_) => ClientError::Api {
                status,
                code: "HTTP_ERROR".to_string(),
                message: text,
            },
        })
    }

    pub async fn signup(&self, username: &str, password: &str) -> ClientResult<SignupResponse> {
        let response = self
            .http
            .post(self.url("/signup"))
            .json(&Credentials { username, password })
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let response = self
            .http
            .post(self.url("/login"))
            .json(&Credentials { username, password })
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn orchestrate(&self, request: &OrchestrateRequest) -> ClientResult<RunResponse> {
        let response = self
            .authorized(self.http.post(self.url("/orchestrate")))?
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn runs(&self, query: &RunListQuery) -> ClientResult<RunListResponse> {
        let response = self
            .authorized(self.http.get(self.url("/runs")))?
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn run(&self, run_id: &str) -> ClientResult<RunResponse> {
        let response = self
            .authorized(self.http.get(self.url(&format!("/runs/{}", run_id))))?
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn health(&self) -> ClientResult<HealthResponse> {
        let response = self.http.get(self.url("/health")).send().await?;
        Self::decode(response).await
    }

    /// Detailed health; a 503 still carries a readable body
    pub async fn health_detailed(&self) -> ClientResult<DetailedHealthResponse> {
        let response = self.http.get(self.url("/health/detailed")).send().await?;
        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(response.json().await?);
        }
        Self::decode(response).await
    }
}
