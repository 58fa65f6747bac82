//! HTTP client for the AI judgment service.
//!
//! The service exposes three call shapes (text, bool, score). The
//! client maps transport and status failures onto `JudgeError` and
//! applies the bounded retry policy; nothing else about the model
//! behind the endpoint leaks into the rest of the system.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::models::JudgeConfig;
use crate::domain::ports::errors::JudgeError;
use crate::domain::ports::judge::Judge;
use crate::infrastructure::judge::retry::RetryPolicy;

pub struct HttpJudge {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

#[derive(Debug, Serialize)]
struct JudgeRequest<'a> {
    context: &'a str,
    question: &'a str,
}

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct TextResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct BoolResponse {
    verdict: bool,
}

#[derive(Debug, Deserialize)]
struct ScoreResponse {
    score: f64,
}

impl HttpJudge {
    pub fn from_config(config: &JudgeConfig) -> Result<Self, JudgeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JudgeError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            api_key: std::env::var(&config.api_key_env).ok(),
            retry: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        })
    }

    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp, JudgeError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                JudgeError::Timeout
            } else {
                JudgeError::RequestFailed(e.to_string())
            }
        })?;

        match response.status() {
            status if status.is_success() => response
                .json::<Resp>()
                .await
                .map_err(|e| JudgeError::MalformedResponse(e.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Err(JudgeError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(JudgeError::AuthFailed),
            status => Err(JudgeError::RequestFailed(format!(
                "judge returned {status}"
            ))),
        }
    }
}

#[async_trait::async_trait]
impl Judge for HttpJudge {
    async fn generate_text(&self, prompt: &str) -> Result<String, JudgeError> {
        let body = TextRequest { prompt };
        let response: TextResponse = self
            .retry
            .execute(|| self.post("/v1/generate/text", &body))
            .await?;
        Ok(response.text)
    }

    async fn generate_bool(&self, context: &str, question: &str) -> Result<bool, JudgeError> {
        let body = JudgeRequest { context, question };
        let response: BoolResponse = self
            .retry
            .execute(|| self.post("/v1/generate/bool", &body))
            .await?;
        Ok(response.verdict)
    }

    async fn generate_score(&self, context: &str, question: &str) -> Result<f64, JudgeError> {
        let body = JudgeRequest { context, question };
        let response: ScoreResponse = self
            .retry
            .execute(|| self.post("/v1/generate/score", &body))
            .await?;
        Ok(response.score)
    }
}
