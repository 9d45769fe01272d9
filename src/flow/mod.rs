//! Client for the hosted flow's run endpoint.

use crate::config::{AssistantConfig, Tweaks};
use crate::error::{AssistantError, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use serde_json::Value;

pub mod extract;

const STATUS_BODY_LIMIT: usize = 512;

/// Anything that can turn one user message into one display string.
#[async_trait]
pub trait FlowService: Send + Sync {
    async fn send(&self, message: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
pub struct FlowRequest<'a> {
    pub input_value: &'a str,
    pub output_type: &'static str,
    pub input_type: &'static str,
    #[serde(skip_serializing_if = "has_no_tweaks")]
    pub tweaks: &'a Tweaks,
}

fn has_no_tweaks(tweaks: &&Tweaks) -> bool {
    tweaks.is_empty()
}

impl<'a> FlowRequest<'a> {
    pub fn chat(message: &'a str, tweaks: &'a Tweaks) -> Self {
        Self {
            input_value: message,
            output_type: "chat",
            input_type: "chat",
            tweaks,
        }
    }
}

pub struct FlowClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
    tweaks: Tweaks,
}

impl FlowClient {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| AssistantError::Configuration(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint_url()?,
            token: config.application_token.clone(),
            tweaks: config.tweaks.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POSTs the message and returns the decoded reply object.
    pub async fn run(&self, message: &str) -> Result<Value> {
        let request = FlowRequest::chat(message, &self.tweaks);
        let request_error = |source| AssistantError::Request {
            url: self.endpoint.to_string(),
            source,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AssistantError::Status {
                status,
                body: body.chars().take(STATUS_BODY_LIMIT).collect(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        let reply: Value = serde_json::from_str(&body)
            .map_err(|err| AssistantError::InvalidReply(format!("undecodable body: {err}")))?;
        if !reply.is_object() {
            return Err(AssistantError::InvalidReply(format!(
                "expected an object, got {}",
                json_kind(&reply)
            )));
        }
        Ok(reply)
    }
}

#[async_trait]
impl FlowService for FlowClient {
    async fn send(&self, message: &str) -> Result<String> {
        tracing::debug!(endpoint = %self.endpoint, chars = message.chars().count(), "sending flow request");
        let reply = self.run(message).await?;
        if extract::reply_text(&reply).is_none() {
            tracing::warn!("flow reply carried no text, using fallback");
        }
        let text = extract::reply_text_or_fallback(&reply);
        tracing::debug!(chars = text.chars().count(), "flow replied");
        Ok(text)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
