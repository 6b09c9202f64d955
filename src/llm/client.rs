//! Claude Messages API client for the resume extraction call.
//!
//! All LLM traffic in the pipeline goes through this one client. A resume
//! upload is an interactive request, so the client works against a total
//! time budget rather than a fixed attempt count: transient faults are
//! retried only while the budget still has room for a whole further
//! attempt, and the orchestrator falls back to the rule-based record when
//! the budget runs out.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// Hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
/// A fully extracted resume record rarely passes ~2k tokens; 4k leaves
/// headroom for long work histories.
const MAX_TOKENS: u32 = 4096;
/// Near-greedy sampling; extraction wants stability, not creativity.
const TEMPERATURE: f32 = 0.1;
/// Per-attempt HTTP ceiling.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(6);
/// Total time one extraction may spend, retries and backoff included.
pub const CALL_BUDGET: Duration = Duration::from_secs(15);
/// First retry delay; doubles per retry.
const INITIAL_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("transport: {0}")]
    Transport(String),

    #[error("API rejected the call (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("model returned no usable text")]
    EmptyResponse,

    #[error("call budget of {CALL_BUDGET:?} exhausted after {attempts} attempts")]
    BudgetExhausted { attempts: u32 },
}

fn is_transient(err: &LlmError) -> bool {
    match err {
        LlmError::Transport(_) => true,
        LlmError::Api { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<Block>,
}

#[derive(Debug, Deserialize)]
struct Block {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// All text blocks concatenated; a long record occasionally arrives
    /// split across blocks.
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|b| b.kind == "text")
            .filter_map(|b| b.text.as_deref())
            .collect()
    }
}

/// Digs the human-readable message out of the API error envelope,
/// falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

/// The prompt demands bare JSON, but models still wrap replies in fences
/// or lead with a sentence; slice out the outermost object instead of
/// pattern-matching decorations.
fn isolate_json(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end >= start).then(|| &reply[start..=end])
}

pub struct LlmClient {
    http: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(ATTEMPT_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Sends one extraction prompt and parses the reply as `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let reply = self.send_with_budget(prompt, system).await?;
        let json = isolate_json(&reply).ok_or(LlmError::EmptyResponse)?;
        Ok(serde_json::from_str(json)?)
    }

    async fn send_with_budget(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let started = tokio::time::Instant::now();
        let mut backoff = INITIAL_BACKOFF;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match self.send_once(prompt, system).await {
                Ok(reply) => return Ok(reply),
                Err(e) if !is_transient(&e) => return Err(e),
                Err(e) => {
                    // Retry only if a whole further attempt still fits.
                    if started.elapsed() + backoff + ATTEMPT_TIMEOUT > CALL_BUDGET {
                        warn!(error = %e, attempts, "extraction call budget spent, giving up");
                        return Err(LlmError::BudgetExhausted { attempts });
                    }
                    warn!(error = %e, "transient fault from the model API, backing off");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }

    async fn send_once(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        let reply = parsed.text();
        if reply.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        debug!(bytes = reply.len(), "model reply received");
        Ok(reply)
    }
}
