use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::prompt_builder::PromptPair;
use super::{CallParams, Completion, LlmClient, Usage};
use crate::error::GenerationError;

/// Minimal request/response structs for OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI-compatible implementation of LlmClient.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    api_base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, api_base_url: String) -> Self {
        OpenAiClient {
            client: Client::new(),
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn chat_url(&self) -> String {
        if self.api_base_url.ends_with("/v1") {
            format!("{}/chat/completions", self.api_base_url)
        } else {
            format!("{}/v1/chat/completions", self.api_base_url)
        }
    }
}

impl LlmClient for OpenAiClient {
    fn complete(
        &self,
        prompt: &PromptPair,
        params: &CallParams,
    ) -> Result<Completion, GenerationError> {
        let req = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        log::info!("Calling OpenAI model {:?}", self.model);
        log::trace!("Prompt:\n{}", truncate(&prompt.user, 3000));

        let spinner = spinner("waiting for the model...");
        let result = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.api_key)
            .timeout(params.timeout)
            .json(&req)
            .send();
        spinner.finish_and_clear();

        let resp = result.map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let body = resp
            .text()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        let completion = parse_chat_response(&body)?;

        log::debug!(
            "Token usage: prompt={}, completion={}, cost={}",
            completion.usage.prompt_tokens,
            completion.usage.completion_tokens,
            completion.cost()
        );

        Ok(completion)
    }
}

/// Decode a chat-completion body into the first choice's text and the usage block.
fn parse_chat_response(body: &str) -> Result<Completion, GenerationError> {
    let chat_resp: ChatResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let text = chat_resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::Malformed("no choices returned".to_string()))?
        .message
        .content
        .unwrap_or_default()
        .trim()
        .to_string();

    let usage = chat_resp
        .usage
        .map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    Ok(Completion { text, usage })
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Truncate long strings for trace logging.
fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!(
            "{}...\n[truncated {} bytes]",
            &s[..idx],
            s.len() - idx
        ),
    }
}
