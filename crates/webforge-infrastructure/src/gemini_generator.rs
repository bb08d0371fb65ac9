//! GeminiGenerator - REST implementation of the generation collaborator.
//!
//! Calls `generateContent` in JSON response mode. Prior exchanges for the
//! session are read from the session-history log and sent as conversation
//! contents; the new exchange is appended after the reply parses.

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use webforge_core::config::GenerationConfig;
use webforge_core::conversation::{Turn, TurnAuthor};
use webforge_core::credential::SecretToken;
use webforge_core::generation::{GenerationOutput, Generator, SessionHistory};

const API_KEY_HEADER: &str = "x-goog-api-key";

const SYSTEM_INSTRUCTION: &str = "\
You are a helpful and friendly web developer. Always respond in valid JSON format:
{
  \"html\": \"\",
  \"css\": \"\",
  \"js\": \"\",
  \"explanation\": \"\"
}

Strictly follow these rules:
- Always use Tailwind CSS classes for styling. Avoid raw CSS unless necessary.
- Use GSAP (GreenSock Animation Platform) for animations in the `js` section.
- JS code must be suitable for embedding in a <script> tag. Never use `import`, `require`, or module syntax.
- If the user gives a casual input (like 'hi' or 'thanks'), return the JSON with only the 'explanation'.
- If the user asks to update only part of the code (e.g. just JS), keep the rest unchanged.
- The explanation should reflect only the current change or response, concise and relevant to the request.
- Keep the other sections (html, css, js) as-is unless explicitly asked to change them.
- Use Shoelace web components whenever needed.
";

/// Generator backed by the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    config: GenerationConfig,
    history: Arc<dyn SessionHistory>,
}

impl GeminiGenerator {
    pub fn new(
        config: GenerationConfig,
        history: Arc<dyn SessionHistory>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            config,
            history,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, history: &[Turn], input: &str) -> GenerateContentRequest {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content::text(role_for(turn.author), &turn.text))
            .collect();
        contents.push(Content::text("user", input));

        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text("system", SYSTEM_INSTRUCTION)),
            generation_config: GenerationSettings {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: "application/json".to_string(),
            },
        }
    }

    async fn send_request(
        &self,
        body: &GenerateContentRequest,
        credential: &SecretToken,
    ) -> anyhow::Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, credential.expose())
            .json(body)
            .send()
            .await
            .context("Gemini API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(
        &self,
        input: &str,
        session_id: &str,
        credential: &SecretToken,
    ) -> anyhow::Result<GenerationOutput> {
        let history = self
            .history
            .load(session_id)
            .await
            .with_context(|| format!("Failed to load history for session {}", session_id))?;

        tracing::debug!(
            "[GeminiGenerator] session={} model={} history_turns={}",
            session_id,
            self.config.model,
            history.len()
        );

        let request = self.build_request(&history, input);
        let raw = self.send_request(&request, credential).await?;
        let output = parse_generation_output(&raw)?;

        self.history
            .append(session_id, &[Turn::user(input), Turn::assistant(raw)])
            .await
            .with_context(|| format!("Failed to append history for session {}", session_id))?;

        Ok(output)
    }
}

fn role_for(author: TurnAuthor) -> &'static str {
    match author {
        TurnAuthor::User => "user",
        TurnAuthor::Assistant => "model",
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationSettings,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// The JSON object the model is instructed to return.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ArtifactPayload {
    html: String,
    css: String,
    js: String,
    explanation: String,
}

fn extract_text_response(response: GenerateContentResponse) -> anyhow::Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| anyhow!("Gemini API returned no text in the response candidates"))
}

fn map_http_error(status: StatusCode, body: &str) -> anyhow::Error {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    anyhow!("Gemini API returned {}: {}", status.as_u16(), message)
}

/// Parses the model's JSON reply. Missing keys become empty strings, which
/// the merge treats as "unchanged".
fn parse_generation_output(raw: &str) -> anyhow::Result<GenerationOutput> {
    let payload: ArtifactPayload = serde_json::from_str(strip_code_fence(raw))
        .context("Model reply is not a valid JSON object")?;

    Ok(GenerationOutput {
        markup: Some(payload.html),
        styling: Some(payload.css),
        logic: Some(payload.js),
        explanation: payload.explanation,
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}
