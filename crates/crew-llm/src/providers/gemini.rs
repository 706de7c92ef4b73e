//! Google Gemini provider implementation
//!
//! Talks to the Generative Language REST API (`models/{model}:generateContent`).
//! See: https://ai.google.dev/api/generate-content
//!
//! Gemini has no tool-call identifiers of its own; this provider mints
//! `"{name}#{n}"` identifiers for function calls and maps tool results back to
//! function names when the conversation is sent again.

use crate::{
    CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message, Result,
    Role, StopReason, TokenUsage, ToolDefinition,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const TOOL_ID_SEPARATOR: char = '#';

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Google AI Studio API key
    pub api_key: String,

    /// Base URL of the Generative Language API
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a new config with the given API key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set request timeout in seconds
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Google Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a provider from configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Google AI API key cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with an API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.config.api_base)
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to Gemini");

        let model = request.model.clone();
        let body = build_request(request)?;

        let response = self
            .client
            .post(self.endpoint(&model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await?;
            return Err(classify_error(status, error_text, &model));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        parse_response(parsed)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GeminiTool>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
}

impl GeminiPart {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct FunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

// ============================================================================
// Conversion functions
// ============================================================================

fn build_request(request: CompletionRequest) -> Result<GenerateRequest> {
    // Tool results only carry the call id; recover the function name from the
    // assistant turn that issued the call.
    let mut call_names: HashMap<String, String> = HashMap::new();
    for message in &request.messages {
        for call in message.tool_uses() {
            call_names.insert(call.id.to_string(), call.name.to_string());
        }
    }

    // Turns must alternate, so consecutive messages of one role share a content.
    let mut contents: Vec<GeminiContent> = Vec::with_capacity(request.messages.len());
    for message in request.messages {
        let content = convert_message(message, &call_names)?;
        match contents.last_mut() {
            Some(last) if last.role == content.role => last.parts.extend(content.parts),
            _ => contents.push(content),
        }
    }

    let tools = if request.tools.is_empty() {
        Vec::new()
    } else {
        vec![GeminiTool {
            function_declarations: request.tools.iter().map(convert_tool).collect(),
        }]
    };

    Ok(GenerateRequest {
        contents,
        system_instruction: request.system.map(|system| GeminiContent {
            role: None,
            parts: vec![GeminiPart::text(system)],
        }),
        tools,
        generation_config: GenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
            stop_sequences: request.stop_sequences,
        },
    })
}

fn convert_message(message: Message, call_names: &HashMap<String, String>) -> Result<GeminiContent> {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "model",
    };

    let mut parts = Vec::with_capacity(message.content.len());
    for block in message.content {
        let part = match block {
            ContentBlock::Text { text } => GeminiPart::text(text),
            ContentBlock::ToolUse { name, input, .. } => GeminiPart {
                function_call: Some(FunctionCall { name, args: input }),
                ..GeminiPart::default()
            },
            ContentBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => {
                let name = call_names
                    .get(&tool_use_id)
                    .cloned()
                    .or_else(|| name_from_tool_id(&tool_use_id))
                    .ok_or_else(|| {
                        LLMError::InvalidRequest(format!(
                            "Tool result '{tool_use_id}' has no matching function call"
                        ))
                    })?;
                let response = if is_error {
                    json!({ "error": content })
                } else {
                    json!({ "content": content })
                };
                GeminiPart {
                    function_response: Some(FunctionResponse { name, response }),
                    ..GeminiPart::default()
                }
            }
        };
        parts.push(part);
    }

    Ok(GeminiContent {
        role: Some(role.to_string()),
        parts,
    })
}

fn convert_tool(tool: &ToolDefinition) -> FunctionDeclaration {
    FunctionDeclaration {
        name: tool.name.clone(),
        description: tool.description.clone(),
        parameters: tool.input_schema.clone(),
    }
}

fn tool_id(name: &str, index: usize) -> String {
    format!("{name}{TOOL_ID_SEPARATOR}{index}")
}

fn name_from_tool_id(id: &str) -> Option<String> {
    id.rsplit_once(TOOL_ID_SEPARATOR)
        .map(|(name, _)| name.to_string())
}

fn parse_response(response: GenerateResponse) -> Result<CompletionResponse> {
    let usage = response.usage_metadata.unwrap_or_default();

    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(LLMError::UnexpectedResponse(format!(
            "Gemini returned no answer: {reason}"
        )));
    };

    let mut blocks = Vec::new();
    let mut call_index = 0;
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(text) = part.text.filter(|t| !t.is_empty()) {
            // One answer may arrive split over several parts.
            match blocks.last_mut() {
                Some(ContentBlock::Text { text: previous }) => previous.push_str(&text),
                _ => blocks.push(ContentBlock::Text { text }),
            }
        }
        if let Some(call) = part.function_call {
            blocks.push(ContentBlock::ToolUse {
                id: tool_id(&call.name, call_index),
                name: call.name,
                input: call.args,
            });
            call_index += 1;
        }
    }

    let finish_reason = candidate.finish_reason.unwrap_or_default();
    let stop_reason = if call_index > 0 {
        StopReason::ToolUse
    } else {
        map_finish_reason(&finish_reason)
    };

    debug!(
        "Received response - finish_reason: {}, tokens: {}/{}",
        finish_reason, usage.prompt_token_count, usage.candidates_token_count
    );

    Ok(CompletionResponse {
        message: Message::new(Role::Assistant, blocks),
        stop_reason,
        usage: TokenUsage {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        },
    })
}

fn map_finish_reason(reason: &str) -> StopReason {
    match reason {
        "STOP" | "" => StopReason::EndTurn,
        "MAX_TOKENS" => StopReason::MaxTokens,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" => {
            warn!("Gemini stopped generation: {}", reason);
            StopReason::EndTurn
        }
        _ => {
            debug!("Unknown finish reason: {}", reason);
            StopReason::EndTurn
        }
    }
}

/// Gemini reports an invalid key as HTTP 400 rather than 401
fn classify_error(status: u16, body: String, model: &str) -> LLMError {
    if status == 400 && (body.contains("API_KEY_INVALID") || body.contains("API key not valid")) {
        return LLMError::AuthenticationFailed;
    }
    LLMError::from_status(status, body, model)
}
