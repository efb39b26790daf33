//! Gemini client implementing the kreport collaborator traits.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::runtime::Runtime;

use kreport::{Error, ExtractRequest, GenerateRequest, ReportGenerator, Result, TextExtractor};

/// Default model for extraction and generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Which side of the contract a call serves.
#[derive(Clone, Copy)]
enum Call {
    Extract,
    Generate,
}

impl Call {
    fn error(self, message: String) -> Error {
        match self {
            Call::Extract => Error::Extraction(message),
            Call::Generate => Error::Generation(message),
        }
    }
}

/// Blocking Gemini client backed by its own runtime.
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: Client,
    runtime: Runtime,
}

impl GeminiClient {
    /// Create a client for `model`.
    pub fn new(api_key: &str, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(Error::Validation(
                "GEMINI_API_KEY가 설정되지 않았습니다.".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| Error::Other(format!("HTTP client: {}", e)))?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            api_key,
            model: model.into(),
            client,
            runtime,
        })
    }

    /// Model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn call(&self, body: Value, call: Call) -> Result<String> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);
        log::debug!("POST {}", url);

        self.runtime.block_on(async {
            let resp = self
                .client
                .post(&url)
                .header("content-type", "application/json")
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| call.error(e.to_string()))?;

            let status = resp.status();
            if !status.is_success() {
                let text = resp.text().await.unwrap_or_default();
                return Err(call.error(api_error_message(status.as_u16(), &text)));
            }

            let json: Value = resp.json().await.map_err(|e| call.error(e.to_string()))?;
            Ok(response_text(&json))
        })
    }
}

impl TextExtractor for GeminiClient {
    fn extract(&self, request: &ExtractRequest) -> Result<String> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": request.mime_type(), "data": request.data } },
                    { "text": request.prompt }
                ]
            }]
        });
        self.call(body, Call::Extract)
    }
}

impl ReportGenerator for GeminiClient {
    fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": request.system_instruction() }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.user_prompt() }] }]
        });
        self.call(body, Call::Generate)
    }
}

/// Concatenated text parts of the first candidate.
fn response_text(json: &Value) -> String {
    json["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|c| c["content"]["parts"].as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Readable message from an error response body.
fn api_error_message(status: u16, body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    format!("HTTP {}: {}", status, message)
}
