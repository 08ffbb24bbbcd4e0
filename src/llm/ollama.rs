//! Ollama chat API 客户端
//!
//! 调用本地或远端 Ollama 的 `/api/chat`（非流式）。Planner 传 format（结构化输出
//! Schema），Worker 传 tools（工具声明），两者互斥使用但接口上都是可选项。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::ToolDefinition;
use crate::agent::Message;
use crate::llm::{ChatMessage, LlmClient};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a Value>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Ollama 客户端：持有 reqwest Client 与服务地址
pub struct OllamaClient {
    client: reqwest::Client,
    host: String,
}

impl OllamaClient {
    /// host 形如 `http://127.0.0.1:11434`；request_timeout_secs 仅作用于传输层
    pub fn new(host: &str, request_timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        format: Option<&Value>,
    ) -> Result<ChatMessage, String> {
        let request = ChatRequest {
            model,
            messages,
            stream: false,
            tools,
            format,
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.host))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("ollama request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("ollama returned {status}: {body}"));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed ollama response: {e}"))?;
        Ok(parsed.message)
    }
}
