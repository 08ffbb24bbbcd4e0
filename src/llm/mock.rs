//! Mock LLM 客户端（测试用，无需服务）
//!
//! 按脚本依次弹出预置回复：流水线一次请求会发起一次规划调用加每步一次 Worker
//! 调用，脚本耗尽即报错。同时记录每次收到的请求，供测试断言上下文内容。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::actions::ToolDefinition;
use crate::agent::Message;
use crate::llm::{ChatMessage, LlmClient, ToolCall, ToolCallFunction};

/// Mock 收到的一次请求快照
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub with_tools: bool,
    pub with_format: bool,
}

/// 脚本化 Mock 客户端
#[derive(Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<ChatMessage>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条纯文本回复
    pub fn push_text(&self, content: impl Into<String>) {
        self.responses.lock().unwrap().push_back(ChatMessage {
            content: content.into(),
            tool_calls: Vec::new(),
        });
    }

    /// 追加一条带工具调用的回复
    pub fn push_tool_calls(&self, calls: Vec<(&str, Value)>) {
        let tool_calls = calls
            .into_iter()
            .map(|(name, arguments)| ToolCall {
                function: ToolCallFunction {
                    name: name.to_string(),
                    arguments,
                },
            })
            .collect();
        self.responses.lock().unwrap().push_back(ChatMessage {
            content: String::new(),
            tool_calls,
        });
    }

    /// 已收到的全部请求（按时间顺序）
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        format: Option<&Value>,
    ) -> Result<ChatMessage, String> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            with_tools: tools.is_some(),
            with_format: format.is_some(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| "mock script exhausted".to_string())
    }
}
