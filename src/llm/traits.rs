//! 推理服务客户端抽象
//!
//! 单次 chat 完成调用：可携带工具声明（tool-calling）或结构化输出 Schema（format），
//! 两者分别服务于 Worker 与 Planner。后端（Ollama / Mock）统一实现 LlmClient。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::ToolDefinition;
use crate::agent::Message;

/// 模型发起的一次工具调用；arguments 可能是对象，也可能是 JSON 编码的字符串
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    pub function: ToolCallFunction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    pub arguments: Value,
}

/// 助手回复：文本内容 + 零或多个工具调用
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

/// LLM 客户端 trait：一次 chat 完成；错误以字符串返回，由上层转为 AgentError
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        format: Option<&Value>,
    ) -> Result<ChatMessage, String>;
}
