//! 会话状态：角色标注的消息序列
//!
//! Planner 与 Worker 各持有一个独立的 ConversationState，每个顶层请求开始时重置。
//! 第 0 条永远是 system 消息；世界快照刷新时整体替换第 0 条，不动后面的消息。

use serde::{Deserialize, Serialize};

/// 消息角色（与 Ollama chat API 一致；Tool 用于回写工具执行结果）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// 单条消息
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
        }
    }
}

/// 会话状态：messages[0] 固定为 system 槽位
#[derive(Clone, Debug)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::system(String::new())],
        }
    }

    /// 整体替换 system 消息，保留其后的全部消息
    pub fn set_system(&mut self, content: impl Into<String>) {
        self.messages[0] = Message::system(content);
    }

    /// 重置为仅含当前 system 消息的初始状态（跨请求不泄漏历史）
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
