//! LLM 层：推理服务客户端抽象与实现（Ollama / Mock）

pub mod mock;
pub mod ollama;
pub mod traits;

pub use mock::{MockLlmClient, RecordedRequest};
pub use ollama::OllamaClient;
pub use traits::{ChatMessage, LlmClient, ToolCall, ToolCallFunction};
