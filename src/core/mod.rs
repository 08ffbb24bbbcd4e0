//! 核心层：错误类型与请求编排

pub mod error;
pub mod orchestrator;

pub use error::AgentError;
pub use orchestrator::{Orchestrator, APOLOGY_REPLY, COMPLETION_REPLY};
