//! Agent 层：会话状态、Planner 与单步 Worker

pub mod conversation;
pub mod planner;
pub mod worker;

pub use conversation::{ConversationState, Message, Role};
pub use planner::{plan_schema, Plan, Planner, Reasoning, Step};
pub use worker::StepWorker;
