//! Golem - Minecraft AI 机器人核心
//!
//! 两阶段编排：Planner 把自由文本请求分解为结构化计划（动作限定在封闭目录内），
//! Worker 逐步驱动 tool-calling 会话并把调用分发到世界接口。
//!
//! 模块划分：
//! - **actions**: 注册动作目录（封闭枚举、类型化参数、三视图同步）
//! - **agent**: 会话状态、Planner、单步 Worker
//! - **audit**: 按执行 id 追加的审计日志
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型与请求编排
//! - **llm**: 推理服务客户端（Ollama / Mock）
//! - **world**: 世界接口抽象与内存模拟实现

pub mod actions;
pub mod agent;
pub mod audit;
pub mod config;
pub mod core;
pub mod llm;
pub mod world;
