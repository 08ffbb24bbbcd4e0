//! Agent 错误类型
//!
//! 只有基础设施类故障（LLM 不可达、计划 Schema 违约、日志写入失败等）走 Err，
//! 并且只在 Orchestrator 边界被捕获一次；领域内失败（玩家不存在、物品不足）
//! 一律以 `ToolResult { success: false, .. }` 返回，绝不抛出。

use thiserror::Error;

/// 编排过程中的基础设施错误（领域失败不在此列）
#[derive(Error, Debug)]
pub enum AgentError {
    /// Planner 输出不满足结构化 Schema（JSON 解析失败或动作名不在目录内）
    #[error("Plan schema violation: {0}")]
    SchemaViolation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Log write failed: {0}")]
    LogWrite(String),

    #[error("Config error: {0}")]
    Config(String),

    /// 动作目录三视图（分发表 / 工具声明 / 目录文本）不一致，属启动期配置缺陷
    #[error("Action catalog mismatch: {0}")]
    CatalogMismatch(String),
}
