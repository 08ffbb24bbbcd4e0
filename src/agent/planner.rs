//! Planner：把自由文本请求分解为结构化计划
//!
//! 单发调用：携带结构化输出 Schema 请求一次 chat 完成，把返回文本按 Schema 解析
//! 为 Plan。不执行工具、不改世界；Schema 违约或解析失败原样上抛给 Orchestrator，
//! 本层不重试。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::{self, ActionName};
use crate::agent::{ConversationState, Message};
use crate::core::AgentError;
use crate::llm::LlmClient;

/// 计划中的单步：动作名约束在注册目录内（解析期强制）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    pub action: ActionName,
    pub details: String,
    pub rationale: String,
}

/// 规划的思维链部分
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reasoning {
    pub analysis: String,
    pub strategy: String,
    pub considerations: Vec<String>,
}

/// 一次用户请求产出的完整计划
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plan {
    pub reasoning: Reasoning,
    pub steps: Vec<Step>,
}

/// Planner 结构化输出 Schema：reasoning 三字段必填，steps[].action 限定为目录枚举
pub fn plan_schema() -> Value {
    let action_names: Vec<&str> = ActionName::ALL.iter().map(|a| a.as_str()).collect();
    serde_json::json!({
        "type": "object",
        "properties": {
            "reasoning": {
                "type": "object",
                "properties": {
                    "analysis": {
                        "type": "string",
                        "description": "Analysis of the user's request and current game state"
                    },
                    "strategy": {
                        "type": "string",
                        "description": "Explanation of the chosen approach and why it's optimal"
                    },
                    "considerations": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Key factors considered in the planning process"
                    }
                },
                "required": ["analysis", "strategy", "considerations"],
                "description": "Chain of thought reasoning process"
            },
            "steps": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "action": {
                            "type": "string",
                            "enum": action_names,
                            "description": "The specific tool action to execute"
                        },
                        "details": {
                            "type": "string",
                            "description": "Detailed instructions including all necessary parameters for the tool execution"
                        },
                        "rationale": {
                            "type": "string",
                            "description": "Explanation of why this specific step is necessary"
                        }
                    },
                    "required": ["action", "details", "rationale"]
                },
                "description": "Sequence of steps using available tools"
            }
        },
        "required": ["reasoning", "steps"]
    })
}

/// 规划用 system prompt：角色说明 + 动作目录 + 当前世界快照
fn planning_system_prompt(snapshot_prompt: &str) -> String {
    let names: Vec<&str> = ActionName::ALL.iter().map(|a| a.as_str()).collect();
    format!(
        "You are a planning assistant for a Minecraft bot. Your job is to:\n\
         1. Analyze the user's request and current game state\n\
         2. Develop a strategy considering available resources and constraints\n\
         3. Break down user requests into a sequence of specific tool actions\n\
         4. Only use these available actions: {}\n\
         5. For each step provide:\n\
            - action: the tool name to use\n\
            - details: clear instructions with all necessary parameters\n\
            - rationale: explanation of why this step is necessary\n\n\
         Available actions and their parameters:\n{}\n\n\
         Current game state:\n{}\n\n\
         Provide output in JSON format with:\n\
         - reasoning: object containing analysis, strategy, and considerations\n\
         - steps: array of actions with details and rationale",
        names.join(", "),
        actions::catalog_text(),
        snapshot_prompt
    )
}

/// Planner：持有 LLM、规划模型名与独立的会话状态
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    model: String,
    conversation: ConversationState,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            conversation: ConversationState::new(),
        }
    }

    /// 顶层请求开始时调用：清空历史
    pub fn reset(&mut self) {
        self.conversation.reset();
    }

    /// 世界快照刷新：整体替换 system 消息（拼入目录与快照），不动后续消息
    pub fn update_snapshot(&mut self, snapshot_prompt: &str) {
        self.conversation
            .set_system(planning_system_prompt(snapshot_prompt));
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    /// 生成计划：一次结构化输出调用 + Schema 解析。失败对本次请求是致命的。
    pub async fn generate_plan(&mut self, user_message: &str) -> Result<Plan, AgentError> {
        self.conversation.push(Message::user(user_message));

        let schema = plan_schema();
        let response = self
            .llm
            .chat(&self.model, self.conversation.messages(), None, Some(&schema))
            .await
            .map_err(AgentError::Llm)?;

        let plan: Plan = serde_json::from_str(&response.content)
            .map_err(|e| AgentError::SchemaViolation(e.to_string()))?;
        Ok(plan)
    }
}
