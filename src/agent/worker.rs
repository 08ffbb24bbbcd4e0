//! Worker：执行计划中的单步
//!
//! 为每步驱动一段限定范围的会话：把原始请求与本步的 action/details/rationale 拼成
//! 复合指令，携带完整工具目录发起一次 chat，按顺序执行返回的工具调用。
//! 未注册的名字与参数解析失败都是可恢复失败（带内返回）；步内首个失败调用
//! 短路其余调用并成为本步结果。仅推理服务不可达才返回 Err。

use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::actions::{self, ActionName};
use crate::agent::{ConversationState, Message};
use crate::core::AgentError;
use crate::llm::{LlmClient, ToolCall};
use crate::world::{ToolResult, WorldInterface};

const FALLBACK_FAILURE_MESSAGE: &str = "Tool execution failed";

/// 复合指令：重述原始请求与本步指示，保持 Worker 对全局目标的感知
fn step_instruction(user_message: &str, step: &crate::agent::Step) -> String {
    format!(
        "User's original request: \"{}\"\n\
         Current action: {}\n\
         Instructions: {}\n\
         Rationale: {}\n\n\
         Please execute this action according to the provided instructions \
         while keeping the original request in context.",
        user_message, step.action, step.details, step.rationale
    )
}

/// arguments 兼容两种形态：已解析对象，或 JSON 编码字符串
fn normalize_arguments(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(encoded) => serde_json::from_str(encoded).ok(),
        other => Some(other.clone()),
    }
}

/// 单步执行器：持有 Worker 模型、世界句柄与独立会话状态
pub struct StepWorker {
    llm: Arc<dyn LlmClient>,
    model: String,
    world: Arc<dyn WorldInterface>,
    conversation: ConversationState,
}

impl StepWorker {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        world: Arc<dyn WorldInterface>,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            world,
            conversation: ConversationState::new(),
        }
    }

    pub fn reset(&mut self) {
        self.conversation.reset();
    }

    pub fn update_snapshot(&mut self, snapshot_prompt: &str) {
        self.conversation.set_system(snapshot_prompt);
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    /// 执行一步：Ok 为本步成败（带内），Err 仅当推理服务不可达
    pub async fn run_step(
        &mut self,
        user_message: &str,
        step: &crate::agent::Step,
    ) -> Result<ToolResult, AgentError> {
        self.conversation
            .push(Message::user(step_instruction(user_message, step)));

        let definitions = actions::definitions();
        let response = self
            .llm
            .chat(
                &self.model,
                self.conversation.messages(),
                Some(&definitions),
                None,
            )
            .await
            .map_err(AgentError::Llm)?;

        if response.tool_calls.is_empty() {
            // 模型可以选择不调用工具，该步视为通过
            tracing::debug!(action = %step.action, "worker declined to call a tool");
            let message = if response.content.is_empty() {
                "No tool invoked".to_string()
            } else {
                response.content
            };
            return Ok(ToolResult::ok(message));
        }

        let mut last_message = String::new();
        for call in &response.tool_calls {
            let result = self.execute_call(call).await;
            tracing::info!(
                tool = %call.function.name,
                success = result.success,
                message = %result.message,
                "tool call executed"
            );
            if !result.success {
                return Ok(result);
            }
            last_message = result.message;
        }
        Ok(ToolResult::ok(last_message))
    }

    /// 执行单个工具调用：解析名字 -> 解析参数 -> 世界分发 -> 结果回写 tool 消息
    async fn execute_call(&mut self, call: &ToolCall) -> ToolResult {
        let name = &call.function.name;
        let Ok(action) = ActionName::from_str(name) else {
            tracing::warn!(tool = %name, "tool call names an unregistered action");
            return ToolResult::fail(format!("{name} not available"));
        };

        let Some(args) = normalize_arguments(&call.function.arguments) else {
            return ToolResult::fail("Failed to parse tool arguments");
        };

        let result = actions::dispatch(self.world.as_ref(), action, &args).await;

        // 原始结果作为 tool 消息写回会话，为后续步骤保留事实依据
        let raw = serde_json::to_string(&result)
            .unwrap_or_else(|_| r#"{"success":false}"#.to_string());
        self.conversation.push(Message::tool(raw));

        if result.message.is_empty() {
            return ToolResult {
                success: result.success,
                message: FALLBACK_FAILURE_MESSAGE.to_string(),
            };
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Step;
    use crate::llm::MockLlmClient;
    use crate::world::SimWorld;

    fn step(action: ActionName) -> Step {
        Step {
            action,
            details: "details".to_string(),
            rationale: "rationale".to_string(),
        }
    }

    fn worker_with(
        llm: Arc<MockLlmClient>,
        world: Arc<SimWorld>,
    ) -> StepWorker {
        let mut worker = StepWorker::new(llm, "worker-model", world);
        worker.update_snapshot("snapshot");
        worker
    }

    #[tokio::test]
    async fn test_unregistered_tool_is_recoverable() {
        let llm = Arc::new(MockLlmClient::new());
        llm.push_tool_calls(vec![("digStraightDown", serde_json::json!({}))]);
        let world = Arc::new(SimWorld::new());
        let mut worker = worker_with(llm, world.clone());

        let result = worker
            .run_step("dig", &step(ActionName::CollectBlock))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "digStraightDown not available");
        assert!(world.journal().is_empty());
    }

    #[tokio::test]
    async fn test_string_and_object_arguments_match() {
        for args in [
            serde_json::json!({"blockName": "oak_log", "amount": 2}),
            serde_json::json!(r#"{"blockName": "oak_log", "amount": 2}"#),
        ] {
            let llm = Arc::new(MockLlmClient::new());
            llm.push_tool_calls(vec![("collectBlock", args)]);
            let world = Arc::new(SimWorld::new().with_blocks(&[("oak_log", 5)]));
            let mut worker = worker_with(llm, world.clone());

            let result = worker
                .run_step("get wood", &step(ActionName::CollectBlock))
                .await
                .unwrap();
            assert!(result.success, "{}", result.message);
            assert_eq!(result.message, "Successfully collected 2 oak_log blocks");
            assert_eq!(world.journal(), vec!["collectBlock oak_log x2"]);
        }
    }

    #[tokio::test]
    async fn test_malformed_argument_string_is_recoverable() {
        let llm = Arc::new(MockLlmClient::new());
        llm.push_tool_calls(vec![("collectBlock", serde_json::json!("{not json"))]);
        let world = Arc::new(SimWorld::new());
        let mut worker = worker_with(llm, world.clone());

        let result = worker
            .run_step("get wood", &step(ActionName::CollectBlock))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "Failed to parse tool arguments");
        assert!(world.journal().is_empty());
    }

    #[tokio::test]
    async fn test_first_failed_call_halts_remaining_calls() {
        let llm = Arc::new(MockLlmClient::new());
        llm.push_tool_calls(vec![
            ("goToPlayer", serde_json::json!({"playerName": "Steve"})),
            ("goToPlayer", serde_json::json!({"playerName": "Nobody"})),
            ("collectBlock", serde_json::json!({"blockName": "oak_log", "amount": 1})),
        ]);
        let world = Arc::new(
            SimWorld::new()
                .with_players(&["Steve"])
                .with_blocks(&[("oak_log", 3)]),
        );
        let mut worker = worker_with(llm, world.clone());

        let result = worker
            .run_step("come here", &step(ActionName::GoToPlayer))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "Player not found");
        // 第三个调用不应被执行
        assert_eq!(
            world.journal(),
            vec!["goToPlayer Steve", "goToPlayer Nobody"]
        );
    }

    #[tokio::test]
    async fn test_declining_to_call_a_tool_passes_the_step() {
        let llm = Arc::new(MockLlmClient::new());
        llm.push_text("Nothing to do for this step.");
        let world = Arc::new(SimWorld::new());
        let mut worker = worker_with(llm.clone(), world);

        let result = worker
            .run_step("idle", &step(ActionName::FollowPlayer))
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.message, "Nothing to do for this step.");
        // Worker 调用必须带 tools、不带 format
        let requests = llm.requests();
        assert!(requests[0].with_tools);
        assert!(!requests[0].with_format);
    }

    #[tokio::test]
    async fn test_raw_result_written_back_as_tool_turn() {
        let llm = Arc::new(MockLlmClient::new());
        llm.push_tool_calls(vec![(
            "collectBlock",
            serde_json::json!({"blockName": "oak_log", "amount": 1}),
        )]);
        let world = Arc::new(SimWorld::new().with_blocks(&[("oak_log", 1)]));
        let mut worker = worker_with(llm, world);

        worker
            .run_step("get wood", &step(ActionName::CollectBlock))
            .await
            .unwrap();
        let messages = worker.conversation().messages();
        let tool_turn = messages.last().unwrap();
        assert_eq!(tool_turn.role, crate::agent::Role::Tool);
        let parsed: ToolResult = serde_json::from_str(&tool_turn.content).unwrap();
        assert!(parsed.success);
    }
}
