//! Orchestrator：单个请求的完整生命周期
//!
//! 流程：生成执行 id -> 重置两个会话 -> 世界快照 -> 渲染共享 system prompt ->
//! 规划 -> 逐步委派 Worker -> 聚合回复。规划失败对本次请求致命，回复固定致歉语；
//! 首个失败步骤短路循环并把其消息原样作为回复。每次阶段迁移都写一次审计日志，
//! 写失败就地捕获告警，不影响编排。

use std::sync::Arc;

use uuid::Uuid;

use crate::actions;
use crate::agent::{Planner, StepWorker};
use crate::audit::{ExecutionLog, Stage};
use crate::config::AppConfig;
use crate::core::AgentError;
use crate::llm::LlmClient;
use crate::world::{InventoryResult, ScanResult, WorldInterface};

/// 基础设施故障时的固定回复，细节只进日志
pub const APOLOGY_REPLY: &str = "Sorry, I encountered an error processing your request.";
/// 全部步骤成功时的固定回复
pub const COMPLETION_REPLY: &str = "Task completed successfully!";

const EMPTY_MARKER: &str = "- (empty)";

/// 把世界快照渲染为 Planner 与 Worker 共享的 system prompt。
/// 零条目的分组渲染为显式空标记，绝不出现空映射字面量。
pub fn render_snapshot_prompt(
    scan: &ScanResult,
    inventory: &InventoryResult,
    scan_radius: u32,
) -> String {
    let surroundings = if scan.blocks.is_empty() {
        EMPTY_MARKER.to_string()
    } else {
        scan.blocks
            .iter()
            .map(|(block, count)| format!("- {block}: {count}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let inventory_list = if inventory.inventory.is_empty() {
        EMPTY_MARKER.to_string()
    } else {
        inventory
            .inventory
            .iter()
            .map(|(item, count)| format!("- {item}: {count}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "# Minecraft Bot Status\n\n\
         ## Surroundings ({scan_radius} block radius):\n{surroundings}\n\n\
         ## Inventory:\n{inventory_list}\n\n\
         You are a Minecraft bot assistant. You can help players by:\n\
         - Moving towards them\n\
         - Following them\n\
         - Collecting blocks\n\
         - Crafting items\n\
         - Managing inventory\n\
         - Equipping/dropping items\n\
         - Placing blocks\n\n\
         You should always be aware of your surroundings and inventory to make informed decisions."
    )
}

/// 请求编排器：拥有 Planner、Worker、世界句柄与执行日志
pub struct Orchestrator {
    planner: Planner,
    worker: StepWorker,
    world: Arc<dyn WorldInterface>,
    log: ExecutionLog,
    scan_radius: u32,
}

impl Orchestrator {
    /// 构建编排器；动作目录三视图在此交叉校验，不一致即拒绝启动
    pub fn new(
        llm: Arc<dyn LlmClient>,
        world: Arc<dyn WorldInterface>,
        cfg: &AppConfig,
    ) -> Result<Self, AgentError> {
        actions::validate_catalog()?;
        Ok(Self {
            planner: Planner::new(llm.clone(), cfg.llm.planning_model.clone()),
            worker: StepWorker::new(llm, cfg.llm.worker_model.clone(), world.clone()),
            world,
            log: ExecutionLog::new(cfg.log.dir.clone()),
            scan_radius: cfg.world.scan_radius,
        })
    }

    /// 审计检查点：写失败仅告警，绝不向上传播
    async fn checkpoint(&mut self, id: Uuid, stage: Stage, payload: serde_json::Value) {
        if let Err(e) = self.log.append(id, stage, payload).await {
            tracing::warn!(execution_id = %id, error = %e, "audit log write failed");
        }
    }

    /// 处理一条用户消息，返回用户可见回复。&mut self 保证请求串行：
    /// 世界是单一共享可变资源，上一请求未到终态前不接受下一条。
    pub async fn process_command(&mut self, user_message: &str) -> String {
        let execution_id = Uuid::new_v4();
        tracing::info!(execution_id = %execution_id, "processing command");
        self.checkpoint(
            execution_id,
            Stage::RequestReceived,
            serde_json::json!({ "user_message": user_message }),
        )
        .await;

        // 每个请求从干净的会话开始
        self.planner.reset();
        self.worker.reset();

        let scan = self.world.scan_area().await;
        let inventory = self.world.list_inventory().await;
        if !scan.success || !inventory.success {
            tracing::error!(execution_id = %execution_id, "world snapshot failed");
            self.checkpoint(
                execution_id,
                Stage::Aborted,
                serde_json::json!({ "error": "world snapshot failed" }),
            )
            .await;
            return APOLOGY_REPLY.to_string();
        }
        let snapshot_prompt = render_snapshot_prompt(&scan, &inventory, self.scan_radius);
        self.planner.update_snapshot(&snapshot_prompt);
        self.worker.update_snapshot(&snapshot_prompt);
        self.checkpoint(
            execution_id,
            Stage::Snapshot,
            serde_json::json!({ "blocks": scan.blocks, "inventory": inventory.inventory }),
        )
        .await;

        let plan = match self.planner.generate_plan(user_message).await {
            Ok(plan) => plan,
            Err(e) => {
                tracing::error!(execution_id = %execution_id, error = %e, "planning failed");
                self.checkpoint(
                    execution_id,
                    Stage::PlanFailed,
                    serde_json::json!({ "error": e.to_string() }),
                )
                .await;
                return APOLOGY_REPLY.to_string();
            }
        };
        self.checkpoint(
            execution_id,
            Stage::PlanGenerated,
            serde_json::json!({ "plan": plan }),
        )
        .await;

        for (index, step) in plan.steps.iter().enumerate() {
            tracing::info!(
                execution_id = %execution_id,
                step = index,
                action = %step.action,
                "executing step"
            );
            self.checkpoint(
                execution_id,
                Stage::StepStarted,
                serde_json::json!({
                    "index": index,
                    "action": step.action,
                    "details": step.details,
                    "rationale": step.rationale,
                }),
            )
            .await;

            let result = match self.worker.run_step(user_message, step).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(execution_id = %execution_id, error = %e, "worker call failed");
                    self.checkpoint(
                        execution_id,
                        Stage::Aborted,
                        serde_json::json!({ "index": index, "error": e.to_string() }),
                    )
                    .await;
                    return APOLOGY_REPLY.to_string();
                }
            };

            if !result.success {
                // 快速失败：剩余步骤全部放弃，步骤消息原样作为回复
                self.checkpoint(
                    execution_id,
                    Stage::StepFailed,
                    serde_json::json!({
                        "index": index,
                        "action": step.action,
                        "message": result.message,
                    }),
                )
                .await;
                return result.message;
            }
            self.checkpoint(
                execution_id,
                Stage::StepCompleted,
                serde_json::json!({
                    "index": index,
                    "action": step.action,
                    "message": result.message,
                }),
            )
            .await;
        }

        self.checkpoint(
            execution_id,
            Stage::Completed,
            serde_json::json!({ "reply": COMPLETION_REPLY }),
        )
        .await;
        COMPLETION_REPLY.to_string()
    }
}
