//! 世界接口抽象
//!
//! 外部协作方的查询 / 变更原语：快照（方块普查、物品栏普查）+ 每个注册动作一个调用。
//! 领域内失败（玩家不存在、物品不足）以 `success: false` 在带内返回，从不抛错。

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 单次动作调用的结果
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub message: String,
}

impl ToolResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// 方块扫描结果（名称 -> 数量）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanResult {
    pub success: bool,
    pub blocks: BTreeMap<String, u32>,
}

/// 物品栏清点结果（名称 -> 数量；空物品栏即空映射）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InventoryResult {
    pub success: bool,
    pub inventory: BTreeMap<String, u32>,
}

/// 模拟世界接口：快照查询 + 注册动作对应的原语
#[async_trait]
pub trait WorldInterface: Send + Sync {
    /// 扫描周边方块并按名称计数
    async fn scan_area(&self) -> ScanResult;

    /// 清点物品栏
    async fn list_inventory(&self) -> InventoryResult;

    async fn go_to_player(&self, player_name: &str) -> ToolResult;

    async fn follow_player(&self, player_name: &str) -> ToolResult;

    async fn collect_block(&self, block_name: &str, amount: u32) -> ToolResult;

    async fn craft_item(&self, item_name: &str, amount: u32) -> ToolResult;

    async fn equip_item(&self, item_name: &str, destination: &str) -> ToolResult;

    /// amount 为 None 时丢弃整组
    async fn toss_item(&self, item_name: &str, amount: Option<u32>) -> ToolResult;

    async fn place_block(&self, block_name: &str) -> ToolResult;
}
