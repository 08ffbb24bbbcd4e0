//! 内存模拟世界（演示与测试用）
//!
//! 维护周边方块计数、物品栏、在线玩家与调用流水；不做寻路与体素几何（非目标），
//! 各动作的成败语义与消息文案对齐真实世界端的行为。

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::world::{InventoryResult, ScanResult, ToolResult, WorldInterface};

/// 固定合成表：产物 -> (原料, 消耗数, 产出数)
const RECIPES: &[(&str, &str, u32, u32)] = &[
    ("oak_planks", "oak_log", 1, 4),
    ("stick", "oak_planks", 2, 4),
    ("crafting_table", "oak_planks", 4, 1),
    ("torch", "stick", 1, 4),
];

#[derive(Default)]
struct WorldState {
    blocks: BTreeMap<String, u32>,
    inventory: BTreeMap<String, u32>,
    players: Vec<String>,
    /// 动作调用流水，测试用来断言执行顺序
    journal: Vec<String>,
}

/// 内存世界：Mutex 保护内部状态，接口方法取 &self
#[derive(Default)]
pub struct SimWorld {
    state: Mutex<WorldState>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(self, blocks: &[(&str, u32)]) -> Self {
        {
            let mut s = self.state.lock().unwrap();
            for (name, count) in blocks {
                s.blocks.insert((*name).to_string(), *count);
            }
        }
        self
    }

    pub fn with_inventory(self, items: &[(&str, u32)]) -> Self {
        {
            let mut s = self.state.lock().unwrap();
            for (name, count) in items {
                s.inventory.insert((*name).to_string(), *count);
            }
        }
        self
    }

    pub fn with_players(self, players: &[&str]) -> Self {
        {
            let mut s = self.state.lock().unwrap();
            s.players = players.iter().map(|p| (*p).to_string()).collect();
        }
        self
    }

    /// 已执行动作的流水（按调用顺序）
    pub fn journal(&self) -> Vec<String> {
        self.state.lock().unwrap().journal.clone()
    }

    fn record(state: &mut WorldState, entry: String) {
        state.journal.push(entry);
    }
}

#[async_trait]
impl WorldInterface for SimWorld {
    async fn scan_area(&self) -> ScanResult {
        let s = self.state.lock().unwrap();
        ScanResult {
            success: true,
            blocks: s.blocks.clone(),
        }
    }

    async fn list_inventory(&self) -> InventoryResult {
        let s = self.state.lock().unwrap();
        InventoryResult {
            success: true,
            inventory: s.inventory.clone(),
        }
    }

    async fn go_to_player(&self, player_name: &str) -> ToolResult {
        let mut s = self.state.lock().unwrap();
        Self::record(&mut s, format!("goToPlayer {player_name}"));
        if !s.players.iter().any(|p| p == player_name) {
            return ToolResult::fail("Player not found");
        }
        ToolResult::ok(format!("Moving to player {player_name}"))
    }

    async fn follow_player(&self, player_name: &str) -> ToolResult {
        let mut s = self.state.lock().unwrap();
        Self::record(&mut s, format!("followPlayer {player_name}"));
        if !s.players.iter().any(|p| p == player_name) {
            return ToolResult::fail("Player not found");
        }
        ToolResult::ok(format!("Following player {player_name}"))
    }

    async fn collect_block(&self, block_name: &str, amount: u32) -> ToolResult {
        let mut s = self.state.lock().unwrap();
        Self::record(&mut s, format!("collectBlock {block_name} x{amount}"));
        let available = s.blocks.get(block_name).copied().unwrap_or(0);
        if available == 0 {
            return ToolResult::fail(format!("No {block_name} blocks found nearby."));
        }
        let collected = amount.min(available);
        if collected == available {
            s.blocks.remove(block_name);
        } else {
            s.blocks.insert(block_name.to_string(), available - collected);
        }
        *s.inventory.entry(block_name.to_string()).or_insert(0) += collected;
        if collected < amount {
            return ToolResult::ok(format!(
                "Collected {collected} blocks. No more {block_name} blocks found nearby."
            ));
        }
        ToolResult::ok(format!(
            "Successfully collected {collected} {block_name} blocks"
        ))
    }

    async fn craft_item(&self, item_name: &str, amount: u32) -> ToolResult {
        let mut s = self.state.lock().unwrap();
        Self::record(&mut s, format!("craftItem {item_name} x{amount}"));
        let Some((_, input, consumed, produced)) =
            RECIPES.iter().find(|(out, _, _, _)| *out == item_name)
        else {
            return ToolResult::fail(format!("I don't know how to craft {item_name}"));
        };
        let need = consumed * amount;
        let have = s.inventory.get(*input).copied().unwrap_or(0);
        if have < need {
            return ToolResult::fail(format!(
                "Failed to craft: not enough {input} ({have}/{need})"
            ));
        }
        if have == need {
            s.inventory.remove(*input);
        } else {
            s.inventory.insert((*input).to_string(), have - need);
        }
        *s.inventory.entry(item_name.to_string()).or_insert(0) += produced * amount;
        ToolResult::ok(format!("Crafted {amount} x {item_name}"))
    }

    async fn equip_item(&self, item_name: &str, destination: &str) -> ToolResult {
        let mut s = self.state.lock().unwrap();
        Self::record(&mut s, format!("equipItem {item_name} -> {destination}"));
        if !s.inventory.contains_key(item_name) {
            return ToolResult::fail(format!("I don't have {item_name}"));
        }
        ToolResult::ok(format!("Equipped {item_name} to {destination}"))
    }

    async fn toss_item(&self, item_name: &str, amount: Option<u32>) -> ToolResult {
        let mut s = self.state.lock().unwrap();
        Self::record(&mut s, format!("tossItem {item_name}"));
        let have = s.inventory.get(item_name).copied().unwrap_or(0);
        if have == 0 {
            return ToolResult::fail(format!("I don't have {item_name}"));
        }
        match amount {
            Some(qty) => {
                let tossed = qty.min(have);
                if tossed == have {
                    s.inventory.remove(item_name);
                } else {
                    s.inventory.insert(item_name.to_string(), have - tossed);
                }
                ToolResult::ok(format!("Tossed {tossed} x {item_name}"))
            }
            None => {
                s.inventory.remove(item_name);
                ToolResult::ok(format!("Tossed all {item_name}"))
            }
        }
    }

    async fn place_block(&self, block_name: &str) -> ToolResult {
        let mut s = self.state.lock().unwrap();
        Self::record(&mut s, format!("placeBlock {block_name}"));
        let have = s.inventory.get(block_name).copied().unwrap_or(0);
        if have == 0 {
            return ToolResult::fail(format!("Don't have any {block_name} to place"));
        }
        if have == 1 {
            s.inventory.remove(block_name);
        } else {
            s.inventory.insert(block_name.to_string(), have - 1);
        }
        *s.blocks.entry(block_name.to_string()).or_insert(0) += 1;
        ToolResult::ok(format!("Successfully placed {block_name} in front of me"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_moves_blocks_into_inventory() {
        let world = SimWorld::new().with_blocks(&[("oak_log", 5)]);
        let result = world.collect_block("oak_log", 3).await;
        assert!(result.success);
        assert_eq!(result.message, "Successfully collected 3 oak_log blocks");

        let inv = world.list_inventory().await;
        assert_eq!(inv.inventory.get("oak_log"), Some(&3));
        let scan = world.scan_area().await;
        assert_eq!(scan.blocks.get("oak_log"), Some(&2));
    }

    #[tokio::test]
    async fn test_collect_partial_when_supply_runs_out() {
        let world = SimWorld::new().with_blocks(&[("oak_log", 2)]);
        let result = world.collect_block("oak_log", 5).await;
        assert!(result.success);
        assert!(result.message.starts_with("Collected 2 blocks."));
    }

    #[tokio::test]
    async fn test_craft_consumes_ingredients() {
        let world = SimWorld::new().with_inventory(&[("oak_log", 2)]);
        let result = world.craft_item("oak_planks", 2).await;
        assert!(result.success, "{}", result.message);

        let inv = world.list_inventory().await;
        assert_eq!(inv.inventory.get("oak_planks"), Some(&8));
        assert_eq!(inv.inventory.get("oak_log"), None);
    }

    #[tokio::test]
    async fn test_craft_unknown_recipe() {
        let world = SimWorld::new();
        let result = world.craft_item("beacon", 1).await;
        assert!(!result.success);
        assert_eq!(result.message, "I don't know how to craft beacon");
    }

    #[tokio::test]
    async fn test_player_not_found_is_in_band() {
        let world = SimWorld::new().with_players(&["Steve"]);
        assert!(world.go_to_player("Steve").await.success);
        let missing = world.follow_player("Alex").await;
        assert!(!missing.success);
        assert_eq!(missing.message, "Player not found");
    }

    #[tokio::test]
    async fn test_toss_without_amount_drops_whole_stack() {
        let world = SimWorld::new().with_inventory(&[("dirt", 7)]);
        let result = world.toss_item("dirt", None).await;
        assert!(result.success);
        assert_eq!(result.message, "Tossed all dirt");
        assert!(world.list_inventory().await.inventory.is_empty());
    }
}
