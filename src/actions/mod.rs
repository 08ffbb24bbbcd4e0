//! 注册动作目录
//!
//! 目录是封闭的：`ActionName` 为带标签联合，未注册的名字在解析期就被拒绝，
//! 调度时不存在「运行时才发现不认识」的路径。三个视图保持同步：
//! 分发表（本文件的 dispatch match）、工具声明（definitions）、目录文本
//! （catalog_text），启动时由 `validate_catalog` 交叉校验。

pub mod args;
pub mod definitions;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::AgentError;
use crate::world::{ToolResult, WorldInterface};
use args::{
    CollectBlockArgs, CraftItemArgs, EquipItemArgs, FollowPlayerArgs, GoToPlayerArgs,
    PlaceBlockArgs, TossItemArgs,
};
pub use definitions::{catalog_text, definition, definitions, ToolDefinition};

/// 注册动作名（序列化为工具声明中的 camelCase 名称）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionName {
    #[serde(rename = "goToPlayer")]
    GoToPlayer,
    #[serde(rename = "followPlayer")]
    FollowPlayer,
    #[serde(rename = "collectBlock")]
    CollectBlock,
    #[serde(rename = "craftItem")]
    CraftItem,
    #[serde(rename = "equipItem")]
    EquipItem,
    #[serde(rename = "tossItem")]
    TossItem,
    #[serde(rename = "placeBlock")]
    PlaceBlock,
}

impl ActionName {
    pub const ALL: &'static [ActionName] = &[
        ActionName::GoToPlayer,
        ActionName::FollowPlayer,
        ActionName::CollectBlock,
        ActionName::CraftItem,
        ActionName::EquipItem,
        ActionName::TossItem,
        ActionName::PlaceBlock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::GoToPlayer => "goToPlayer",
            ActionName::FollowPlayer => "followPlayer",
            ActionName::CollectBlock => "collectBlock",
            ActionName::CraftItem => "craftItem",
            ActionName::EquipItem => "equipItem",
            ActionName::TossItem => "tossItem",
            ActionName::PlaceBlock => "placeBlock",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or(())
    }
}

const PARSE_FAILURE: &str = "Failed to parse tool arguments";

fn parse_args<T: serde::de::DeserializeOwned>(raw: &Value) -> Result<T, ToolResult> {
    serde_json::from_value(raw.clone()).map_err(|_| ToolResult::fail(PARSE_FAILURE))
}

/// 把一次工具调用分发到世界接口
///
/// 参数解析失败与动作自身的失败都在带内返回（success: false），绝不 panic；
/// 由调用方（Worker）决定失败后的短路策略。
pub async fn dispatch(world: &dyn WorldInterface, action: ActionName, raw_args: &Value) -> ToolResult {
    match action {
        ActionName::GoToPlayer => match parse_args::<GoToPlayerArgs>(raw_args) {
            Ok(args) => world.go_to_player(&args.player_name).await,
            Err(fail) => fail,
        },
        ActionName::FollowPlayer => match parse_args::<FollowPlayerArgs>(raw_args) {
            Ok(args) => world.follow_player(&args.player_name).await,
            Err(fail) => fail,
        },
        ActionName::CollectBlock => match parse_args::<CollectBlockArgs>(raw_args) {
            Ok(args) => {
                if args.amount < 1 {
                    return ToolResult::fail("Amount must be a positive integer");
                }
                world.collect_block(&args.block_name, args.amount).await
            }
            Err(fail) => fail,
        },
        ActionName::CraftItem => match parse_args::<CraftItemArgs>(raw_args) {
            Ok(args) => {
                world
                    .craft_item(&args.item_name, args.amount.unwrap_or(1))
                    .await
            }
            Err(fail) => fail,
        },
        ActionName::EquipItem => match parse_args::<EquipItemArgs>(raw_args) {
            Ok(args) => world.equip_item(&args.item_name, &args.destination).await,
            Err(fail) => fail,
        },
        ActionName::TossItem => match parse_args::<TossItemArgs>(raw_args) {
            Ok(args) => world.toss_item(&args.item_name, args.amount).await,
            Err(fail) => fail,
        },
        ActionName::PlaceBlock => match parse_args::<PlaceBlockArgs>(raw_args) {
            Ok(args) => world.place_block(&args.block_name).await,
            Err(fail) => fail,
        },
    }
}

/// 启动期校验三视图一致性：声明 ↔ 枚举往返、每个声明都带对象型参数 Schema、
/// 目录文本覆盖全部名称。不一致即配置缺陷，直接拒绝启动。
pub fn validate_catalog() -> Result<(), AgentError> {
    let defs = definitions();
    if defs.len() != ActionName::ALL.len() {
        return Err(AgentError::CatalogMismatch(format!(
            "{} declarations for {} registered actions",
            defs.len(),
            ActionName::ALL.len()
        )));
    }
    for (action, def) in ActionName::ALL.iter().zip(&defs) {
        let declared = &def.function.name;
        let parsed = ActionName::from_str(declared).map_err(|_| {
            AgentError::CatalogMismatch(format!("declared tool {declared} has no dispatch entry"))
        })?;
        if parsed != *action {
            return Err(AgentError::CatalogMismatch(format!(
                "declaration order mismatch: {declared} vs {action}"
            )));
        }
        let is_object = def.function.parameters.get("type").and_then(Value::as_str)
            == Some("object");
        if !is_object {
            return Err(AgentError::CatalogMismatch(format!(
                "{declared} parameter schema is not an object"
            )));
        }
    }
    let text = catalog_text();
    for action in ActionName::ALL {
        if !text.contains(action.as_str()) {
            return Err(AgentError::CatalogMismatch(format!(
                "{action} missing from catalog text"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SimWorld;

    #[test]
    fn test_name_round_trip() {
        for action in ActionName::ALL {
            assert_eq!(ActionName::from_str(action.as_str()), Ok(*action));
        }
        assert!(ActionName::from_str("digStraightDown").is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        for action in ActionName::ALL {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, serde_json::json!(action.as_str()));
        }
    }

    #[test]
    fn test_catalog_validates() {
        validate_catalog().expect("catalog views in sync");
    }

    #[tokio::test]
    async fn test_dispatch_bad_args_fails_in_band() {
        let world = SimWorld::new();
        let result = dispatch(
            &world,
            ActionName::CollectBlock,
            &serde_json::json!({"blockName": "oak_log"}),
        )
        .await;
        assert!(!result.success);
        assert_eq!(result.message, "Failed to parse tool arguments");
    }

    #[tokio::test]
    async fn test_dispatch_zero_amount_rejected() {
        let world = SimWorld::new().with_blocks(&[("oak_log", 4)]);
        let result = dispatch(
            &world,
            ActionName::CollectBlock,
            &serde_json::json!({"blockName": "oak_log", "amount": 0}),
        )
        .await;
        assert!(!result.success);
        assert_eq!(result.message, "Amount must be a positive integer");
    }

    #[tokio::test]
    async fn test_dispatch_reaches_world() {
        let world = SimWorld::new().with_blocks(&[("oak_log", 4)]);
        let result = dispatch(
            &world,
            ActionName::CollectBlock,
            &serde_json::json!({"blockName": "oak_log", "amount": 3}),
        )
        .await;
        assert!(result.success);
        assert_eq!(world.journal(), vec!["collectBlock oak_log x3"]);
    }
}
