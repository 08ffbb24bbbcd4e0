//! 各动作的类型化参数
//!
//! JSON 键为 camelCase（与工具声明一致）；schemars 从文档注释生成参数描述，
//! 保证「分发表入参」与「LLM 看到的 Schema」同源。

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GoToPlayerArgs {
    /// Name of the player to move to
    pub player_name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FollowPlayerArgs {
    /// Name of the player to follow
    pub player_name: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CollectBlockArgs {
    /// Exact name of the block to collect (e.g., oak_log, not wood)
    pub block_name: String,
    /// Number of blocks to collect (positive integer)
    pub amount: u32,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CraftItemArgs {
    /// Name of the item to craft (e.g., stick, oak_planks)
    pub item_name: String,
    /// Number of items to craft (default: 1)
    pub amount: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EquipItemArgs {
    /// Name of the item to equip
    pub item_name: String,
    /// Where to equip the item (hand, head, torso, legs, feet, off-hand)
    pub destination: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TossItemArgs {
    /// Name of the item to toss
    pub item_name: String,
    /// Amount to toss (if not specified, tosses entire stack)
    pub amount: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlaceBlockArgs {
    /// Name of the block to place in front of the bot
    pub block_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_keys() {
        let args: CollectBlockArgs =
            serde_json::from_value(serde_json::json!({"blockName": "oak_log", "amount": 3}))
                .unwrap();
        assert_eq!(args.block_name, "oak_log");
        assert_eq!(args.amount, 3);
    }

    #[test]
    fn test_optional_amount_defaults_to_none() {
        let args: TossItemArgs =
            serde_json::from_value(serde_json::json!({"itemName": "dirt"})).unwrap();
        assert!(args.amount.is_none());
    }

    #[test]
    fn test_snake_case_keys_rejected() {
        let parsed: Result<GoToPlayerArgs, _> =
            serde_json::from_value(serde_json::json!({"player_name": "Steve"}));
        assert!(parsed.is_err());
    }
}
