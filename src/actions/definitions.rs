//! 工具声明视图
//!
//! 把动作目录渲染成两种对外表示：发给推理服务的 tool 声明（含 schemars 生成的
//! 参数 Schema），以及拼进 Planner system prompt 的目录文本。两者都从
//! `ActionName::ALL` 派生，与分发表同源。

use schemars::{schema_for, JsonSchema};
use serde::Serialize;
use serde_json::Value;

use crate::actions::args::{
    CollectBlockArgs, CraftItemArgs, EquipItemArgs, FollowPlayerArgs, GoToPlayerArgs,
    PlaceBlockArgs, TossItemArgs,
};
use crate::actions::ActionName;

/// 单个工具声明（Ollama chat API 的 tools 条目格式）
#[derive(Clone, Debug, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionDef,
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

fn params_schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T).schema)
        .unwrap_or_else(|_| serde_json::json!({"type": "object"}))
}

/// 单个动作的声明：名称 / 描述 / 参数 Schema
pub fn definition(action: ActionName) -> ToolDefinition {
    let (description, parameters) = match action {
        ActionName::GoToPlayer => (
            "Move the bot to a specific player with 2 block distance",
            params_schema::<GoToPlayerArgs>(),
        ),
        ActionName::FollowPlayer => (
            "Make the bot follow a specific player with 2 block distance",
            params_schema::<FollowPlayerArgs>(),
        ),
        ActionName::CollectBlock => (
            "Collect a specific type of block nearby",
            params_schema::<CollectBlockArgs>(),
        ),
        ActionName::CraftItem => (
            "Craft a specific item using available materials",
            params_schema::<CraftItemArgs>(),
        ),
        ActionName::EquipItem => (
            "Equip an item from inventory to a specific slot",
            params_schema::<EquipItemArgs>(),
        ),
        ActionName::TossItem => (
            "Drop items from inventory",
            params_schema::<TossItemArgs>(),
        ),
        ActionName::PlaceBlock => (
            "Place a block from inventory on the ground in front of the bot",
            params_schema::<PlaceBlockArgs>(),
        ),
    };
    ToolDefinition {
        kind: "function",
        function: FunctionDef {
            name: action.as_str().to_string(),
            description: description.to_string(),
            parameters,
        },
    }
}

/// 全部注册动作的工具声明（发给推理服务）
pub fn definitions() -> Vec<ToolDefinition> {
    ActionName::ALL.iter().map(|a| definition(*a)).collect()
}

/// Planner system prompt 中的动作目录文本：每个动作一段「名称: 描述 + 参数形状」
pub fn catalog_text() -> String {
    definitions()
        .iter()
        .map(|def| {
            let properties = def
                .function
                .parameters
                .get("properties")
                .cloned()
                .unwrap_or_else(|| serde_json::json!({}));
            format!(
                "{}: {}\n   Parameters: {}",
                def.function.name, def.function.description, properties
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_cover_catalog() {
        let defs = definitions();
        assert_eq!(defs.len(), ActionName::ALL.len());
        for def in &defs {
            assert_eq!(def.kind, "function");
            assert!(def.function.parameters.get("properties").is_some());
        }
    }

    #[test]
    fn test_collect_block_schema_requires_both_fields() {
        let def = definition(ActionName::CollectBlock);
        let required = def.function.parameters["required"]
            .as_array()
            .expect("required array")
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert!(required.contains(&"blockName".to_string()));
        assert!(required.contains(&"amount".to_string()));
    }

    #[test]
    fn test_catalog_text_mentions_every_action() {
        let text = catalog_text();
        for action in ActionName::ALL {
            assert!(text.contains(action.as_str()), "missing {}", action.as_str());
        }
    }
}
