//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `GOLEM__*` 覆盖（双下划线表示嵌套，
//! 如 `GOLEM__LLM__PLANNING_MODEL=qwen3:14b`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub world: WorldSection,
}

/// [llm] 段：Ollama 地址、规划 / 执行两套模型、请求超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub host: String,
    /// 规划阶段模型（结构化输出）
    pub planning_model: String,
    /// 执行阶段模型（tool-calling）
    pub worker_model: String,
    /// 单次请求超时（秒，仅传输层）
    pub request_timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            host: "http://127.0.0.1:11434".to_string(),
            planning_model: "deepseek-r1:14b".to_string(),
            worker_model: "command-r7b:latest".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// [log] 段：审计日志目录
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSection {
    pub dir: PathBuf,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
        }
    }
}

/// [world] 段：机器人名与扫描半径（只影响提示词表述，不是寻路参数）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorldSection {
    pub username: String,
    pub scan_radius: u32,
}

impl Default for WorldSection {
    fn default() -> Self {
        Self {
            username: "AIBot".to_string(),
            scan_radius: 10,
        }
    }
}

/// 从 config 目录加载配置，环境变量 GOLEM__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 GOLEM__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("GOLEM")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.llm.host, "http://127.0.0.1:11434");
        assert_eq!(cfg.llm.planning_model, "deepseek-r1:14b");
        assert_eq!(cfg.llm.worker_model, "command-r7b:latest");
        assert_eq!(cfg.log.dir, PathBuf::from("logs"));
        assert_eq!(cfg.world.scan_radius, 10);
    }
}
