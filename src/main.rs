//! Golem - Minecraft AI 机器人核心
//!
//! 入口：初始化日志、加载配置、构建编排器，在标准输入上跑一个逐行 REPL
//! （真实部署中这里对接游戏聊天事件，传输层不在本 crate 范围内）。

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use golem::config::load_config;
use golem::core::Orchestrator;
use golem::llm::OllamaClient;
use golem::world::SimWorld;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    let cfg = load_config(None).context("Failed to load config")?;
    tracing::info!(
        planning_model = %cfg.llm.planning_model,
        worker_model = %cfg.llm.worker_model,
        "starting {}",
        cfg.world.username
    );

    let llm = Arc::new(OllamaClient::new(&cfg.llm.host, cfg.llm.request_timeout_secs));
    // 演示用模拟世界：一小片可供采集与合成的资源
    let world = Arc::new(
        SimWorld::new()
            .with_blocks(&[("oak_log", 12), ("stone", 40), ("dirt", 60), ("coal_ore", 5)])
            .with_players(&["Steve"]),
    );
    let mut orchestrator =
        Orchestrator::new(llm, world, &cfg).context("Failed to build orchestrator")?;

    println!("AI Bot ready! I can help with movement, block collection, crafting, and inventory management!");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
            continue;
        }
        if message == "exit" || message == "quit" {
            break;
        }

        // 一次只处理一个请求：世界是单一共享可变资源
        let reply = orchestrator.process_command(message).await;
        println!("{reply}");
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}
