//! 执行审计日志
//!
//! 每个顶层请求对应一条以执行 id 为键的追加式记录：{timestamp, stage, payload}
//! 有序条目，惰性创建，进程内可追加，落盘为 logs/<id>.json。对编排正确性是
//! 尽力而为的旁路：写失败以 Err 返回，由 Orchestrator 就地捕获并告警，绝不中断请求。

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::core::AgentError;

/// 编排检查点（状态机的阶段迁移）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    RequestReceived,
    Snapshot,
    PlanGenerated,
    PlanFailed,
    StepStarted,
    StepCompleted,
    StepFailed,
    Completed,
    Aborted,
}

/// 单条审计条目
#[derive(Clone, Debug, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub stage: Stage,
    pub payload: Value,
}

/// 一次执行的完整记录：id 关联该请求下 Planner 与 Worker 的全部条目
#[derive(Clone, Debug, Serialize)]
pub struct ExecutionRecord {
    pub id: Uuid,
    pub created: DateTime<Utc>,
    pub entries: Vec<LogEntry>,
}

/// 追加式执行日志：内存记录 + 每次追加后整体重写对应文件
pub struct ExecutionLog {
    dir: PathBuf,
    records: HashMap<Uuid, ExecutionRecord>,
}

impl ExecutionLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            records: HashMap::new(),
        }
    }

    /// 追加一条条目并落盘；记录在首次追加时惰性创建
    pub async fn append(
        &mut self,
        id: Uuid,
        stage: Stage,
        payload: Value,
    ) -> Result<(), AgentError> {
        let record = self.records.entry(id).or_insert_with(|| ExecutionRecord {
            id,
            created: Utc::now(),
            entries: Vec::new(),
        });
        record.entries.push(LogEntry {
            timestamp: Utc::now(),
            stage,
            payload,
        });

        let serialized = serde_json::to_vec_pretty(record)
            .map_err(|e| AgentError::LogWrite(e.to_string()))?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AgentError::LogWrite(e.to_string()))?;
        let path = self.dir.join(format!("{id}.json"));
        tokio::fs::write(&path, serialized)
            .await
            .map_err(|e| AgentError::LogWrite(e.to_string()))?;
        Ok(())
    }

    /// 某次执行的内存记录（测试与诊断用）
    pub fn record(&self, id: Uuid) -> Option<&ExecutionRecord> {
        self.records.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entries_appended_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ExecutionLog::new(dir.path());
        let id = Uuid::new_v4();

        log.append(id, Stage::RequestReceived, serde_json::json!({"msg": "hi"}))
            .await
            .unwrap();
        log.append(id, Stage::Snapshot, serde_json::json!({}))
            .await
            .unwrap();
        log.append(id, Stage::Completed, serde_json::json!({}))
            .await
            .unwrap();

        let record = log.record(id).unwrap();
        assert_eq!(record.id, id);
        let stages: Vec<Stage> = record.entries.iter().map(|e| e.stage).collect();
        assert_eq!(
            stages,
            vec![Stage::RequestReceived, Stage::Snapshot, Stage::Completed]
        );
    }

    #[tokio::test]
    async fn test_record_persisted_as_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ExecutionLog::new(dir.path());
        let id = Uuid::new_v4();

        log.append(id, Stage::PlanFailed, serde_json::json!({"error": "boom"}))
            .await
            .unwrap();

        let content = std::fs::read_to_string(dir.path().join(format!("{id}.json"))).unwrap();
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["entries"][0]["stage"], "plan_failed");
        assert_eq!(parsed["entries"][0]["payload"]["error"], "boom");
    }

    #[tokio::test]
    async fn test_two_executions_keep_separate_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = ExecutionLog::new(dir.path());
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        log.append(first, Stage::RequestReceived, serde_json::json!({}))
            .await
            .unwrap();
        log.append(second, Stage::RequestReceived, serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(log.record(first).unwrap().entries.len(), 1);
        assert_eq!(log.record(second).unwrap().entries.len(), 1);
        assert!(dir.path().join(format!("{first}.json")).exists());
        assert!(dir.path().join(format!("{second}.json")).exists());
    }

    #[tokio::test]
    async fn test_unwritable_dir_reports_log_write_error() {
        // 以文件路径冒充目录，create_dir_all 必然失败
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut log = ExecutionLog::new(file.path());
        let err = log
            .append(Uuid::new_v4(), Stage::Aborted, serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::LogWrite(_)));
    }
}
