//! Toggl Track v9 数据类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Toggl 时间记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    /// 描述，可能为空
    #[serde(default)]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    /// 计时中的记录没有结束时间
    #[serde(default)]
    pub stop: Option<DateTime<Utc>>,
    /// 时长（秒），计时中为负数
    pub duration: i64,
    #[serde(default)]
    pub project_id: Option<i64>,
    pub workspace_id: i64,
}

impl TimeEntry {
    /// 是否仍在计时
    pub fn is_running(&self) -> bool {
        self.duration < 0
    }
}

/// Toggl 项目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TogglProject {
    pub id: i64,
    pub name: String,
}
