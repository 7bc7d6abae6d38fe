//! 聚合引擎
//!
//! 按解析后的项目名分组当天的时间记录，计算各项目时长、总时长与整体时间跨度。

use std::collections::HashMap;

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::toggl::{jst, TimeEntry};

/// 记录没有项目时使用的名称
pub const NO_PROJECT: &str = "No Project";

/// 项目 ID 不在工作区项目列表中时使用的名称
pub const UNKNOWN_PROJECT: &str = "Unknown";

/// 无描述记录的占位文本
pub const NO_DESCRIPTION: &str = "(no description)";

/// 项目分组中的一条已结束记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryLine {
    pub description: String,
    pub seconds: i64,
    pub start: DateTime<Utc>,
    pub stop: Option<DateTime<Utc>>,
}

/// 单个项目的聚合结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub project_name: String,
    pub total_seconds: i64,
    /// 保持出现顺序
    pub entries: Vec<EntryLine>,
}

/// 已聚合记录的整体时间跨度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeSpan {
    /// JST `"HH:MM-HH:MM"`，任一端缺失时返回 `None`
    pub fn format_range(&self) -> Option<String> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                Some(format!("{}-{}", format_time(&start), format_time(&end)))
            }
            _ => None,
        }
    }
}

/// Result of one aggregation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// 按项目名首次出现的顺序
    pub summaries: Vec<ProjectSummary>,
    pub total_seconds: i64,
    pub span: TimeSpan,
}

/// 将记录的项目 ID 解析为显示名称
pub fn resolve_project_name(project_id: Option<i64>, projects: &HashMap<i64, String>) -> String {
    match project_id {
        // Toggl 不会分配 id 0，按无项目处理
        None | Some(0) => NO_PROJECT.to_string(),
        Some(id) => projects
            .get(&id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PROJECT.to_string()),
    }
}

/// 按项目名聚合记录
///
/// 计时中的记录（时长为负）被完全跳过。分组保持项目名首次出现的顺序，
/// 组内记录保持原始顺序。
///
/// # Arguments
/// * `entries` - API 返回顺序的原始记录
/// * `projects` - 工作区的项目 ID -> 名称映射
pub fn aggregate(entries: &[TimeEntry], projects: &HashMap<i64, String>) -> Aggregation {
    let mut summaries: Vec<ProjectSummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries.iter().filter(|e| !e.is_running()) {
        let project_name = resolve_project_name(entry.project_id, projects);

        let slot = *index.entry(project_name.clone()).or_insert_with(|| {
            summaries.push(ProjectSummary {
                project_name,
                total_seconds: 0,
                entries: Vec::new(),
            });
            summaries.len() - 1
        });

        let summary = &mut summaries[slot];
        summary.total_seconds += entry.duration;
        summary.entries.push(EntryLine {
            description: entry
                .description
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            seconds: entry.duration,
            start: entry.start,
            stop: entry.stop,
        });
    }

    let total_seconds = summaries.iter().map(|s| s.total_seconds).sum();
    let span = compute_span(&summaries);

    Aggregation {
        summaries,
        total_seconds,
        span,
    }
}

fn compute_span(summaries: &[ProjectSummary]) -> TimeSpan {
    let lines = summaries.iter().flat_map(|s| s.entries.iter());
    let start = lines.clone().map(|l| l.start).min();
    let end = lines.filter_map(|l| l.stop).max();
    TimeSpan { start, end }
}

/// 合并描述完全相同的行并累加时长
///
/// 保持首次出现的顺序。
pub fn merge_descriptions(entries: &[EntryLine]) -> Vec<(String, i64)> {
    let mut merged: Vec<(String, i64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        match index.get(entry.description.as_str()) {
            Some(&i) => merged[i].1 += entry.seconds,
            None => {
                index.insert(entry.description.as_str(), merged.len());
                merged.push((entry.description.clone(), entry.seconds));
            }
        }
    }

    merged
}

/// 秒数格式化为 `"{H}h {M}m"`，不足一小时为 `"{M}m"`
pub fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Formats an instant as JST `"HH:MM"`
pub fn format_time(instant: &DateTime<Utc>) -> String {
    let local = instant.with_timezone(&jst());
    format!("{:02}:{:02}", local.hour(), local.minute())
}

/// 解析 RFC 3339 时间并格式化为 JST `"HH:MM"`
pub fn format_time_str(instant: &str) -> Result<String, AppError> {
    let parsed = DateTime::parse_from_rfc3339(instant)
        .map_err(|e| AppError::InvalidInput(format!("invalid instant {:?}: {}", instant, e)))?;
    Ok(format_time(&parsed.with_timezone(&Utc)))
}
