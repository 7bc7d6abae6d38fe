//! 将聚合结果渲染为追加到日志页面的 Notion blocks

use serde_json::Value;

use super::aggregate::{format_duration, merge_descriptions, Aggregation, ProjectSummary};
use super::resolver::ProjectPageMap;
use crate::notion::blocks;

const TABLE_COLUMNS: [&str; 3] = ["Project", "Time", "Details"];

/// 标题文本，例如 `"⏱ Toggl (1h 5m) 09:00-18:30"`
pub fn heading_text(aggregation: &Aggregation) -> String {
    let range = aggregation
        .span
        .format_range()
        .map(|r| format!(" {}", r))
        .unwrap_or_default();
    format!("⏱ Toggl ({}){}", format_duration(aggregation.total_seconds), range)
}

/// Details 单元格：每个合并组一行 `"• {description} ({duration})"`
pub fn details_text(summary: &ProjectSummary) -> String {
    merge_descriptions(&summary.entries)
        .into_iter()
        .map(|(description, seconds)| format!("• {} ({})", description, format_duration(seconds)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn project_row(summary: &ProjectSummary, pages: &ProjectPageMap) -> Value {
    let project_cell = match pages.get(&summary.project_name) {
        Some(page_id) => vec![blocks::page_mention(page_id)],
        None => vec![blocks::text(&summary.project_name)],
    };

    blocks::table_row(vec![
        project_cell,
        vec![blocks::text(&format_duration(summary.total_seconds))],
        vec![blocks::text(&details_text(summary))],
    ])
}

/// 构造 heading + table 片段
///
/// 行顺序与聚合中的项目顺序一致。空聚合仍然生成只有表头的表格。
pub fn build_fragment(aggregation: &Aggregation, pages: &ProjectPageMap) -> Vec<Value> {
    let header = blocks::table_row(
        TABLE_COLUMNS
            .iter()
            .map(|label| vec![blocks::text(label)])
            .collect(),
    );

    let rows = std::iter::once(header)
        .chain(aggregation.summaries.iter().map(|s| project_row(s, pages)))
        .collect();

    vec![
        blocks::heading_3(vec![blocks::text(&heading_text(aggregation))]),
        blocks::table(TABLE_COLUMNS.len(), rows),
    ]
}
