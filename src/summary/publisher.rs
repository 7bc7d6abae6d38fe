//! Summary 发布器
//!
//! 串联 拉取记录 -> 聚合 -> 解析 Notion 项目页面 -> 构造片段 -> 追加到目标页面。
//! 追加是单次请求，失败时不做任何补偿。

use serde::Serialize;

use super::aggregate::format_duration;
use super::fragment::build_fragment;
use super::resolver::{
    resolve_project_pages, summarize_by_project, NotionProjectLookup, ProjectPageMap,
};
use crate::error::AppError;
use crate::journal;
use crate::notion::{NotionClient, Page};
use crate::toggl::{TimeEntry, TogglClient};

/// 单个项目的汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTime {
    pub name: String,
    pub time: String,
}

/// 发布结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub journal_id: String,
    pub journal_url: Option<String>,
    /// 拉取到的记录数（包含计时中的记录）
    pub entries_count: usize,
    pub total_time: String,
    pub projects: Vec<ProjectTime>,
}

/// Summary 发布器
///
/// 客户端由调用方构造并传入，发布器本身不持有任何跨调用状态。
pub struct SummaryPublisher<'a> {
    toggl: &'a TogglClient,
    notion: &'a NotionClient,
    /// 未配置时跳过项目页面解析
    project_database_id: Option<&'a str>,
}

impl<'a> SummaryPublisher<'a> {
    pub fn new(
        toggl: &'a TogglClient,
        notion: &'a NotionClient,
        project_database_id: Option<&'a str>,
    ) -> Self {
        Self {
            toggl,
            notion,
            project_database_id,
        }
    }

    /// 将今天的汇总追加到日志数据库中最新的页面
    pub async fn publish_today(
        &self,
        journal_database_id: &str,
    ) -> Result<SummaryReport, AppError> {
        let entries = self.toggl.fetch_today_entries().await?;
        log::info!("Fetched {} Toggl entries for today", entries.len());

        let target = journal::latest_page(self.notion, journal_database_id).await?;
        self.publish(&target, &entries).await
    }

    /// 聚合给定记录并追加到目标页面
    pub async fn publish(
        &self,
        target: &Page,
        entries: &[TimeEntry],
    ) -> Result<SummaryReport, AppError> {
        let aggregation = summarize_by_project(self.toggl, entries).await?;

        let names: Vec<String> = aggregation
            .summaries
            .iter()
            .map(|s| s.project_name.clone())
            .collect();
        let pages = match self.project_database_id {
            Some(database_id) => {
                let lookup = NotionProjectLookup::new(self.notion, database_id);
                resolve_project_pages(&lookup, &names).await
            }
            None => {
                log::debug!("Project database not configured, skipping page resolution");
                ProjectPageMap::new()
            }
        };

        let fragment = build_fragment(&aggregation, &pages);
        self.notion.append_block_children(&target.id, fragment).await?;
        log::info!(
            "Appended Toggl summary ({} projects) to {}",
            aggregation.summaries.len(),
            target.id
        );

        Ok(SummaryReport {
            journal_id: target.id.clone(),
            journal_url: target.url.clone(),
            entries_count: entries.len(),
            total_time: format_duration(aggregation.total_seconds),
            projects: aggregation
                .summaries
                .iter()
                .map(|s| ProjectTime {
                    name: s.project_name.clone(),
                    time: format_duration(s.total_seconds),
                })
                .collect(),
        })
    }
}
