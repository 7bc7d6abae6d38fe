//! 项目解析器
//!
//! 两个方向：
//! - Toggl 侧：项目 ID -> 项目名（每次运行拉取一次工作区项目列表）
//! - Notion 侧：项目名 -> 项目页面 ID（按名称并发查询，单个失败不影响其他）

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::json;

use super::aggregate::{aggregate, Aggregation, NO_PROJECT, UNKNOWN_PROJECT};
use crate::error::AppError;
use crate::notion::NotionClient;
use crate::toggl::{TimeEntry, TogglClient};

/// 项目名 -> Notion 页面 ID
pub type ProjectPageMap = HashMap<String, String>;

/// Notion 项目页面查找 trait
///
/// 用于解耦解析逻辑与 Notion 客户端，便于在测试中替换。
#[async_trait]
pub trait ProjectPageLookup: Send + Sync {
    /// 按精确标题查找项目页面
    ///
    /// # Returns
    /// 找到时返回页面 ID，无匹配时返回 `None`
    async fn find_project_page(&self, name: &str) -> Result<Option<String>, AppError>;
}

/// 基于 Notion 项目数据库的查找实现
pub struct NotionProjectLookup<'a> {
    notion: &'a NotionClient,
    database_id: &'a str,
}

impl<'a> NotionProjectLookup<'a> {
    pub fn new(notion: &'a NotionClient, database_id: &'a str) -> Self {
        Self { notion, database_id }
    }
}

#[async_trait]
impl ProjectPageLookup for NotionProjectLookup<'_> {
    async fn find_project_page(&self, name: &str) -> Result<Option<String>, AppError> {
        let response = self
            .notion
            .query_database(
                self.database_id,
                &json!({
                    "filter": {
                        "property": "Project Name",
                        "title": { "equals": name }
                    },
                    "page_size": 1
                }),
            )
            .await?;
        Ok(response.results.into_iter().next().map(|page| page.id))
    }
}

/// 是否为占位项目名（不参与 Notion 查找）
pub fn is_sentinel_name(name: &str) -> bool {
    name == NO_PROJECT || name == UNKNOWN_PROJECT
}

/// 拉取 Toggl 项目列表并按项目聚合
///
/// 工作区 ID 取自第一条记录：假设同一次运行中的记录都属于同一个工作区。
/// 无记录时不发起任何请求。
pub async fn summarize_by_project(
    toggl: &TogglClient,
    entries: &[TimeEntry],
) -> Result<Aggregation, AppError> {
    let Some(first) = entries.first() else {
        return Ok(Aggregation::default());
    };

    let projects = toggl.fetch_projects(first.workspace_id).await?;
    let project_map: HashMap<i64, String> = projects.into_iter().map(|p| (p.id, p.name)).collect();
    log::debug!(
        "Loaded {} Toggl projects for workspace {}",
        project_map.len(),
        first.workspace_id
    );

    Ok(aggregate(entries, &project_map))
}

/// 并发解析项目名对应的 Notion 页面
///
/// 占位名称会被跳过；单个查询失败只记录警告并视为无匹配。
pub async fn resolve_project_pages<L>(lookup: &L, names: &[String]) -> ProjectPageMap
where
    L: ProjectPageLookup + ?Sized,
{
    let mut seen = HashSet::new();
    let targets: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| !is_sentinel_name(name))
        .filter(|name| seen.insert(*name))
        .collect();

    let lookups = targets.into_iter().map(|name| async move {
        match lookup.find_project_page(name).await {
            Ok(found) => found.map(|id| (name.to_string(), id)),
            Err(e) => {
                log::warn!("Project page lookup failed for {:?}: {}", name, e);
                None
            }
        }
    });

    join_all(lookups).await.into_iter().flatten().collect()
}
