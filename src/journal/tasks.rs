//! 任务数据库操作
//!
//! 今日任务查询、未完成任务列表、任务创建，以及日志页面 Tasks 关联更新。

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::notion::{NotionClient, Page};
use crate::toggl::jst;

/// 日志数据库中关联任务的属性名
pub const TASK_RELATION_PROPERTY: &str = "Tasks";

/// 任务列表项
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    /// 原样返回 Project 属性
    pub project: Option<Value>,
    /// 数字或 "-"
    pub estimate_hours: Value,
    pub actual_hours: Value,
}

/// JST 当天日期 (YYYY-MM-DD)
pub fn jst_date_string(now: DateTime<Utc>) -> String {
    now.with_timezone(&jst()).format("%Y-%m-%d").to_string()
}

fn pages_only(results: Vec<Page>) -> Vec<Page> {
    results.into_iter().filter(Page::is_page).collect()
}

/// 获取日期为 JST 今天的任务，按 Status 升序
pub async fn today_tasks(
    notion: &NotionClient,
    task_database_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Page>, AppError> {
    let response = notion
        .query_database(
            task_database_id,
            &json!({
                "filter": {
                    "property": "Date",
                    "date": { "equals": jst_date_string(now) }
                },
                "sorts": [{ "property": "Status", "direction": "ascending" }]
            }),
        )
        .await?;
    Ok(pages_only(response.results))
}

/// 获取已到期的 Todo / In progress 任务及今天的任务，按 Status 降序
pub async fn open_tasks(
    notion: &NotionClient,
    task_database_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<TaskView>, AppError> {
    let now_iso = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let due_with_status = |status: &str| {
        json!({
            "and": [
                { "property": "Status", "status": { "equals": status } },
                { "property": "Date", "date": { "on_or_before": now_iso } }
            ]
        })
    };

    let response = notion
        .query_database(
            task_database_id,
            &json!({
                "filter": {
                    "or": [
                        due_with_status("Todo"),
                        due_with_status("In progress"),
                        { "property": "Date", "date": { "equals": now_iso } }
                    ]
                },
                "sorts": [{ "property": "Status", "direction": "descending" }]
            }),
        )
        .await?;

    pages_only(response.results)
        .iter()
        .filter(|page| !page.properties.is_empty())
        .map(task_view)
        .collect()
}

/// 将任务页面转换为列表项，属性类型不符时报错
pub fn task_view(page: &Page) -> Result<TaskView, AppError> {
    let malformed = || AppError::shape("Task is not formatted correctly");

    let title = page.typed_property("Task", "title").ok_or_else(malformed)?;
    let status = page.typed_property("Status", "status").ok_or_else(malformed)?;
    let date = page.typed_property("Date", "date").ok_or_else(malformed)?;
    let estimate = page
        .typed_property("Estimate Hours", "number")
        .ok_or_else(malformed)?;
    let actual = page
        .typed_property("Actual Hours", "number")
        .ok_or_else(malformed)?;

    let hours = |prop: &Value| match &prop["number"] {
        Value::Null => json!("-"),
        number => number.clone(),
    };

    Ok(TaskView {
        id: page.id.clone(),
        url: page.url.clone(),
        title: title["title"][0]["plain_text"].as_str().map(str::to_string),
        status: status["status"]["name"].as_str().map(str::to_string),
        date: date["date"]["start"].as_str().map(str::to_string),
        project: page.properties.get("Project").cloned(),
        estimate_hours: hours(estimate),
        actual_hours: hours(actual),
    })
}

/// 创建新任务
pub async fn create_task(
    notion: &NotionClient,
    task_database_id: &str,
    title: &str,
) -> Result<Value, AppError> {
    notion
        .create_page(
            task_database_id,
            json!({
                "Task": { "title": [{ "text": { "content": title } }] }
            }),
        )
        .await
}

/// 合并已有关联与新任务 ID，保持已有顺序且不重复
pub fn merge_relation_ids(existing: Vec<String>, additions: &[Page]) -> Vec<String> {
    let mut combined = existing;
    for task in additions {
        if !combined.contains(&task.id) {
            combined.push(task.id.clone());
        }
    }
    combined
}

/// 将任务添加到日志页面的 Tasks 关联属性
pub async fn link_tasks_to_journal(
    notion: &NotionClient,
    journal: &Page,
    tasks: &[Page],
) -> Result<Value, AppError> {
    let existing = journal
        .relation_ids(TASK_RELATION_PROPERTY)
        .ok_or_else(|| AppError::shape("Journal does not have a Tasks relation property"))?;

    let relations: Vec<Value> = merge_relation_ids(existing, tasks)
        .into_iter()
        .map(|id| json!({ "id": id }))
        .collect();

    notion
        .update_page(
            &journal.id,
            json!({ TASK_RELATION_PROPERTY: { "relation": relations } }),
        )
        .await
}
