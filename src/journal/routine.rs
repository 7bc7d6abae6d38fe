//! 习惯计数
//!
//! 统计本月日志中已勾选某个习惯的天数，并写入对应 Routine 项目的分子属性。

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::notion::NotionClient;
use crate::toggl::jst;

/// 项目页面上存放计数的数字属性
pub const VALUE_PROPERTY: &str = "分子";

/// `now` 所在 JST 月份的 `[月初, 下月初)`，以 `+09:00` 偏移的 RFC 3339 表示
pub fn jst_month_bounds(now: DateTime<Utc>) -> (String, String) {
    let today = now.with_timezone(&jst()).date_naive();
    let (year, month) = (today.year(), today.month());
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };

    let render = |y: i32, m: u32| {
        NaiveDate::from_ymd_opt(y, m, 1)
            .map(|d| format!("{}T00:00:00+09:00", d.format("%Y-%m-%d")))
            .unwrap_or_default()
    };
    (render(year, month), render(next_year, next_month))
}

fn month_filter(start: &str, end: &str) -> [Value; 2] {
    [
        json!({ "property": "Date", "date": { "on_or_after": start } }),
        json!({ "property": "Date", "date": { "before": end } }),
    ]
}

/// 统计本月勾选了 `property` 的日志页数（仅第一页结果）
pub async fn count_checked_routines(
    notion: &NotionClient,
    journal_database_id: &str,
    property: &str,
    now: DateTime<Utc>,
) -> Result<usize, AppError> {
    let (start, end) = jst_month_bounds(now);
    let [after, before] = month_filter(&start, &end);

    let response = notion
        .query_database(
            journal_database_id,
            &json!({
                "filter": {
                    "and": [
                        after,
                        before,
                        { "property": property, "checkbox": { "equals": true } }
                    ]
                }
            }),
        )
        .await?;
    Ok(response.results.len())
}

/// 将计数写入本月计划中的 Routine 项目
pub async fn update_project_count(
    notion: &NotionClient,
    project_database_id: &str,
    title: &str,
    value: usize,
    now: DateTime<Utc>,
) -> Result<Value, AppError> {
    let (start, end) = jst_month_bounds(now);
    let [after, before] = month_filter(&start, &end);

    let response = notion
        .query_database(
            project_database_id,
            &json!({
                "filter": {
                    "and": [
                        { "property": "Project Name", "title": { "starts_with": title } },
                        { "property": "Status", "status": { "equals": "Planned" } },
                        after,
                        before,
                        { "property": "Type", "select": { "equals": "Routine" } }
                    ]
                }
            }),
        )
        .await?;

    let project = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| AppError::shape("Project not found"))?;

    notion
        .update_page(&project.id, json!({ VALUE_PROPERTY: value }))
        .await
}

/// 统计并写回，返回计数
///
/// `property` 缺省时使用 `title` 作为日志中的勾选属性名。
pub async fn update_routine_count(
    notion: &NotionClient,
    journal_database_id: &str,
    project_database_id: &str,
    title: &str,
    property: Option<&str>,
    now: DateTime<Utc>,
) -> Result<usize, AppError> {
    let property = property.filter(|p| !p.is_empty()).unwrap_or(title);
    let count = count_checked_routines(notion, journal_database_id, property, now).await?;
    log::info!("Routine {:?}: {} checked this month", property, count);

    update_project_count(notion, project_database_id, title, count, now).await?;
    Ok(count)
}
