//! 日志协作操作
//!
//! 日志数据库最新页面定位、笔记追加、任务关联与习惯计数。
//! 每个操作都是单次读取加单次写入的简单组合。

mod notes;
mod routine;
mod tasks;

pub use notes::{
    append_note, build_note_block, linkify, replace_emoji_shortcodes, BookmarkInput, LinkInput,
    NoteInput,
};
pub use routine::{
    count_checked_routines, jst_month_bounds, update_project_count, update_routine_count,
    VALUE_PROPERTY,
};
pub use tasks::{
    create_task, jst_date_string, link_tasks_to_journal, merge_relation_ids, open_tasks, task_view,
    today_tasks, TaskView, TASK_RELATION_PROPERTY,
};

use serde_json::json;

use crate::error::AppError;
use crate::notion::{NotionClient, Page};

/// 获取数据库中按 Date 降序的第一个页面
pub async fn latest_page(notion: &NotionClient, database_id: &str) -> Result<Page, AppError> {
    let response = notion
        .query_database(
            database_id,
            &json!({
                "page_size": 1,
                "sorts": [{ "property": "Date", "direction": "descending" }]
            }),
        )
        .await?;

    response
        .results
        .into_iter()
        .next()
        .filter(Page::is_page)
        .ok_or_else(|| AppError::shape("Latest item in journal database is not a page"))
}
