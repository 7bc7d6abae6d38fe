//! Toggl 汇总模块
//!
//! 将当天的 Toggl 时间记录整理为按项目分组的表格，追加到最新的 Notion 日志页面。
//!
//! ## Pipeline
//!
//! 1. **Fetch**: 从 Toggl 拉取当天 (JST) 的记录
//! 2. **Aggregate**: 按项目名分组，跳过计时中的记录
//! 3. **Resolve**: 按项目名查找 Notion 项目页面
//! 4. **Render**: heading + table blocks
//! 5. **Publish**: 对目标页面发起一次 append-children 请求

pub mod aggregate;
pub mod fragment;
pub mod publisher;
pub mod resolver;

pub use aggregate::{
    aggregate, format_duration, format_time, format_time_str, merge_descriptions, Aggregation,
    EntryLine, ProjectSummary, TimeSpan, NO_PROJECT, UNKNOWN_PROJECT,
};
pub use fragment::build_fragment;
pub use publisher::{ProjectTime, SummaryPublisher, SummaryReport};
pub use resolver::{
    resolve_project_pages, summarize_by_project, NotionProjectLookup, ProjectPageLookup,
    ProjectPageMap,
};



#[cfg(test)]
mod resolver_tests;
