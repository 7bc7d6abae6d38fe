//! Toggl Track 模块
//!
//! 时间记录数据源：按 JST 自然日拉取时间记录、按工作区拉取项目列表。

mod client;
mod types;

pub use client::{jst, jst_day_window, TogglClient};
pub use types::{TimeEntry, TogglProject};
