//! Notion 模块
//!
//! 数据库查询、追加子块、页面更新与创建，以及 block 构造函数。

pub mod blocks;
mod client;
mod types;

pub use client::{NotionClient, NOTION_VERSION};
pub use types::{Page, QueryResponse};
