//! HTTP API 模块
//!
//! 暴露 Notion / Toggl 同步端点，每个请求独立完成，不保留进程内状态。

mod handlers;
mod server;

pub use handlers::AppState;
pub use server::{router, ApiServer, ServerHandle};

#[cfg(test)]
mod tests;
