// Journal Bridge Library
// Notion 日志与 Toggl 计时同步

pub mod api;
pub mod config;
pub mod error;
pub mod journal;
pub mod notion;
pub mod summary;
pub mod toggl;

pub use config::AppConfig;
pub use error::AppError;
