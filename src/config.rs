//! 配置模块
//!
//! 从进程环境变量读取 Token、数据库 ID 与监听地址。
//! 缺失的必需项不会在启动时报错，而是在对应操作发起网络请求前报错。

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::AppError;

/// 默认端口号
pub const DEFAULT_PORT: u16 = 3000;

/// Toggl API 默认地址
pub const DEFAULT_TOGGL_API_BASE: &str = "https://api.track.toggl.com/api/v9";

/// Notion API 默认地址
pub const DEFAULT_NOTION_API_BASE: &str = "https://api.notion.com/v1";

pub const TOGGL_API_TOKEN: &str = "TOGGL_API_TOKEN";
pub const NOTION_API_TOKEN: &str = "NOTION_API_TOKEN";
pub const NOTION_DATABASE_ID: &str = "NOTION_DATABASE_ID";
pub const NOTION_JOURNAL_DATABASE_ID: &str = "NOTION_JOURNAL_DATABASE_ID";
pub const NOTION_TASK_DATABASE_ID: &str = "NOTION_TASK_DATABASE_ID";
pub const NOTION_PROJECT_DATABASE_ID: &str = "NOTION_PROJECT_DATABASE_ID";

/// 服务配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Toggl API Token
    pub toggl_api_token: Option<String>,
    /// Notion Integration Token
    pub notion_api_token: Option<String>,
    /// 旧版笔记数据库 (GET /api/notion)
    pub notion_database_id: Option<String>,
    /// 日志数据库
    pub journal_database_id: Option<String>,
    /// 任务数据库
    pub task_database_id: Option<String>,
    /// 项目数据库
    pub project_database_id: Option<String>,
    pub toggl_api_base: String,
    pub notion_api_base: String,
    /// 监听地址
    pub host: IpAddr,
    /// 监听端口
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            toggl_api_token: None,
            notion_api_token: None,
            notion_database_id: None,
            journal_database_id: None,
            task_database_id: None,
            project_database_id: None,
            toggl_api_base: DEFAULT_TOGGL_API_BASE.to_string(),
            notion_api_base: DEFAULT_NOTION_API_BASE.to_string(),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 通过任意键值查找函数加载配置
    ///
    /// 空白值视为未设置。无法解析的 `HOST` / `PORT` 回退到默认值。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            toggl_api_token: get(TOGGL_API_TOKEN),
            notion_api_token: get(NOTION_API_TOKEN),
            notion_database_id: get(NOTION_DATABASE_ID),
            journal_database_id: get(NOTION_JOURNAL_DATABASE_ID),
            task_database_id: get(NOTION_TASK_DATABASE_ID),
            project_database_id: get(NOTION_PROJECT_DATABASE_ID),
            toggl_api_base: get("TOGGL_API_BASE").unwrap_or(defaults.toggl_api_base),
            notion_api_base: get("NOTION_API_BASE").unwrap_or(defaults.notion_api_base),
            host: get("HOST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.host),
            port: get("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    /// 监听地址
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn toggl_api_token(&self) -> Result<&str, AppError> {
        require(&self.toggl_api_token, TOGGL_API_TOKEN)
    }

    pub fn notion_api_token(&self) -> Result<&str, AppError> {
        require(&self.notion_api_token, NOTION_API_TOKEN)
    }

    pub fn journal_database_id(&self) -> Result<&str, AppError> {
        require(&self.journal_database_id, NOTION_JOURNAL_DATABASE_ID)
    }

    pub fn task_database_id(&self) -> Result<&str, AppError> {
        require(&self.task_database_id, NOTION_TASK_DATABASE_ID)
    }

    pub fn project_database_id(&self) -> Result<&str, AppError> {
        require(&self.project_database_id, NOTION_PROJECT_DATABASE_ID)
    }

    pub fn notion_database_id(&self) -> Result<&str, AppError> {
        require(&self.notion_database_id, NOTION_DATABASE_ID)
    }
}

/// 将缺失的配置项转换为配置错误
pub fn require<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str, AppError> {
    value.as_deref().ok_or(AppError::Config(key))
}
