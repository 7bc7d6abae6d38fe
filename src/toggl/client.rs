//! Toggl Track HTTP 客户端
//!
//! 使用 Basic Auth (`{token}:api_token`) 访问 Toggl v9 API。

use base64::Engine;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, SecondsFormat, TimeZone, Utc};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use super::types::{TimeEntry, TogglProject};
use crate::config::{AppConfig, TOGGL_API_TOKEN};
use crate::error::AppError;

/// JST (UTC+9) 偏移秒数
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// 固定的 UTC+9 时区
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).expect("UTC+9 is a valid offset")
}

/// 计算 `now` 所在 JST 自然日的半开区间 `[00:00 JST, +24h)`
pub fn jst_day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.with_timezone(&jst()).date_naive();
    let midnight = today.and_time(NaiveTime::MIN);
    let start = Utc.from_utc_datetime(&midnight) - Duration::seconds(i64::from(JST_OFFSET_SECS));
    (start, start + Duration::hours(24))
}

/// 与 JavaScript `toISOString()` 一致的格式
fn iso_millis(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Toggl API 客户端
#[derive(Debug, Clone)]
pub struct TogglClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl TogglClient {
    /// 创建新的客户端
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_token)
    }

    /// 使用自定义 HTTP 客户端创建
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_token: Option<String>,
    ) -> Self {
        Self {
            http_client: client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.toggl_api_base.clone(), config.toggl_api_token.clone())
    }

    /// 生成 Authorization Header，Token 缺失时在任何网络请求前失败
    fn auth_header(&self) -> Result<HeaderValue, AppError> {
        let token = self
            .api_token
            .as_deref()
            .ok_or(AppError::Config(TOGGL_API_TOKEN))?;
        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:api_token", token));
        HeaderValue::try_from(format!("Basic {}", credentials))
            .map_err(|_| AppError::InvalidInput("Invalid Toggl API token".to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let auth = self.auth_header()?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                service: "Toggl",
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::InvalidResponse(e.to_string()))
    }

    /// 获取当天 (JST) 的时间记录
    pub async fn fetch_today_entries(&self) -> Result<Vec<TimeEntry>, AppError> {
        let (start, end) = jst_day_window(Utc::now());
        self.fetch_entries_between(start, end).await
    }

    /// 获取开始时间落在 `[start, end)` 内的时间记录，顺序由 API 决定
    pub async fn fetch_entries_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, AppError> {
        log::debug!("Fetching Toggl entries {} .. {}", start, end);
        self.get_json(
            "/me/time_entries",
            &[("start_date", iso_millis(start)), ("end_date", iso_millis(end))],
        )
        .await
    }

    /// 获取工作区的项目列表
    pub async fn fetch_projects(&self, workspace_id: i64) -> Result<Vec<TogglProject>, AppError> {
        self.get_json(&format!("/workspaces/{}/projects", workspace_id), &[])
            .await
    }
}
