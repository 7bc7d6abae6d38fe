//! HTTP 路由处理器
//!
//! 成功响应统一为 `{"status": "success", "result": ...}`，
//! 失败时记录日志并返回 `{"status": "error", "message": ...}`。

use axum::{
    body::Bytes,
    extract::State,
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::journal::{self, NoteInput};
use crate::notion::NotionClient;
use crate::summary::SummaryPublisher;
use crate::toggl::TogglClient;

/// 共享状态
///
/// 只读，客户端在启动时按配置构造一次，由各操作显式借用。
pub struct AppState {
    pub config: AppConfig,
    pub toggl: TogglClient,
    pub notion: NotionClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            toggl: TogglClient::from_config(&config),
            notion: NotionClient::from_config(&config),
            config,
        }
    }
}

type ApiResult = Result<Json<Value>, AppError>;

fn success<T: Serialize>(result: T) -> ApiResult {
    Ok(Json(json!({ "status": "success", "result": result })))
}

/// 解析 JSON 请求体，不要求 Content-Type
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::InvalidInput(format!("malformed request body: {}", e)))
}

/// 记录失败并原样返回
fn logged<T>(context: &str, result: Result<T, AppError>) -> Result<T, AppError> {
    if let Err(e) = &result {
        log::error!("Error {}: {}", context, e);
    }
    result
}

/// GET /api/health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "ok",
        "service": "journal-bridge"
    })))
}

/// GET /api/auth
///
/// 触发浏览器的 Basic Auth 对话框
pub async fn auth_challenge() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, "Basic realm='secure_area'")],
        Json(json!({ "error": "Basic Auth Required" })),
    )
}

/// GET /api/notion
///
/// 旧版笔记数据库中最新页面的 URL
pub async fn latest_note_url(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = async {
        let database_id = state.config.notion_database_id()?;
        state.config.notion_api_token()?;
        journal::latest_page(&state.notion, database_id).await
    }
    .await;
    success(logged("fetching latest note page", result)?.url)
}

/// GET /api/notion/latest
pub async fn latest_journal_url(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = async {
        let database_id = state.config.journal_database_id()?;
        state.config.notion_api_token()?;
        journal::latest_page(&state.notion, database_id).await
    }
    .await;
    success(logged("fetching latest journal page", result)?.url)
}

/// PUT /api/notion/latest
///
/// 向最新日志页面追加一条笔记
pub async fn append_to_latest_journal(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult {
    let result = async {
        let database_id = state.config.journal_database_id()?;
        state.config.notion_api_token()?;
        let input: NoteInput = parse_body(&body)?;
        let latest = journal::latest_page(&state.notion, database_id).await?;
        journal::append_note(&state.notion, &latest.id, &input).await
    }
    .await;
    success(logged("appending note to journal", result)?)
}

/// GET /api/notion/task
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = async {
        let database_id = state.config.task_database_id()?;
        state.config.notion_api_token()?;
        journal::open_tasks(&state.notion, database_id, Utc::now()).await
    }
    .await;
    success(logged("listing tasks", result)?)
}

/// 创建任务请求
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
}

/// POST /api/notion/task, POST /api/notion/task/new
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult {
    let result = async {
        let database_id = state.config.task_database_id()?;
        state.config.notion_api_token()?;
        let request: CreateTaskRequest = parse_body(&body)?;
        log::debug!("Creating task {:?}", request.title);
        if request.title.trim().is_empty() {
            return Err(AppError::InvalidInput("title must not be empty".to_string()));
        }
        journal::create_task(&state.notion, database_id, &request.title).await
    }
    .await;
    success(logged("creating task", result)?)
}

/// GET /api/notion/task/new
pub async fn new_task_ping() -> ApiResult {
    Ok(Json(json!({ "status": "success" })))
}

/// 习惯计数请求
#[derive(Debug, Deserialize)]
pub struct RoutineRequest {
    pub title: String,
    /// 日志中勾选属性名，缺省为 title
    #[serde(default)]
    pub property: Option<String>,
}

/// PUT /api/notion/routine
pub async fn update_routine(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult {
    let result = async {
        let journal_db = state.config.journal_database_id()?;
        let project_db = state.config.project_database_id()?;
        state.config.notion_api_token()?;
        let request: RoutineRequest = parse_body(&body)?;
        journal::update_routine_count(
            &state.notion,
            journal_db,
            project_db,
            &request.title,
            request.property.as_deref(),
            Utc::now(),
        )
        .await
    }
    .await;
    success(logged("updating routine count", result)?)
}

/// 任务关联结果
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalTaskResult {
    pub journal_id: String,
    pub journal_url: Option<String>,
    pub tasks_added: usize,
}

/// POST /api/notion/journal-task
///
/// 将今天的任务关联到最新日志页面
pub async fn link_today_tasks(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = async {
        let journal_db = state.config.journal_database_id()?;
        let task_db = state.config.task_database_id()?;
        state.config.notion_api_token()?;

        let latest = journal::latest_page(&state.notion, journal_db).await?;
        let tasks = journal::today_tasks(&state.notion, task_db, Utc::now()).await?;
        journal::link_tasks_to_journal(&state.notion, &latest, &tasks).await?;

        Ok::<_, AppError>(JournalTaskResult {
            journal_id: latest.id,
            journal_url: latest.url,
            tasks_added: tasks.len(),
        })
    }
    .await;
    success(logged("adding tasks to journal", result)?)
}

/// POST /api/notion/toggl
///
/// 将今天的 Toggl 汇总追加到最新日志页面
pub async fn publish_toggl_summary(State(state): State<Arc<AppState>>) -> ApiResult {
    let result = async {
        let journal_db = state.config.journal_database_id()?;
        state.config.toggl_api_token()?;
        state.config.notion_api_token()?;

        SummaryPublisher::new(
            &state.toggl,
            &state.notion,
            state.config.project_database_id.as_deref(),
        )
        .publish_today(journal_db)
        .await
    }
    .await;
    success(logged("adding Toggl summary to journal", result)?)
}
