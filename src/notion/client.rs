//! Notion HTTP 客户端

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::types::QueryResponse;
use crate::config::{AppConfig, NOTION_API_TOKEN};
use crate::error::AppError;

/// 固定的 Notion API 版本
pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion API 客户端
#[derive(Debug, Clone)]
pub struct NotionClient {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl NotionClient {
    /// 创建新的客户端
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.notion_api_base.clone(), config.notion_api_token.clone())
    }

    fn headers(&self) -> Result<HeaderMap, AppError> {
        let token = self
            .api_token
            .as_deref()
            .ok_or(AppError::Config(NOTION_API_TOKEN))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("notion-version", HeaderValue::from_static(NOTION_VERSION));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::try_from(format!("Bearer {}", token))
                .map_err(|_| AppError::InvalidInput("Invalid Notion API token".to_string()))?,
        );
        Ok(headers)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<T, AppError> {
        let headers = self.headers()?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .request(method, &url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Notion 的错误体形如 {"object":"error","code":...,"message":...}
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let reason = body
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| status.canonical_reason())
                .unwrap_or_default()
                .to_string();
            return Err(AppError::Upstream {
                service: "Notion",
                status: status.as_u16(),
                reason,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::InvalidResponse(e.to_string()))
    }

    /// 查询数据库，只返回第一页结果
    pub async fn query_database(
        &self,
        database_id: &str,
        query: &Value,
    ) -> Result<QueryResponse, AppError> {
        let response: QueryResponse = self
            .send(
                Method::POST,
                &format!("/databases/{}/query", database_id),
                query,
            )
            .await?;
        if response.has_more {
            log::debug!(
                "Query on {} returned {} results, further pages ignored",
                database_id,
                response.results.len()
            );
        }
        Ok(response)
    }

    /// 向 block（或页面）末尾追加子块，一次请求原子完成
    pub async fn append_block_children(
        &self,
        block_id: &str,
        children: Vec<Value>,
    ) -> Result<Value, AppError> {
        self.send(
            Method::PATCH,
            &format!("/blocks/{}/children", block_id),
            &json!({ "children": children }),
        )
        .await
    }

    /// 更新页面属性
    pub async fn update_page(
        &self,
        page_id: &str,
        properties: Value,
    ) -> Result<Value, AppError> {
        self.send(
            Method::PATCH,
            &format!("/pages/{}", page_id),
            &json!({ "properties": properties }),
        )
        .await
    }

    /// 在数据库中创建页面
    pub async fn create_page(
        &self,
        database_id: &str,
        properties: Value,
    ) -> Result<Value, AppError> {
        self.send(
            Method::POST,
            "/pages",
            &json!({
                "parent": { "database_id": database_id },
                "properties": properties
            }),
        )
        .await
    }
}
