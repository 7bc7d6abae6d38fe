//! 统一错误类型
//!
//! 所有上游调用与协作操作共用一个错误枚举，
//! 由 HTTP 层统一转换为 `{"status": "error", "message": ...}` 响应。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// 必需的配置项缺失
    #[error("{0} is not defined")]
    Config(&'static str),

    /// 上游服务返回非成功状态码
    #[error("{service} API error: {status} {reason}")]
    Upstream {
        service: &'static str,
        status: u16,
        reason: String,
    },

    /// 网络层错误
    #[error("Network error: {0}")]
    Network(String),

    /// 响应体无法解析
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 记录缺失或类型不符
    #[error("{0}")]
    Shape(String),

    /// 调用方输入不合法
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Create a shape/contract error
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// 获取对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            status: "error",
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Config("TOGGL_API_TOKEN");
        assert_eq!(err.to_string(), "TOGGL_API_TOKEN is not defined");

        let err = AppError::Upstream {
            service: "Toggl",
            status: 403,
            reason: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "Toggl API error: 403 Forbidden");

        let err = AppError::shape("Project not found");
        assert_eq!(err.to_string(), "Project not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Config("NOTION_API_TOKEN").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::InvalidInput("title".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_response_serialization() {
        let err = AppError::shape("Latest item in journal database is not a page");
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Latest item in journal database is not a page");
    }
}
