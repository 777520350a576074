use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::database::store::StoreError;
use crate::result::failure;

/// 核心层统一错误类型
///
/// 存储引擎自身的错误不会直接暴露给调用方，统一转换为 `StoreUnavailable`，
/// 存储层的 "key 不存在" 由仓库转换为 `UserNotFound`。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 请求字段缺失或格式错误
    #[error("{0}")]
    Validation(String),

    #[error("duplicated username")]
    UsernameConflict,

    #[error("user not found")]
    UserNotFound,

    #[error("incorrect username or password")]
    IncorrectLogin,

    /// 存储不可用，启动时致命，请求时返回 503
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("hashing error: {0}")]
    Hashing(String),

    /// 单条记录无法解码
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UsernameConflict => StatusCode::CONFLICT,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::IncorrectLogin => StatusCode::UNAUTHORIZED,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Hashing(_) | AppError::MalformedRecord(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        match e {
            bcrypt::BcryptError::Truncation(_) => AppError::Validation(e.to_string()),
            e => AppError::Hashing(e.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Hashing(format!("hashing task failed: {}", e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, failure(status, self.to_string())).into_response()
    }
}
