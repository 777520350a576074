use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::error::AppError;

pub mod order;
pub mod product;
pub mod session;
pub mod user;

/// 请求体解析失败统一按参数错误返回
pub(crate) fn read_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(req)) => Ok(req),
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    }
}
