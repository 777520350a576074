use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};

/// 通用的API响应结构
///
/// 状态字段和业务数据平铺在同一层，例如
/// `{"success": true, "errno": 0, "errmsg": "", "user": {...}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct Resp<T> {
    pub success: bool,
    /// 失败时为 HTTP 状态码，成功时为 0
    pub errno: u16,
    pub errmsg: String,
    #[serde(flatten)]
    pub data: Option<T>,
}

pub fn success<T: Serialize>(data: T) -> Json<Resp<T>> {
    Json(Resp {
        success: true,
        errno: 0,
        errmsg: String::new(),
        data: Some(data),
    })
}

/// 没有业务数据的成功响应（删除、注销）
pub fn success_empty() -> Json<Resp<()>> {
    Json(Resp {
        success: true,
        errno: 0,
        errmsg: String::new(),
        data: None,
    })
}

pub fn failure(status: StatusCode, errmsg: String) -> Json<Resp<()>> {
    Json(Resp {
        success: false,
        errno: status.as_u16(),
        errmsg,
        data: None,
    })
}
