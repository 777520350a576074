use serde::Serialize;

use crate::models::Session;

/// 保存会话令牌的 cookie 名
pub const SESSION_COOKIE: &str = "sessid";

#[derive(Debug, Serialize)]
pub struct SessPayload {
    pub sess: Session,
}
