use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 登录会话
///
/// `sess_id` 是随机生成的令牌，与用户ID无关；`username` 只是创建时的快照。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub sess_id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// POST /sess 的请求体
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
