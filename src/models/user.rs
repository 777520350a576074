use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::REDACTED;

/// 注册用户
///
/// 以 JSON 持久化，解码时忽略未知字段，缺失的可选字段取空字符串。
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    /// 由用户名派生，同时也是存储键
    pub id: String,
    pub username: String,
    /// bcrypt 哈希；离开进程前必须经过 [`User::redacted`]
    pub password: String,
    #[serde(default)]
    pub wechat_id: String,
    #[serde(default, rename = "type")]
    pub user_type: String,
    #[serde(default)]
    pub email: String,
    pub reg_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl User {
    /// 把密码替换为占位符，供传输层序列化前调用
    pub fn redacted(mut self) -> Self {
        self.password = REDACTED.to_string();
        self
    }
}

// 日志里不能出现密码哈希
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("wechat_id", &self.wechat_id)
            .field("type", &self.user_type)
            .field("email", &self.email)
            .field("reg_time", &self.reg_time)
            .field("update_time", &self.update_time)
            .finish_non_exhaustive()
    }
}

/// POST /users 的请求体
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub wechat_id: String,
    #[serde(default, rename = "type")]
    pub user_type: String,
    #[serde(default)]
    pub email: String,
}

/// PUT /users/{id} 的请求体，缺失或为空的字段保持原值
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub password: Option<String>,
    pub wechat_id: Option<String>,
    #[serde(rename = "type")]
    pub user_type: Option<String>,
    pub email: Option<String>,
}
