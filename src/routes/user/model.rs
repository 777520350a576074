use serde::Serialize;

use crate::models::User;

/// 单个用户的响应数据，密码已脱敏
#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UsersPayload {
    pub users: Vec<User>,
}

impl From<User> for UserPayload {
    fn from(user: User) -> Self {
        Self {
            user: user.redacted(),
        }
    }
}

impl From<Vec<User>> for UsersPayload {
    fn from(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(User::redacted).collect(),
        }
    }
}
