use std::sync::Arc;

use chrono::Utc;
use futures_util::TryStreamExt;
use tokio::sync::Mutex;

use crate::database::store::KvStore;
use crate::error::AppError;
use crate::models::user::{CreateUserRequest, UpdateUserRequest, User};
use crate::utils::{check_password_len, derive_user_id, hash_password};

/// 用户存储库实现
///
/// 独占用户键空间：键是由用户名派生的ID，值是 JSON 编码的 [`User`]。
/// 创建和更新在同一把写锁下执行，进程内不会出现检查与写入交错。
#[derive(Clone)]
pub struct UserRepository {
    store: KvStore,
    write_lock: Arc<Mutex<()>>,
}

impl UserRepository {
    pub fn new(store: KvStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// 创建用户
    pub async fn create(&self, req: CreateUserRequest) -> Result<User, AppError> {
        if req.username.is_empty() {
            return Err(AppError::Validation("username is required".into()));
        }
        if req.password.is_empty() {
            return Err(AppError::Validation("password is required".into()));
        }
        check_password_len(&req.password)?;

        let id = derive_user_id(&req.username);
        let password = req.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let _guard = self.write_lock.lock().await;

        if self.store.get(id.as_bytes()).await?.is_some() {
            tracing::debug!("Username {} already registered", req.username);
            return Err(AppError::UsernameConflict);
        }

        let now = Utc::now();
        let user = User {
            id,
            username: req.username,
            password: password_hash,
            wechat_id: req.wechat_id,
            user_type: req.user_type,
            email: req.email,
            reg_time: now,
            update_time: now,
        };

        let value = serde_json::to_vec(&user)?;
        // 键已存在时不会覆盖原值
        if !self.store.put_if_absent(user.id.as_bytes(), &value).await? {
            return Err(AppError::UsernameConflict);
        }

        tracing::info!("Created user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// 根据ID查找用户
    pub async fn get(&self, id: &str) -> Result<User, AppError> {
        let data = self
            .store
            .get(id.as_bytes())
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok(serde_json::from_slice(&data)?)
    }

    /// 根据用户名查找用户
    pub async fn find_by_username(&self, username: &str) -> Result<User, AppError> {
        self.get(&derive_user_id(username)).await
    }

    /// 列出全部用户，按ID排序
    ///
    /// 无法解码的记录记录日志后跳过，不影响其余结果。
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let entries: Vec<(Vec<u8>, Vec<u8>)> = self.store.iter().try_collect().await?;

        let users = entries
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_slice::<User>(&value) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed user record {}: {}",
                        String::from_utf8_lossy(&key),
                        e
                    );
                    None
                }
            })
            .collect();

        Ok(users)
    }

    /// 更新用户，只覆盖请求中非空的字段
    pub async fn update(&self, id: &str, req: UpdateUserRequest) -> Result<User, AppError> {
        let password_hash = match req.password.filter(|p| !p.is_empty()) {
            Some(password) => {
                check_password_len(&password)?;
                Some(tokio::task::spawn_blocking(move || hash_password(&password)).await??)
            }
            None => None,
        };

        let _guard = self.write_lock.lock().await;

        let mut user = self.get(id).await?;

        if let Some(hash) = password_hash {
            user.password = hash;
        }
        if let Some(wechat_id) = req.wechat_id.filter(|v| !v.is_empty()) {
            user.wechat_id = wechat_id;
        }
        if let Some(user_type) = req.user_type.filter(|v| !v.is_empty()) {
            user.user_type = user_type;
        }
        if let Some(email) = req.email.filter(|v| !v.is_empty()) {
            user.email = email;
        }
        user.update_time = Utc::now();

        let value = serde_json::to_vec(&user)?;
        self.store.put(user.id.as_bytes(), &value).await?;

        tracing::info!("Updated user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// 删除用户，用户不存在时同样成功
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.store.delete(id.as_bytes()).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    /// 关闭底层存储
    pub async fn close(&self) {
        self.store.close().await;
    }
}
