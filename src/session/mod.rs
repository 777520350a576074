use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::database::UserRepository;
use crate::database::store::KvStore;
use crate::error::AppError;
use crate::models::session::Session;
use crate::utils::verify_password;

/// 清理周期为 0 时使用的周期
const DEFAULT_GC_INTERVAL: Duration = Duration::from_secs(3600);

/// 会话管理
///
/// 会话保存在独立的键空间里，键是随机令牌，值是 JSON 编码的 [`Session`]。
/// 用户信息只通过 [`UserRepository`] 的读接口获取。
pub struct SessionManager {
    users: UserRepository,
    store: KvStore,
    alive: chrono::Duration,
    gc_interval: Duration,
}

impl SessionManager {
    pub fn new(
        users: UserRepository,
        store: KvStore,
        alive: Duration,
        gc_interval: Duration,
    ) -> Self {
        Self {
            users,
            store,
            alive: chrono::Duration::from_std(alive).unwrap_or(chrono::Duration::MAX),
            gc_interval: if gc_interval.is_zero() {
                tracing::warn!(
                    "Session GC interval is zero, using {:?}",
                    DEFAULT_GC_INTERVAL
                );
                DEFAULT_GC_INTERVAL
            } else {
                gc_interval
            },
        }
    }

    /// 校验用户名和密码，成功后签发新会话
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        if username.is_empty() {
            return Err(AppError::Validation("username is required".into()));
        }

        let user = self.users.find_by_username(username).await?;

        let hashed = user.password;
        let password = password.to_owned();
        let matched =
            tokio::task::spawn_blocking(move || verify_password(&password, &hashed)).await??;
        if !matched {
            tracing::info!("Incorrect password for user {}", username);
            return Err(AppError::IncorrectLogin);
        }

        let now = Utc::now();
        let session = Session {
            sess_id: Uuid::new_v4().simple().to_string(),
            username: user.username,
            created_at: now,
            expires_at: now
                .checked_add_signed(self.alive)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let value = serde_json::to_vec(&session)?;
        self.store.put(session.sess_id.as_bytes(), &value).await?;

        tracing::info!("User {} logged in", session.username);
        Ok(session)
    }

    /// 注销会话，会话不存在时同样成功
    pub async fn logout(&self, sess_id: &str) -> Result<(), AppError> {
        self.store.delete(sess_id.as_bytes()).await?;
        tracing::debug!("Session {} removed", sess_id);
        Ok(())
    }

    /// 查询会话，已过期但尚未清理的会话同样视为不存在
    pub async fn get(&self, sess_id: &str) -> Result<Option<Session>, AppError> {
        let Some(data) = self.store.get(sess_id.as_bytes()).await? else {
            return Ok(None);
        };

        let session: Session = serde_json::from_slice(&data)?;
        if session.is_expired(Utc::now()) {
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// 清理过期会话，返回清理数量
    ///
    /// 无法解码的会话同样会被清理。
    pub async fn sweep_expired(&self) -> Result<usize, AppError> {
        let now = Utc::now();
        let entries: Vec<(Vec<u8>, Vec<u8>)> = self.store.iter().try_collect().await?;

        let expired: Vec<Vec<u8>> = entries
            .into_iter()
            .filter_map(|(key, value)| match serde_json::from_slice::<Session>(&value) {
                Ok(session) if session.is_expired(now) => Some(key),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(
                        "Dropping malformed session {}: {}",
                        String::from_utf8_lossy(&key),
                        e
                    );
                    Some(key)
                }
            })
            .collect();

        for key in &expired {
            self.store.delete(key).await?;
        }

        if !expired.is_empty() {
            tracing::info!("Session GC removed {} sessions", expired.len());
        }
        Ok(expired.len())
    }

    /// 启动后台定时清理任务
    pub fn spawn_gc(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(manager.gc_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 第一次 tick 立即返回
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = manager.sweep_expired().await {
                    tracing::error!("Session GC failed: {}", e);
                }
            }
        })
    }

    /// 关闭会话存储
    pub async fn close(&self) {
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::CreateUserRequest;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: KvStore,
        users: UserRepository,
    }

    async fn setup() -> Fixture {
        let dir = TempDir::new().unwrap();
        let user_store = KvStore::open(dir.path().join("user.db")).await.unwrap();
        let store = KvStore::open(dir.path().join("sess.db")).await.unwrap();
        let users = UserRepository::new(user_store);
        users
            .create(CreateUserRequest {
                username: "bob".into(),
                password: "password".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        Fixture {
            _dir: dir,
            store,
            users,
        }
    }

    fn manager(fixture: &Fixture, alive: Duration, gc_interval: Duration) -> Arc<SessionManager> {
        Arc::new(SessionManager::new(
            fixture.users.clone(),
            fixture.store.clone(),
            alive,
            gc_interval,
        ))
    }

    #[tokio::test]
    async fn login_issues_token_unrelated_to_user_id() {
        let fixture = setup().await;
        let sessions = manager(&fixture, Duration::from_secs(3600), Duration::from_secs(3600));

        let session = sessions.login("bob", "password").await.unwrap();
        let user = fixture.users.find_by_username("bob").await.unwrap();

        assert!(!session.sess_id.is_empty());
        assert_ne!(session.sess_id, user.id);
        assert_eq!(session.username, "bob");
        assert!(session.expires_at > session.created_at);

        let other = sessions.login("bob", "password").await.unwrap();
        assert_ne!(session.sess_id, other.sess_id);

        let found = sessions.get(&session.sess_id).await.unwrap().unwrap();
        assert_eq!(found.username, "bob");
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let fixture = setup().await;
        let sessions = manager(&fixture, Duration::from_secs(3600), Duration::from_secs(3600));

        assert!(matches!(
            sessions.login("bob", "wrong").await,
            Err(AppError::IncorrectLogin)
        ));
        assert!(matches!(
            sessions.login("nobody", "password").await,
            Err(AppError::UserNotFound)
        ));
        assert!(matches!(
            sessions.login("", "password").await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn logout_removes_session() {
        let fixture = setup().await;
        let sessions = manager(&fixture, Duration::from_secs(3600), Duration::from_secs(3600));

        let session = sessions.login("bob", "password").await.unwrap();
        sessions.logout(&session.sess_id).await.unwrap();
        assert!(sessions.get(&session.sess_id).await.unwrap().is_none());

        sessions.logout(&session.sess_id).await.unwrap();
        sessions.logout("unknown-session").await.unwrap();
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_sessions() {
        let fixture = setup().await;
        let short = manager(&fixture, Duration::from_millis(50), Duration::from_secs(3600));
        let long = manager(&fixture, Duration::from_secs(3600), Duration::from_secs(3600));

        let expiring = short.login("bob", "password").await.unwrap();
        let lasting = long.login("bob", "password").await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(short.get(&expiring.sess_id).await.unwrap().is_none());

        assert_eq!(short.sweep_expired().await.unwrap(), 1);
        assert!(fixture.store.get(expiring.sess_id.as_bytes()).await.unwrap().is_none());
        assert!(long.get(&lasting.sess_id).await.unwrap().is_some());

        assert_eq!(short.sweep_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn sweep_drops_malformed_sessions() {
        let fixture = setup().await;
        let sessions = manager(&fixture, Duration::from_secs(3600), Duration::from_secs(3600));

        fixture.store.put(b"garbage", b"not a session").await.unwrap();
        assert_eq!(sessions.sweep_expired().await.unwrap(), 1);
        assert!(fixture.store.get(b"garbage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn background_gc_removes_expired_sessions() {
        let fixture = setup().await;
        let sessions = manager(&fixture, Duration::from_millis(20), Duration::from_millis(50));

        let session = sessions.login("bob", "password").await.unwrap();
        let gc = sessions.spawn_gc();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(fixture.store.get(session.sess_id.as_bytes()).await.unwrap().is_none());

        gc.abort();
    }

    #[tokio::test]
    async fn zero_gc_interval_keeps_task_running() {
        let fixture = setup().await;
        let sessions = manager(&fixture, Duration::from_secs(1), Duration::ZERO);

        assert_eq!(sessions.gc_interval, DEFAULT_GC_INTERVAL);

        let gc = sessions.spawn_gc();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!gc.is_finished());

        gc.abort();
    }
}
