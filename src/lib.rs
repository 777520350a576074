use std::sync::Arc;

use config::Config;
use database::{KvStore, StoreError, UserRepository};
use models::Catalog;
use session::SessionManager;

pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod result;
pub mod router;
pub mod session;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: UserRepository,
    pub sessions: Arc<SessionManager>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// 打开用户和会话两个存储，加载产品目录
    pub async fn open(config: Config) -> Result<Self, StoreError> {
        let user_store = KvStore::open(&config.user_db_path).await?;
        let session_store = KvStore::open(&config.session_db_path).await?;

        let users = UserRepository::new(user_store);
        let sessions = Arc::new(SessionManager::new(
            users.clone(),
            session_store,
            config.session_alive(),
            config.session_gc_interval(),
        ));
        let catalog = Arc::new(Catalog::load(&config.products_path));

        Ok(Self {
            config,
            users,
            sessions,
            catalog,
        })
    }
}
