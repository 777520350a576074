use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 未配置 DB_DIR 时的数据目录
pub const DEFAULT_DB_DIR: &str = "./db";
pub const USER_DB_FILE: &str = "user.db";
pub const SESSION_DB_FILE: &str = "sess.db";
pub const DEFAULT_PRODUCTS_PATH: &str = "products.json";

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub user_db_path: PathBuf,
    pub session_db_path: PathBuf,
    pub products_path: PathBuf,
    pub session_alive_secs: u64,
    pub session_gc_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_db_dir(Path::new(DEFAULT_DB_DIR))
    }
}

impl Config {
    /// 两个键空间都放在同一个数据目录下的默认配置
    pub fn with_db_dir(dir: &Path) -> Self {
        Config {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            user_db_path: dir.join(USER_DB_FILE),
            session_db_path: dir.join(SESSION_DB_FILE),
            products_path: PathBuf::from(DEFAULT_PRODUCTS_PATH),
            session_alive_secs: 24 * 3600,
            session_gc_secs: 3600,
        }
    }

    /// 从环境变量（以及 .env 文件）加载配置，未设置的项使用默认值
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let db_dir = optional_var("DB_DIR")?.unwrap_or_else(|| DEFAULT_DB_DIR.to_string());
        let defaults = Self::with_db_dir(Path::new(&db_dir));

        let session_alive_secs = optional_var("SESSION_ALIVE_DURATION")?
            .map(|v| hours_to_secs(&v, defaults.session_alive_secs))
            .unwrap_or(defaults.session_alive_secs);
        let session_gc_secs = optional_var("SESSION_GC_INTERVAL")?
            .map(|v| hours_to_secs(&v, defaults.session_gc_secs))
            .unwrap_or(defaults.session_gc_secs);

        Ok(Config {
            server_host: optional_var("SERVER_HOST")?.unwrap_or(defaults.server_host),
            server_port: optional_var("SERVER_PORT")?
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            user_db_path: optional_var("USER_DB_PATH")?
                .map(PathBuf::from)
                .unwrap_or(defaults.user_db_path),
            session_db_path: optional_var("SESSION_DB_PATH")?
                .map(PathBuf::from)
                .unwrap_or(defaults.session_db_path),
            products_path: optional_var("PRODUCTS_PATH")?
                .map(PathBuf::from)
                .unwrap_or(defaults.products_path),
            session_alive_secs,
            session_gc_secs,
        })
    }

    pub fn session_alive(&self) -> Duration {
        Duration::from_secs(self.session_alive_secs)
    }

    pub fn session_gc_interval(&self) -> Duration {
        Duration::from_secs(self.session_gc_secs)
    }
}

/// 读取环境变量，未设置或为空时返回 None
fn optional_var(key: &str) -> Result<Option<String>, env::VarError> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(Some(v.trim().to_string())),
        Ok(_) | Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e),
    }
}

/// 把 "24h" 或 "24" 形式的小时数换算成秒
///
/// 无法解析、为 0 或换算溢出时返回默认秒数。
fn hours_to_secs(value: &str, default_secs: u64) -> u64 {
    value
        .trim_end_matches('h')
        .parse::<u64>()
        .ok()
        .filter(|hours| *hours > 0)
        .and_then(|hours| hours.checked_mul(3600))
        .unwrap_or(default_secs)
}
