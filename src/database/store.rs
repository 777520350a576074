use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use sqlx::SqlitePool;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqliteLockingMode, SqlitePoolOptions,
    SqliteSynchronous,
};

/// 其他进程持有锁时最多等待的时间
const LOCK_WAIT: Duration = Duration::from_millis(250);

/// 遍历时每次查询的记录数
const ITER_BATCH: i64 = 256;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key BLOB PRIMARY KEY NOT NULL,
    value BLOB NOT NULL
) WITHOUT ROWID;
CREATE TABLE IF NOT EXISTS kv_meta (
    name TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 无法打开：被其他进程锁定或文件损坏
    #[error("cannot open store at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    #[error("cannot create store directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store operation failed: {0}")]
    Backend(#[from] sqlx::Error),
}

/// 持久化、按键有序的字节键值存储
///
/// 每个逻辑键空间（用户、会话）各打开一个实例。底层是单文件 SQLite，
/// 连接池只有一个连接并使用独占锁模式，所有读写在这个连接上串行执行，
/// 同时阻止其他进程打开同一个文件。
#[derive(Clone)]
pub struct KvStore {
    pool: SqlitePool,
}

impl KvStore {
    /// 打开（必要时创建）指定位置的存储
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let unavailable = |source: sqlx::Error| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        };

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .locking_mode(SqliteLockingMode::Exclusive)
            .synchronous(SqliteSynchronous::Full)
            .busy_timeout(LOCK_WAIT);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(unavailable)?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(unavailable)?;

        // 写一次元数据，立即拿到独占锁
        sqlx::query(
            "INSERT INTO kv_meta (name, value) VALUES ('opened_at', ?)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        )
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&pool)
        .await
        .map_err(unavailable)?;

        tracing::info!("Opened store at {}", path.display());
        Ok(Self { pool })
    }

    pub async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        let value = sqlx::query_scalar::<_, Vec<u8>>("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    pub async fn put(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// 原子地插入不存在的键，键已存在时返回 false 且不修改原值
    pub async fn put_if_absent(&self, key: &[u8], value: &[u8]) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO NOTHING",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// 删除键，键不存在时同样成功
    pub async fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// 按键升序遍历全部记录
    ///
    /// 每次调用都是一次新的遍历。记录按批读取，每批查询完成后立即归还连接，
    /// 遍历期间可以照常读写；遍历中途写入的键是否出现取决于它相对游标的位置。
    pub fn iter(&self) -> BoxStream<'_, Result<Entry, StoreError>> {
        let pool = self.pool.clone();

        // 游标为 None 表示遍历结束，Some(None) 表示从头开始
        stream::try_unfold(Some(None), move |cursor| next_batch(pool.clone(), cursor))
            .map_ok(|rows| stream::iter(rows.into_iter().map(Ok::<_, StoreError>)))
            .try_flatten()
            .boxed()
    }

    /// 关闭连接并释放文件锁
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// 一条键值记录
pub type Entry = (Vec<u8>, Vec<u8>);

type Cursor = Option<Option<Vec<u8>>>;

/// 读取游标之后的一批记录，不足一批时说明已经到末尾
async fn next_batch(
    pool: SqlitePool,
    cursor: Cursor,
) -> Result<Option<(Vec<Entry>, Cursor)>, StoreError> {
    let Some(after) = cursor else {
        return Ok(None);
    };

    let rows = sqlx::query_as::<_, Entry>(
        "SELECT key, value FROM kv
         WHERE ? IS NULL OR key > ?
         ORDER BY key LIMIT ?",
    )
    .bind(after.clone())
    .bind(after)
    .bind(ITER_BATCH)
    .fetch_all(&pool)
    .await?;

    let next = match rows.last() {
        Some((key, _)) if rows.len() as i64 == ITER_BATCH => Some(Some(key.clone())),
        _ => None,
    };
    Ok(Some((rows, next)))
}
