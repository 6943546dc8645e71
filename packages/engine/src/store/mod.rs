//! 持久化记录存储模块
//!
//! 以键值对形式保存 JSON 序列化的记录集合与单例对象，支持：
//! - 按插入顺序读取、追加、整体覆盖、按位置删除
//! - 单例对象 (用户资料、设置) 的读写
//! - 每个键单写者：同一键上的读-改-写互斥执行，并发追加不会丢失记录
//! - 区分 "不存在" 与 "数据损坏"

// ============================================================
// 子模块声明
// ============================================================

pub mod memory;
pub mod models;
pub mod sqlite;

// ============================================================
// 重新导出主要类型
// ============================================================

pub use memory::MemoryBackend;
pub use models::*;
pub use sqlite::SqliteBackend;

// ============================================================
// 依赖导入
// ============================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::Config;

// ============================================================
// 错误类型定义
// ============================================================

/// 存储模块错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("数据损坏 ({key}): {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("无效记录: {0}")]
    InvalidRecord(String),

    #[error("索引越界 ({key}): {index} >= {len}")]
    IndexOutOfRange { key: String, index: usize, len: usize },

    /// 超时只表示调用方不再等待；后台写入可能随后仍然完成，
    /// 因此对 `append` 重试可能产生重复记录。
    #[error("存储操作超时 ({key}): {timeout_ms}ms")]
    Timeout { key: String, timeout_ms: u64 },

    #[error("后台任务失败: {0}")]
    Task(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ============================================================
// 存储键
// ============================================================

/// 有序记录集合的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    MathScores,
    LearningProgress,
    FavoriteStories,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 3] = [
        CollectionKey::MathScores,
        CollectionKey::LearningProgress,
        CollectionKey::FavoriteStories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKey::MathScores => "@math_scores",
            CollectionKey::LearningProgress => "@learning_progress",
            CollectionKey::FavoriteStories => "@favorite_stories",
        }
    }
}

/// 单例对象的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingletonKey {
    UserProfile,
    Settings,
    OnboardingCompleted,
}

impl SingletonKey {
    pub const ALL: [SingletonKey; 3] = [
        SingletonKey::UserProfile,
        SingletonKey::Settings,
        SingletonKey::OnboardingCompleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SingletonKey::UserProfile => "@user_profile",
            SingletonKey::Settings => "@settings",
            SingletonKey::OnboardingCompleted => "@onboarding_completed",
        }
    }
}

// ============================================================
// KvBackend - 底层键值存储
// ============================================================

/// 同步键值存储后端。值为序列化后的 JSON 字符串。
///
/// 实现只需保证单次调用原子；跨调用的读-改-写由 [`RecordStore`] 串行化。
pub trait KvBackend: Send + Sync + 'static {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    fn remove(&self, key: &str) -> StoreResult<()>;

    fn clear(&self) -> StoreResult<()>;
}

// ============================================================
// RecordStore - 类型化记录存储
// ============================================================

/// 记录存储
///
/// 克隆代价很低，所有克隆共享同一后端与同一组键锁。
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn KvBackend>,
    locks: Arc<Mutex<HashMap<&'static str, Arc<AsyncMutex<()>>>>>,
    timeout: Duration,
}

impl RecordStore {
    pub fn new(backend: Arc<dyn KvBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            locks: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    /// 打开 (必要时创建) 配置中的 SQLite 数据库
    pub fn open(config: &Config) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        let backend = SqliteBackend::open(config.db_path())?;
        tracing::info!(path = %config.db_path().display(), "record store opened");
        Ok(Self::new(Arc::new(backend), config.store_timeout))
    }

    /// 内存存储（用于测试）
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryBackend::new()),
            Config::default().store_timeout,
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ========== 集合操作 ==========

    /// 按插入顺序读取整个集合。键不存在时返回空集合。
    pub async fn read_all<T>(&self, key: CollectionKey) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let name = key.as_str();
        let records = self
            .run(name, (), move |backend| {
                let raw = backend.get(name)?;
                decode_collection::<T>(name, raw)
            })
            .await?;

        tracing::debug!(key = name, len = records.len(), "collection read");
        Ok(records)
    }

    /// 追加一条记录到集合末尾
    ///
    /// 返回 [`StoreError::Timeout`] 时写入可能已经落盘，重试前应先
    /// `read_all` 确认记录是否已存在。
    pub async fn append<T: Serialize>(&self, key: CollectionKey, record: &T) -> StoreResult<()> {
        let name = key.as_str();
        let value = serde_json::to_value(record)?;
        let guard = self.acquire(name).await?;

        let len = self
            .run(name, guard, move |backend| {
                let mut items = decode_collection::<Value>(name, backend.get(name)?)?;
                items.push(value);
                backend.set(name, &serde_json::to_string(&items)?)?;
                Ok(items.len())
            })
            .await?;

        tracing::debug!(key = name, len, "record appended");
        Ok(())
    }

    /// 用给定记录整体替换集合
    pub async fn overwrite<T: Serialize>(
        &self,
        key: CollectionKey,
        records: &[T],
    ) -> StoreResult<()> {
        let name = key.as_str();
        let payload = serde_json::to_string(records)?;
        let guard = self.acquire(name).await?;

        self.run(name, guard, move |backend| backend.set(name, &payload))
            .await?;

        tracing::debug!(key = name, len = records.len(), "collection overwritten");
        Ok(())
    }

    /// 删除集合中指定位置的记录
    pub async fn delete_at(&self, key: CollectionKey, index: usize) -> StoreResult<()> {
        let name = key.as_str();
        let guard = self.acquire(name).await?;

        self.run(name, guard, move |backend| {
            let mut items = decode_collection::<Value>(name, backend.get(name)?)?;
            if index >= items.len() {
                return Err(StoreError::IndexOutOfRange {
                    key: name.to_string(),
                    index,
                    len: items.len(),
                });
            }
            items.remove(index);
            backend.set(name, &serde_json::to_string(&items)?)
        })
        .await?;

        tracing::debug!(key = name, index, "record deleted");
        Ok(())
    }

    /// 清空单个集合，用于从数据损坏中恢复
    pub async fn reset_collection(&self, key: CollectionKey) -> StoreResult<()> {
        let name = key.as_str();
        let guard = self.acquire(name).await?;

        self.run(name, guard, move |backend| backend.remove(name))
            .await?;

        tracing::warn!(key = name, "collection reset");
        Ok(())
    }

    // ========== 单例操作 ==========

    pub async fn get<T>(&self, key: SingletonKey) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let name = key.as_str();
        self.run(name, (), move |backend| match backend.get(name)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| corrupt(name, source)),
            None => Ok(None),
        })
        .await
    }

    pub async fn set<T: Serialize>(&self, key: SingletonKey, value: &T) -> StoreResult<()> {
        let name = key.as_str();
        let payload = serde_json::to_string(value)?;
        let guard = self.acquire(name).await?;

        self.run(name, guard, move |backend| backend.set(name, &payload))
            .await
    }

    pub async fn remove(&self, key: SingletonKey) -> StoreResult<()> {
        let name = key.as_str();
        let guard = self.acquire(name).await?;

        self.run(name, guard, move |backend| backend.remove(name))
            .await
    }

    // ========== 重置 ==========

    /// 清空全部数据
    pub async fn reset(&self) -> StoreResult<()> {
        // 固定顺序获取所有键锁，避免与进行中的写入交错
        let mut guards = Vec::new();
        for name in CollectionKey::ALL
            .iter()
            .map(|k| k.as_str())
            .chain(SingletonKey::ALL.iter().map(|k| k.as_str()))
        {
            guards.push(self.acquire(name).await?);
        }

        self.run("*", guards, |backend| backend.clear()).await?;

        tracing::info!("record store reset");
        Ok(())
    }

    // ========== 内部工具 ==========

    fn key_lock(&self, name: &'static str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(name).or_default())
    }

    /// 获取键锁；等待时间同样受超时约束
    async fn acquire(&self, name: &'static str) -> StoreResult<OwnedMutexGuard<()>> {
        let lock = self.key_lock(name);
        tokio::time::timeout(self.timeout, lock.lock_owned())
            .await
            .map_err(|_| {
                tracing::error!(key = name, "timed out waiting for key lock");
                self.timeout_error(name)
            })
    }

    fn timeout_error(&self, name: &str) -> StoreError {
        StoreError::Timeout {
            key: name.to_string(),
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }

    /// 在阻塞线程池上执行后端操作，并施加超时。
    ///
    /// `guard` 随任务一起移动，任务结束后才释放，调用方超时返回也不会提前放锁。
    async fn run<G, F, R>(&self, name: &'static str, guard: G, op: F) -> StoreResult<R>
    where
        G: Send + 'static,
        F: FnOnce(&dyn KvBackend) -> StoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let task = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            op(backend.as_ref())
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => {
                if let Err(err) = &result {
                    match err {
                        StoreError::Corrupt { .. } => {
                            tracing::warn!(key = name, error = %err, "stored data is corrupt")
                        }
                        StoreError::Database(_) | StoreError::Io(_) => {
                            tracing::error!(key = name, error = %err, "store backend failed")
                        }
                        _ => {}
                    }
                }
                result
            }
            Ok(Err(join_err)) => {
                tracing::error!(key = name, error = %join_err, "store task failed");
                Err(StoreError::Task(join_err.to_string()))
            }
            Err(_) => {
                tracing::error!(key = name, "store operation timed out");
                Err(self.timeout_error(name))
            }
        }
    }
}

fn corrupt(name: &str, source: serde_json::Error) -> StoreError {
    StoreError::Corrupt {
        key: name.to_string(),
        source,
    }
}

fn decode_collection<T: DeserializeOwned>(name: &str, raw: Option<String>) -> StoreResult<Vec<T>> {
    match raw {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| corrupt(name, source)),
        None => Ok(Vec::new()),
    }
}
