//! SQLite 键值存储后端
//!
//! 单表 `kv_store`，每个键一行，值为 JSON 文本。

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::store::{KvBackend, StoreResult};

const INIT_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key        TEXT PRIMARY KEY NOT NULL,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

pub struct SqliteBackend {
    connection: Mutex<Connection>,
    db_path: String,
}

impl SqliteBackend {
    /// 打开数据库文件
    ///
    /// 启用 WAL 模式并创建表结构。
    pub fn open<P: AsRef<Path>>(db_path: P) -> StoreResult<Self> {
        let path_str = db_path.as_ref().to_string_lossy().to_string();
        let connection = Connection::open(&db_path)?;

        connection.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;

        let backend = Self {
            connection: Mutex::new(connection),
            db_path: path_str,
        };
        backend.initialize()?;

        Ok(backend)
    }

    /// 创建内存数据库（用于测试）
    pub fn in_memory() -> StoreResult<Self> {
        let backend = Self {
            connection: Mutex::new(Connection::open_in_memory()?),
            db_path: ":memory:".to_string(),
        };
        backend.initialize()?;

        Ok(backend)
    }

    pub fn initialize(&self) -> StoreResult<()> {
        self.connection.lock().execute_batch(INIT_SCHEMA)?;
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.db_path
    }
}

impl KvBackend for SqliteBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.connection.lock();
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self.connection.lock();
        conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, CURRENT_TIMESTAMP)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let conn = self.connection.lock();
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        let conn = self.connection.lock();
        conn.execute("DELETE FROM kv_store", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_value() {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.set("@settings", r#"{"theme":"light"}"#).unwrap();
        backend.set("@settings", r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(
            backend.get("@settings").unwrap().as_deref(),
            Some(r#"{"theme":"dark"}"#)
        );
    }

    #[test]
    fn test_missing_key_is_none() {
        let backend = SqliteBackend::in_memory().unwrap();
        assert_eq!(backend.get("@math_scores").unwrap(), None);
        assert_eq!(backend.path(), ":memory:");
    }

    #[test]
    fn test_remove_and_clear() {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.set("a", "1").unwrap();
        backend.set("b", "2").unwrap();

        backend.remove("a").unwrap();
        assert_eq!(backend.get("a").unwrap(), None);
        assert!(backend.get("b").unwrap().is_some());

        backend.clear().unwrap();
        assert_eq!(backend.get("b").unwrap(), None);
    }
}
