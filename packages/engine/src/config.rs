use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DB_FILE: &str = "xuetong.db";
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;
const DEFAULT_LOG_DIR: &str = "./logs";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_file: String,
    pub log_level: String,
    /// 文件日志目录，`None` 时只输出到 stdout
    pub log_dir: Option<PathBuf>,
    pub store_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_file: DEFAULT_DB_FILE.to_string(),
            log_level: "info".to_string(),
            log_dir: None,
            store_timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let data_dir = std::env::var("XUETONG_DATA_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let db_file = std::env::var("XUETONG_DB_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_FILE.to_string());

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = std::env::var("ENABLE_FILE_LOGS")
            .map(|value| is_enabled(&value))
            .unwrap_or(false)
            .then(|| {
                std::env::var("LOG_DIR")
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())
            })
            .map(PathBuf::from);

        let store_timeout_ms = std::env::var("XUETONG_STORE_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_STORE_TIMEOUT_MS);

        Self {
            data_dir,
            db_file,
            log_level,
            log_dir,
            store_timeout: Duration::from_millis(store_timeout_ms),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }
}

fn is_enabled(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("xuetong"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}
