// ==========================================
// SpaceNet 货运清单引擎 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一配置库的 PRAGMA 行为
// - 统一 busy_timeout，减少 CLI 与外部工具同时写配置时的 busy 错误
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 默认配置库文件名
pub const DEFAULT_DB_FILE_NAME: &str = "config.db";

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认配置库路径: <用户数据目录>/spacenet-manifest/config.db
///
/// 无法解析用户数据目录时回落到当前目录。
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("spacenet-manifest"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DB_FILE_NAME)
}
