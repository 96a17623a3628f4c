// ==========================================
// URL 重写导入 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表（幂等）
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "URL_REWRITE_DB";

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
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

/// 默认数据库路径
///
/// 优先读取环境变量 URL_REWRITE_DB；否则使用用户数据目录，
/// 无法获取数据目录时回退到当前目录。
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./url_rewrite.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("url-rewrite-importer");
        // 目录创建失败时由打开连接报错
        let _ = std::fs::create_dir_all(&dir);
        path = dir.join("url_rewrite.db");
    }

    path.to_string_lossy().to_string()
}

/// 创建 config_kv 与 core_url_rewrite 表（已存在则跳过）
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS core_url_rewrite (
            url_rewrite_id INTEGER PRIMARY KEY AUTOINCREMENT,
            store_id INTEGER NOT NULL DEFAULT 0,
            id_path TEXT,
            request_path TEXT NOT NULL,
            target_path TEXT NOT NULL,
            is_system INTEGER NOT NULL DEFAULT 1,
            options TEXT,
            description TEXT,
            UNIQUE (id_path, is_system, store_id),
            UNIQUE (request_path, store_id)
        );
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('config_kv', 'core_url_rewrite')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_default_db_path() {
        let path = default_db_path();
        assert!(!path.is_empty());
    }
}
