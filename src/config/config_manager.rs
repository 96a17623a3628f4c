// ==========================================
// URL 重写导入 - 配置管理器
// ==========================================
// 职责: 导入参数默认值的加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_defaults::{ImportDefaults, ImportDefaultsReader};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 配置键
pub mod config_keys {
    pub const LENGTH: &str = "import/length";
    pub const DELIMITER: &str = "import/delimiter";
    pub const ENCLOSURE: &str = "import/enclosure";
    pub const ESCAPE: &str = "import/escape";
    pub const SKIPLINE: &str = "import/skipline";
    pub const STORE_IDS: &str = "import/store_ids";
    pub const FIELDS: &str = "import/fields";
    pub const ID_PATH_PATTERN: &str = "import/id_path_pattern";
    pub const OPTIONS: &str = "import/options";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取 import/ 前缀下的全部配置
    fn load_import_values(&self) -> RepositoryResult<HashMap<String, String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' AND key LIKE 'import/%'",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut values = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            values.insert(key, value);
        }
        Ok(values)
    }
}

#[async_trait]
impl ImportDefaultsReader for ConfigManager {
    async fn get_import_defaults(&self) -> RepositoryResult<ImportDefaults> {
        let mut values = self.load_import_values()?;
        let mut take = |key: &str| values.remove(key);

        let length = match take(config_keys::LENGTH) {
            None => None,
            Some(raw) => Some(raw.trim().parse::<usize>().map_err(|_| {
                RepositoryError::FieldValueError {
                    field: config_keys::LENGTH.to_string(),
                    message: format!("无法解析为非负整数: {}", raw),
                }
            })?),
        };

        let skipline = match take(config_keys::SKIPLINE) {
            None => None,
            Some(raw) => Some(parse_flag(config_keys::SKIPLINE, &raw)?),
        };

        Ok(ImportDefaults {
            length,
            delimiter: take(config_keys::DELIMITER),
            enclosure: take(config_keys::ENCLOSURE),
            escape: take(config_keys::ESCAPE),
            skipline,
            store_ids: take(config_keys::STORE_IDS),
            fields: take(config_keys::FIELDS),
            id_path_pattern: take(config_keys::ID_PATH_PATTERN),
            options: take(config_keys::OPTIONS),
        })
    }
}

fn parse_flag(key: &str, raw: &str) -> RepositoryResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RepositoryError::FieldValueError {
            field: key.to_string(),
            message: format!("无法解析为布尔值: {}", raw),
        }),
    }
}
