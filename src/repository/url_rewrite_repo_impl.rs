// ==========================================
// URL 重写导入 - 重写记录 Repository 实现
// ==========================================
// 职责: 实现 core_url_rewrite 表的数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::UrlRewrite;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::url_rewrite_repo::UrlRewriteRepository;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// UrlRewriteRepositoryImpl
// ==========================================
pub struct UrlRewriteRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl UrlRewriteRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（表不存在时自动创建）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA，幂等）
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

    /// 统计记录数
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.lock()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM core_url_rewrite", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 按 (店铺, 请求路径) 查询
    pub fn find_by_request_path(
        &self,
        store_id: u32,
        request_path: &str,
    ) -> RepositoryResult<Option<UrlRewrite>> {
        let conn = self.lock()?;
        let rewrite = conn
            .query_row(
                r#"
                SELECT store_id, id_path, request_path, target_path, options, description, is_system
                FROM core_url_rewrite
                WHERE store_id = ?1 AND request_path = ?2
                "#,
                params![store_id, request_path],
                map_row,
            )
            .optional()?;
        Ok(rewrite)
    }

    /// 查询指定店铺的全部记录（按 ID 升序）
    pub fn list_by_store(&self, store_id: u32) -> RepositoryResult<Vec<UrlRewrite>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT store_id, id_path, request_path, target_path, options, description, is_system
            FROM core_url_rewrite
            WHERE store_id = ?1
            ORDER BY url_rewrite_id
            "#,
        )?;

        let rewrites = stmt
            .query_map(params![store_id], map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rewrites)
    }
}

#[async_trait]
impl UrlRewriteRepository for UrlRewriteRepositoryImpl {
    async fn save(&self, rewrite: &UrlRewrite) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO core_url_rewrite (
                store_id, id_path, request_path, target_path, is_system, options, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                rewrite.store_id,
                rewrite.id_path,
                rewrite.request_path,
                rewrite.target_path,
                rewrite.is_system,
                rewrite.options,
                rewrite.description,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<UrlRewrite> {
    Ok(UrlRewrite {
        store_id: row.get(0)?,
        id_path: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        request_path: row.get(2)?,
        target_path: row.get(3)?,
        options: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        description: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        is_system: row.get(6)?,
    })
}
