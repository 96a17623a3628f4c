// ==========================================
// URL 重写导入 - 重写记录 Repository Trait
// ==========================================
// 职责: 定义重写记录持久化接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::UrlRewrite;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::sync::Arc;

// ==========================================
// UrlRewriteRepository Trait
// ==========================================
// 实现者: UrlRewriteRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait UrlRewriteRepository: Send + Sync {
    /// 保存一条重写记录
    ///
    /// # 返回
    /// - Ok(i64): 新记录 ID
    /// - Err: 约束冲突、数据库错误等（由调用方决定是否继续）
    async fn save(&self, rewrite: &UrlRewrite) -> RepositoryResult<i64>;
}

#[async_trait]
impl<T> UrlRewriteRepository for Arc<T>
where
    T: UrlRewriteRepository + ?Sized,
{
    async fn save(&self, rewrite: &UrlRewrite) -> RepositoryResult<i64> {
        (**self).save(rewrite).await
    }
}
