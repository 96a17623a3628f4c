// ==========================================
// URL 重写导入 - 导入默认值读取 Trait
// ==========================================
// 职责: 定义导入参数默认值的读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::RepositoryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ==========================================
// ImportDefaults - 已配置的默认值
// ==========================================
// 每项为 None 时回落到内置默认值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDefaults {
    pub length: Option<usize>,
    pub delimiter: Option<String>,
    pub enclosure: Option<String>,
    pub escape: Option<String>,
    pub skipline: Option<bool>,
    pub store_ids: Option<String>,
    pub fields: Option<String>,
    pub id_path_pattern: Option<String>,
    pub options: Option<String>,
}

// ==========================================
// ImportDefaultsReader Trait
// ==========================================
// 实现者: ConfigManager（config_kv 表）、BuiltinDefaults
#[async_trait]
pub trait ImportDefaultsReader: Send + Sync {
    /// 读取导入参数默认值
    async fn get_import_defaults(&self) -> RepositoryResult<ImportDefaults>;
}

/// 不读取任何外部配置，全部使用内置默认值
pub struct BuiltinDefaults;

#[async_trait]
impl ImportDefaultsReader for BuiltinDefaults {
    async fn get_import_defaults(&self) -> RepositoryResult<ImportDefaults> {
        Ok(ImportDefaults::default())
    }
}
