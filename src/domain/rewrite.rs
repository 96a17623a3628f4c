// ==========================================
// URL 重写导入 - 重写记录实体
// ==========================================
// NormalizedRecord: 单行转换结果（仅在当前行处理期间存在）
// UrlRewrite: 单行 × 单店铺 的落库对象（存储由仓储层负责）
// ==========================================

use serde::{Deserialize, Serialize};

/// 导入记录固定描述
pub const IMPORT_DESCRIPTION: &str = "URL rewrite import";

// ==========================================
// NormalizedRecord - 行转换结果
// ==========================================
// id_path / options 在转换后必有值；其余字段 None 表示“未提供”
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub store_id: Option<String>, // 落库时被全局店铺列表覆盖
    pub id_path: String,
    pub request_path: Option<String>,
    pub target_path: Option<String>,
    pub options: String,
}

// ==========================================
// UrlRewrite - 重写记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRewrite {
    pub store_id: u32,
    pub id_path: String,
    pub request_path: Option<String>,
    pub target_path: Option<String>,
    pub options: String,
    pub description: String,
    pub is_system: bool,
}

impl UrlRewrite {
    /// 由行转换结果构造导入记录（is_system 恒为 false）
    pub fn imported(record: &NormalizedRecord, store_id: u32) -> Self {
        Self {
            store_id,
            id_path: record.id_path.clone(),
            request_path: record.request_path.clone(),
            target_path: record.target_path.clone(),
            options: record.options.clone(),
            description: IMPORT_DESCRIPTION.to_string(),
            is_system: false,
        }
    }
}
