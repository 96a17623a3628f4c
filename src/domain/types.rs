// ==========================================
// URL 重写导入 - 领域类型定义
// ==========================================
// 五个逻辑字段: store_id / id_path / request_path / target_path / options
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 逻辑字段 (Logical Field)
// ==========================================
// 顺序即默认列顺序，也是行转换时的遍历顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    StoreId,     // 店铺范围
    IdPath,      // 规范 ID 路径
    RequestPath, // 请求路径
    TargetPath,  // 目标路径
    Options,     // 重定向选项
}

impl LogicalField {
    /// 默认顺序的全部字段
    pub const ALL: [LogicalField; 5] = [
        LogicalField::StoreId,
        LogicalField::IdPath,
        LogicalField::RequestPath,
        LogicalField::TargetPath,
        LogicalField::Options,
    ];

    /// 字段名（与请求参数 fields 中使用的名称一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalField::StoreId => "store_id",
            LogicalField::IdPath => "id_path",
            LogicalField::RequestPath => "request_path",
            LogicalField::TargetPath => "target_path",
            LogicalField::Options => "options",
        }
    }

    /// 按名称解析（大小写敏感，未知名称返回 None）
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "store_id" => Some(LogicalField::StoreId),
            "id_path" => Some(LogicalField::IdPath),
            "request_path" => Some(LogicalField::RequestPath),
            "target_path" => Some(LogicalField::TargetPath),
            "options" => Some(LogicalField::Options),
            _ => None,
        }
    }

    /// 默认字段名列表
    pub fn canonical_names() -> Vec<String> {
        Self::ALL.iter().map(|f| f.as_str().to_string()).collect()
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 提示消息级别 (Flash Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlashLevel {
    Success,
    Notice,
    Error,
}

impl fmt::Display for FlashLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashLevel::Success => write!(f, "SUCCESS"),
            FlashLevel::Notice => write!(f, "NOTICE"),
            FlashLevel::Error => write!(f, "ERROR"),
        }
    }
}
