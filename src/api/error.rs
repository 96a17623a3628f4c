// ==========================================
// URL 重写导入 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换导入/仓储错误为用户可读的错误消息
// 说明: 仅 UploadMissing / MimeRejected / InvalidInput 会在读取任何行之前中止导入
// ==========================================

use crate::domain::FlashLevel;
use crate::i18n::{t, t_with_args};
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 上传校验错误
    // ==========================================
    #[error("上传文件不存在: {0}")]
    UploadMissing(String),

    #[error("MIME 类型不允许: {0}")]
    MimeRejected(String),

    // ==========================================
    // 参数错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 提示消息
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn new(level: FlashLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl ApiError {
    /// 转换为面向用户的提示消息
    pub fn to_flash(&self) -> FlashMessage {
        let text = match self {
            ApiError::UploadMissing(_) => t("import.upload_missing"),
            ApiError::MimeRejected(mime) => t_with_args("import.mime_rejected", &[("mime", mime.as_str())]),
            other => other.to_string(),
        };
        FlashMessage::new(FlashLevel::Error, text)
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::UploadMissing(path),
            ImportError::InvalidDialect { .. } | ImportError::InvalidStoreId(_) => {
                ApiError::InvalidInput(err.to_string())
            }
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("配置项 {} 无效: {}", field, message))
            }
            RepositoryError::Other(e) => ApiError::Other(e),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

/// API 层 Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
