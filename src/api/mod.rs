// ==========================================
// URL 重写导入 - API 层
// ==========================================
// 职责: 提供导入接口,供命令行及上层传输层调用
// ==========================================

pub mod error;
pub mod import_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult, FlashMessage};
pub use import_api::{flash_messages, resolve_config, ImportApi, ImportApiResponse, ImportRequest};
