// ==========================================
// URL 重写导入 - 领域模型层
// ==========================================
// 职责: 定义字段、记录、运行结果等值类型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod import_run;
pub mod rewrite;
pub mod types;

// 重导出核心类型
pub use import_run::{ImportOutcome, ImportReport};
pub use rewrite::{NormalizedRecord, UrlRewrite, IMPORT_DESCRIPTION};
pub use types::{FlashLevel, LogicalField};
