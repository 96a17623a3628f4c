// ==========================================
// URL 重写导入 - 核心库
// ==========================================
// 功能: 将 CSV 文件批量导入为 URL 重写记录（可按多个店铺落库）
// 技术栈: Rust + SQLite + csv
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 值类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - CSV 读取与导入流程
pub mod importer;

// 配置层 - 导入默认值
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 导入接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    FlashLevel, ImportOutcome, ImportReport, LogicalField, NormalizedRecord, UrlRewrite,
};

// 导入层
pub use importer::{ColumnMap, ImportConfig, ImportEngine, ImportError, UrlRewriteImporter};

// 仓储
pub use repository::{UrlRewriteRepository, UrlRewriteRepositoryImpl};

// 配置
pub use config::{ConfigManager, ImportDefaultsReader};

// API
pub use api::{ApiError, FlashMessage, ImportApi, ImportApiResponse, ImportRequest};

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 名称
pub const APP_NAME: &str = "URL 重写导入";
