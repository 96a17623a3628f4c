// ==========================================
// URL 重写导入 - 配置层
// ==========================================
// 职责: 导入参数默认值管理（请求值 > config_kv > 内置默认）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_defaults;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_defaults::{BuiltinDefaults, ImportDefaults, ImportDefaultsReader};
