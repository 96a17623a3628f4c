// ==========================================
// URL 重写导入 - 导入层
// ==========================================
// 职责: CSV → 重写记录
// 组件: 列映射 / 行转换 / MIME 校验 / CSV 读取 / 导入引擎
// ==========================================

// 模块声明
pub mod column_map;
pub mod csv_source;
pub mod error;
pub mod import_config;
pub mod import_engine;
pub mod importer_trait;
pub mod mime_gate;
pub mod row_transformer;

// 重导出核心类型
pub use column_map::ColumnMap;
pub use csv_source::{CsvRowSource, RawRow};
pub use error::{ImportError, ImportResult};
pub use import_config::{CsvDialect, ImportConfig, RowOverrides, DEFAULT_ID_PATH_PATTERN};
pub use import_engine::{ImportEngine, ImportRunState};
pub use mime_gate::ALLOWED_MIME_TYPES;
pub use row_transformer::{substitute_placeholders, RowTransformer as RowTransformerImpl};

// 重导出 Trait 接口
pub use importer_trait::{RowTransformer, UrlRewriteImporter};
