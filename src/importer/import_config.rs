// ==========================================
// URL 重写导入 - 导入参数
// ==========================================
// 职责: 请求参数 → 引擎可用的归一化配置
// 规则来源: 导入表单的参数约定
// ==========================================

use crate::domain::LogicalField;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};

/// 默认 id_path 模板
pub const DEFAULT_ID_PATH_PATTERN: &str = "custom/{time}/{id}";

/// 未指定店铺时的默认店铺
pub const DEFAULT_STORE_ID: u32 = 0;

// ==========================================
// CsvDialect - CSV 方言
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvDialect {
    pub max_length: usize, // 0 = 不限
    pub delimiter: u8,
    pub enclosure: u8,
    pub escape: u8,
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self {
            max_length: 0,
            delimiter: b',',
            enclosure: b'"',
            escape: b'\\',
        }
    }
}

// ==========================================
// RowOverrides - 请求级覆盖
// ==========================================
// 仅保存“已提供”的值（见 is_provided）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOverrides {
    pub id_path_pattern: Option<String>,
    pub options: Option<String>,
}

impl RowOverrides {
    pub fn new(id_path_pattern: Option<&str>, options: Option<&str>) -> Self {
        Self {
            id_path_pattern: id_path_pattern.filter(|v| is_provided(v)).map(str::to_string),
            options: options.filter(|v| is_provided(v)).map(str::to_string),
        }
    }
}

// ==========================================
// ImportConfig - 引擎配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub dialect: CsvDialect,
    pub skip_first_line: bool,
    pub store_ids: Vec<u32>, // 非空，按顺序逐个落库
    pub field_names: Vec<String>,
    pub overrides: RowOverrides,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            dialect: CsvDialect::default(),
            skip_first_line: false,
            store_ids: vec![DEFAULT_STORE_ID],
            field_names: LogicalField::canonical_names(),
            overrides: RowOverrides::default(),
        }
    }
}

// ==========================================
// 参数解析
// ==========================================

/// 覆盖值是否“已提供”
///
/// 空串与 "0" 均视为未提供。
pub fn is_provided(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

/// 解析逗号分隔的店铺 ID
///
/// 空项忽略；结果为空时返回默认店铺 [0]。保留顺序与重复项。
pub fn parse_store_ids(raw: &str) -> ImportResult<Vec<u32>> {
    let mut store_ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part
            .parse::<u32>()
            .map_err(|_| ImportError::InvalidStoreId(part.to_string()))?;
        store_ids.push(id);
    }

    if store_ids.is_empty() {
        store_ids.push(DEFAULT_STORE_ID);
    }
    Ok(store_ids)
}

/// 解析逗号分隔的字段名
///
/// 结果为空时返回五个默认字段名。
pub fn parse_field_names(raw: &str) -> Vec<String> {
    let names: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        LogicalField::canonical_names()
    } else {
        names
    }
}

/// 解析单字符方言参数（必须为单个 ASCII 字符）
pub fn parse_dialect_char(name: &str, raw: &str) -> ImportResult<u8> {
    match raw.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ImportError::InvalidDialect {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}
