// ==========================================
// URL 重写导入 - 行转换器实现
// ==========================================
// 职责: 原始行 + 列映射 → 归一化记录
// 规则:
// - id_path: 提供了模板 或 单元格缺失 → 使用模板（默认 custom/{time}/{id}）；
//            随后无条件替换 {time} / {id}
// - options: 提供了覆盖值 或 单元格缺失 → 使用覆盖值（默认空串）
// - 其余字段原样取值（缺失为 None）
// ==========================================

use crate::domain::{LogicalField, NormalizedRecord};
use crate::importer::column_map::ColumnMap;
use crate::importer::csv_source::RawRow;
use crate::importer::import_config::{RowOverrides, DEFAULT_ID_PATH_PATTERN};
use crate::importer::importer_trait::RowTransformer as RowTransformerTrait;

pub struct RowTransformer;

impl RowTransformerTrait for RowTransformer {
    fn transform(
        &self,
        row: &RawRow,
        columns: &ColumnMap,
        overrides: &RowOverrides,
        timestamp: i64,
        current_id: u64,
    ) -> NormalizedRecord {
        let fetch = |field: LogicalField| -> Option<String> {
            columns
                .index_of(field)
                .and_then(|index| row.cell(index))
                .map(str::to_string)
        };

        // id_path
        let id_path = match (&overrides.id_path_pattern, fetch(LogicalField::IdPath)) {
            (Some(pattern), _) => pattern.clone(),
            (None, Some(cell)) => cell,
            (None, None) => DEFAULT_ID_PATH_PATTERN.to_string(),
        };
        let id_path = substitute_placeholders(&id_path, timestamp, current_id);

        // options
        let options = match (&overrides.options, fetch(LogicalField::Options)) {
            (Some(value), _) => value.clone(),
            (None, Some(cell)) => cell,
            (None, None) => String::new(),
        };

        NormalizedRecord {
            store_id: fetch(LogicalField::StoreId),
            id_path,
            request_path: fetch(LogicalField::RequestPath),
            target_path: fetch(LogicalField::TargetPath),
            options,
        }
    }
}

/// 替换 {time} 与 {id} 占位符
///
/// 替换结果中不再含占位符，重复调用结果不变。
pub fn substitute_placeholders(value: &str, timestamp: i64, current_id: u64) -> String {
    value
        .replace("{time}", &timestamp.to_string())
        .replace("{id}", &current_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: i64 = 1_700_000_000;

    fn transform(row: &[&str], columns: &ColumnMap, overrides: &RowOverrides, id: u64) -> NormalizedRecord {
        let row: RawRow = row.iter().copied().collect();
        RowTransformer.transform(&row, columns, overrides, TS, id)
    }

    #[test]
    fn test_full_row_canonical_columns() {
        let record = transform(
            &["1", "product/5", "old.html", "catalog/product/view/id/5", "RP"],
            &ColumnMap::canonical(),
            &RowOverrides::default(),
            1,
        );

        assert_eq!(record.store_id.as_deref(), Some("1"));
        assert_eq!(record.id_path, "product/5");
        assert_eq!(record.request_path.as_deref(), Some("old.html"));
        assert_eq!(record.target_path.as_deref(), Some("catalog/product/view/id/5"));
        assert_eq!(record.options, "RP");
    }

    #[test]
    fn test_cell_placeholders_substituted() {
        let record = transform(
            &["0", "import/{time}-{id}", "a", "b", ""],
            &ColumnMap::canonical(),
            &RowOverrides::default(),
            42,
        );
        assert_eq!(record.id_path, "import/1700000000-42");
    }

    #[test]
    fn test_missing_id_path_uses_default_pattern() {
        let columns = ColumnMap::build(&["request_path", "target_path"]);
        let record = transform(&["a.html", "b.html"], &columns, &RowOverrides::default(), 7);

        assert_eq!(record.id_path, "custom/1700000000/7");
        assert_eq!(record.options, "");
        assert_eq!(record.store_id, None);
    }

    #[test]
    fn test_short_row_falls_back() {
        // id_path 列存在于映射中，但本行没有该单元格
        let record = transform(&["0"], &ColumnMap::canonical(), &RowOverrides::default(), 3);

        assert_eq!(record.id_path, "custom/1700000000/3");
        assert_eq!(record.request_path, None);
        assert_eq!(record.target_path, None);
        assert_eq!(record.options, "");
    }

    #[test]
    fn test_id_path_override_beats_cell() {
        let overrides = RowOverrides::new(Some("legacy/{id}"), None);
        let record = transform(&["0", "from-csv", "a", "b", ""], &ColumnMap::canonical(), &overrides, 9);
        assert_eq!(record.id_path, "legacy/9");
    }

    #[test]
    fn test_options_override_beats_cell() {
        let overrides = RowOverrides::new(None, Some("R"));
        let record = transform(&["0", "x", "a", "b", "RP"], &ColumnMap::canonical(), &overrides, 1);
        assert_eq!(record.options, "R");
    }

    #[test]
    fn test_zero_override_is_not_provided() {
        let overrides = RowOverrides::new(Some("0"), Some("0"));
        let record = transform(&["0", "x", "a", "b", "RP"], &ColumnMap::canonical(), &overrides, 1);
        assert_eq!(record.id_path, "x");
        assert_eq!(record.options, "RP");
    }

    #[test]
    fn test_empty_id_path_cell_is_kept() {
        let record = transform(&["0", "", "a", "b", ""], &ColumnMap::canonical(), &RowOverrides::default(), 1);
        assert_eq!(record.id_path, "");
    }

    #[test]
    fn test_substitution_idempotent() {
        let once = substitute_placeholders("p/{time}/{id}/{id}", TS, 5);
        let twice = substitute_placeholders(&once, TS, 99);
        assert_eq!(once, "p/1700000000/5/5");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_substitution_noop_without_placeholders() {
        assert_eq!(substitute_placeholders("plain/path", TS, 1), "plain/path");
    }
}
