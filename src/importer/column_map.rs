// ==========================================
// URL 重写导入 - 列映射
// ==========================================
// 职责: 逻辑字段名 → 行内列下标
// 规则: 同名字段后出现者覆盖先出现者；未列出的字段为“未映射”
// ==========================================

use crate::domain::LogicalField;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    store_id: Option<usize>,
    id_path: Option<usize>,
    request_path: Option<usize>,
    target_path: Option<usize>,
    options: Option<usize>,
}

impl ColumnMap {
    /// 由有序字段名列表构建映射
    ///
    /// 未知字段名占用其位置但不映射到任何逻辑字段。
    pub fn build<S: AsRef<str>>(field_names: &[S]) -> Self {
        let mut map = Self::default();
        for (index, name) in field_names.iter().enumerate() {
            if let Some(field) = LogicalField::from_name(name.as_ref()) {
                *map.slot_mut(field) = Some(index);
            }
        }
        map
    }

    /// 默认映射: 五个字段依次对应第 0..4 列
    pub fn canonical() -> Self {
        Self::build(&LogicalField::canonical_names())
    }

    /// 字段对应的列下标；None 表示未映射
    pub fn index_of(&self, field: LogicalField) -> Option<usize> {
        match field {
            LogicalField::StoreId => self.store_id,
            LogicalField::IdPath => self.id_path,
            LogicalField::RequestPath => self.request_path,
            LogicalField::TargetPath => self.target_path,
            LogicalField::Options => self.options,
        }
    }

    fn slot_mut(&mut self, field: LogicalField) -> &mut Option<usize> {
        match field {
            LogicalField::StoreId => &mut self.store_id,
            LogicalField::IdPath => &mut self.id_path,
            LogicalField::RequestPath => &mut self.request_path,
            LogicalField::TargetPath => &mut self.target_path,
            LogicalField::Options => &mut self.options,
        }
    }
}
