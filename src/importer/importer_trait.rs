// ==========================================
// URL 重写导入 - 导入接口 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::{ImportReport, NormalizedRecord};
use crate::importer::column_map::ColumnMap;
use crate::importer::csv_source::RawRow;
use crate::importer::import_config::{ImportConfig, RowOverrides};
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// UrlRewriteImporter Trait
// ==========================================
// 用途: 导入主接口
// 实现者: ImportEngine
#[async_trait]
pub trait UrlRewriteImporter: Send + Sync {
    /// 从 CSV 文件导入 URL 重写
    ///
    /// # 参数
    /// - file_path: 已上传的临时文件（处理完成后删除）
    /// - config: 已归一化的导入参数
    ///
    /// # 返回
    /// - ImportReport: 计数与最后一条落库错误
    ///
    /// # 说明
    /// - 单条 (行, 店铺) 落库失败不中断导入
    /// - 文件无法打开时返回 stream_opened = false 的空报告
    async fn import_from_csv(&self, file_path: &Path, config: &ImportConfig) -> ImportReport;
}

// ==========================================
// RowTransformer Trait
// ==========================================
// 用途: 原始行 → 归一化记录
// 实现者: RowTransformerImpl
pub trait RowTransformer: Send + Sync {
    /// 转换一行
    ///
    /// # 参数
    /// - row: 原始行
    /// - columns: 列映射
    /// - overrides: 请求级覆盖（id_path 模板 / options）
    /// - timestamp: 运行开始时刻（{time}）
    /// - current_id: 当前序号（{id}）
    ///
    /// # 说明
    /// - 对任意输入都返回结果，不产生错误
    fn transform(
        &self,
        row: &RawRow,
        columns: &ColumnMap,
        overrides: &RowOverrides,
        timestamp: i64,
        current_id: u64,
    ) -> NormalizedRecord;
}
