// ==========================================
// URL 重写导入 - 导入引擎实现
// ==========================================
// 职责: 整合导入流程，从文件到仓储
// 流程: 打开文件 → 逐行读取 → 行转换 → 逐店铺落库 → 清理文件 → 汇总
// 说明: 严格串行；单条 (行, 店铺) 失败只计数，不中断导入
//       文件读取放在阻塞线程池，逐行取回
// ==========================================

use crate::domain::{ImportReport, UrlRewrite};
use crate::importer::column_map::ColumnMap;
use crate::importer::csv_source::{CsvRowSource, RawRow};
use crate::importer::import_config::ImportConfig;
use crate::importer::importer_trait::{RowTransformer, UrlRewriteImporter};
use crate::importer::row_transformer::RowTransformer as RowTransformerImpl;
use crate::repository::UrlRewriteRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ImportRunState - 单次运行状态
// ==========================================
// 每次运行新建，不跨运行共享
#[derive(Debug, Clone)]
pub struct ImportRunState {
    pub run_id: String,
    pub timestamp: i64,
    pub current_id: u64,
    pub columns: ColumnMap,
    pub total: u64,
    pub total_success: u64,
    pub last_error: String,
}

impl ImportRunState {
    pub fn new(columns: ColumnMap, timestamp: i64) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            timestamp,
            current_id: 1,
            columns,
            total: 0,
            total_success: 0,
            last_error: String::new(),
        }
    }

    /// 一次落库成功: 成功数 +1，序号 +1
    pub fn record_success(&mut self) {
        self.total_success += 1;
        self.current_id += 1;
    }

    /// 一次落库失败: 仅记录错误信息
    pub fn record_failure(&mut self, message: String) {
        self.last_error = message;
    }

    pub fn into_report(self, stream_opened: bool) -> ImportReport {
        ImportReport {
            run_id: self.run_id,
            timestamp: self.timestamp,
            total: self.total,
            total_success: self.total_success,
            current_id: self.current_id,
            last_error: (!self.last_error.is_empty()).then_some(self.last_error),
            stream_opened,
        }
    }
}

// ==========================================
// ImportEngine - 导入引擎
// ==========================================
pub struct ImportEngine<R>
where
    R: UrlRewriteRepository,
{
    // 持久化协作者
    repo: R,

    // 行转换器
    transformer: Box<dyn RowTransformer>,

    // 时钟（秒）
    clock: fn() -> i64,
}

impl<R> ImportEngine<R>
where
    R: UrlRewriteRepository,
{
    /// 创建新的 ImportEngine 实例
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            transformer: Box::new(RowTransformerImpl),
            clock: unix_now,
        }
    }

    /// 替换行转换器
    pub fn with_transformer(mut self, transformer: Box<dyn RowTransformer>) -> Self {
        self.transformer = transformer;
        self
    }

    /// 替换时钟（用于固定 {time}）
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 转换一行并逐店铺落库
    async fn import_row(&self, state: &mut ImportRunState, row: &RawRow, config: &ImportConfig) {
        if row.is_empty() {
            debug!(line = row.line(), "空行，所有字段按缺失处理");
        }

        // 序号在本行落库前取值
        let record = self.transformer.transform(
            row,
            &state.columns,
            &config.overrides,
            state.timestamp,
            state.current_id,
        );
        debug!(line = row.line(), id_path = %record.id_path, "行转换完成");

        let template = UrlRewrite::imported(&record, 0);
        self.persist_row(state, template, &config.store_ids, row.line())
            .await;
    }

    /// 逐店铺落库一行
    async fn persist_row(
        &self,
        state: &mut ImportRunState,
        rewrite_template: UrlRewrite,
        store_ids: &[u32],
        line: u64,
    ) {
        for &store_id in store_ids {
            let rewrite = UrlRewrite {
                store_id,
                ..rewrite_template.clone()
            };

            match self.repo.save(&rewrite).await {
                Ok(rewrite_id) => {
                    debug!(line, store_id, rewrite_id, id_path = %rewrite.id_path, "URL 重写已保存");
                    state.record_success();
                }
                Err(e) => {
                    warn!(line, store_id, error = %e, "URL 重写保存失败");
                    state.record_failure(e.to_string());
                }
            }
        }
    }
}

#[async_trait]
impl<R> UrlRewriteImporter for ImportEngine<R>
where
    R: UrlRewriteRepository,
{
    #[instrument(skip(self, file_path, config), fields(run_id = tracing::field::Empty, file = %file_path.display()))]
    async fn import_from_csv(&self, file_path: &Path, config: &ImportConfig) -> ImportReport {
        let mut state = ImportRunState::new(ColumnMap::build(&config.field_names), (self.clock)());
        tracing::Span::current().record("run_id", state.run_id.as_str());

        info!(
            stores = ?config.store_ids,
            skip_first_line = config.skip_first_line,
            "开始导入 URL 重写"
        );

        let rows = match CsvRowSource::open(file_path, &config.dialect) {
            Ok(rows) => rows,
            Err(e) => {
                // 无法打开: 不读取、不清理、不分类
                warn!(error = %e, "导入文件无法打开，跳过");
                return state.into_report(false);
            }
        };

        let mut pending = next_row(rows).await;
        while let Some((rows, row)) = pending {
            state.total += 1;

            if config.skip_first_line && state.total == 1 {
                debug!(line = row.line(), "跳过首行");
            } else {
                self.import_row(&mut state, &row, config).await;
            }

            pending = next_row(rows).await;
        }

        // 读到流末尾时文件句柄已释放
        if let Err(e) = std::fs::remove_file(file_path) {
            warn!(error = %e, "导入文件删除失败");
        }

        info!(
            total = state.total,
            success = state.total_success,
            last_error = %state.last_error,
            "URL 重写导入完成"
        );

        state.into_report(true)
    }
}

/// 在阻塞线程池中读取下一行；流结束时随行迭代器一起关闭文件
async fn next_row(rows: CsvRowSource) -> Option<(CsvRowSource, RawRow)> {
    let read = tokio::task::spawn_blocking(move || {
        let mut rows = rows;
        let row = rows.next();
        row.map(|row| (rows, row))
    });

    match read.await {
        Ok(next) => next,
        Err(e) => {
            error!(error = %e, "CSV 读取任务异常终止");
            None
        }
    }
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}
