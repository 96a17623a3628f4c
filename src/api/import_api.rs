// ==========================================
// URL 重写导入 API
// ==========================================
// 职责: 上传校验 → 参数归一化 → 执行导入 → 生成提示消息
// 参数优先级: 请求值 > config_kv > 内置默认
// ==========================================

use crate::api::error::{ApiError, ApiResult, FlashMessage};
use crate::config::{ConfigManager, ImportDefaults, ImportDefaultsReader};
use crate::db::open_sqlite_connection;
use crate::domain::{FlashLevel, ImportOutcome};
use crate::i18n::{t, t_with_args};
use crate::importer::import_config::{
    parse_dialect_char, parse_field_names, parse_store_ids, CsvDialect, ImportConfig, RowOverrides,
};
use crate::importer::{mime_gate, ImportEngine, ImportResult, UrlRewriteImporter};
use crate::repository::{UrlRewriteRepository, UrlRewriteRepositoryImpl};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// 导入请求（对应上传表单）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRequest {
    /// 上传后的临时文件路径
    pub file_path: String,
    /// 上传时声明的 MIME 类型
    pub mime_type: String,
    pub length: Option<usize>,
    pub delimiter: Option<String>,
    pub enclosure: Option<String>,
    pub escape: Option<String>,
    pub skipline: Option<bool>,
    /// 逗号分隔的店铺 ID
    pub store_id: Option<String>,
    /// 逗号分隔的字段名
    pub fields: Option<String>,
    pub id_path_pattern: Option<String>,
    pub options: Option<String>,
}

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    pub run_id: String,
    /// 文件未能打开时为 None
    pub outcome: Option<ImportOutcome>,
    pub total: u64,
    pub total_success: u64,
    pub last_error: Option<String>,
    /// 按顺序展示的提示消息
    pub messages: Vec<FlashMessage>,
}

/// 导入API
pub struct ImportApi<R, C>
where
    R: UrlRewriteRepository,
    C: ImportDefaultsReader,
{
    engine: ImportEngine<R>,
    defaults: C,
}

impl ImportApi<UrlRewriteRepositoryImpl, ConfigManager> {
    /// 基于 SQLite 数据库创建（重写表与配置表共用一个连接）
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseError(format!("打开数据库失败: {}", e)))?;
        let conn = Arc::new(Mutex::new(conn));

        let repo = UrlRewriteRepositoryImpl::from_connection(Arc::clone(&conn))?;
        let config = ConfigManager::from_connection(conn)?;
        Ok(Self::new(ImportEngine::new(repo), config))
    }
}

impl<R, C> ImportApi<R, C>
where
    R: UrlRewriteRepository,
    C: ImportDefaultsReader,
{
    pub fn new(engine: ImportEngine<R>, defaults: C) -> Self {
        Self { engine, defaults }
    }

    pub fn engine(&self) -> &ImportEngine<R> {
        &self.engine
    }

    pub fn defaults(&self) -> &C {
        &self.defaults
    }

    /// 导入 URL 重写
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入已执行（含部分失败 / 全部失败）
    /// - Err(ApiError): 上传文件缺失、MIME 不允许、参数无效，未读取任何行
    pub async fn import_url_rewrites(&self, request: &ImportRequest) -> ApiResult<ImportApiResponse> {
        let path = Path::new(&request.file_path);
        if !path.exists() {
            warn!(file_path = %request.file_path, "上传文件不存在");
            return Err(ApiError::UploadMissing(request.file_path.clone()));
        }

        if !mime_gate::is_allowed(&request.mime_type) {
            warn!(mime_type = %request.mime_type, "MIME 类型不允许");
            return Err(ApiError::MimeRejected(request.mime_type.clone()));
        }

        let defaults = self.defaults.get_import_defaults().await?;
        let config = resolve_config(request, &defaults)?;

        let report = self.engine.import_from_csv(path, &config).await;
        let outcome = report.outcome();
        let messages = flash_messages(outcome.as_ref());

        info!(
            run_id = %report.run_id,
            total = report.total,
            success = report.total_success,
            "导入请求处理完成"
        );

        Ok(ImportApiResponse {
            run_id: report.run_id,
            outcome,
            total: report.total,
            total_success: report.total_success,
            last_error: report.last_error,
            messages,
        })
    }
}

/// 合并请求参数与已配置默认值
pub fn resolve_config(request: &ImportRequest, defaults: &ImportDefaults) -> ImportResult<ImportConfig> {
    fn pick(request: &Option<String>, configured: &Option<String>) -> Option<String> {
        request.clone().or_else(|| configured.clone())
    }

    fn dialect_char(
        name: &str,
        request: &Option<String>,
        configured: &Option<String>,
        fallback: u8,
    ) -> ImportResult<u8> {
        match pick(request, configured) {
            Some(raw) => parse_dialect_char(name, &raw),
            None => Ok(fallback),
        }
    }

    let builtin = CsvDialect::default();
    let dialect = CsvDialect {
        max_length: request.length.or(defaults.length).unwrap_or(builtin.max_length),
        delimiter: dialect_char("delimiter", &request.delimiter, &defaults.delimiter, builtin.delimiter)?,
        enclosure: dialect_char("enclosure", &request.enclosure, &defaults.enclosure, builtin.enclosure)?,
        escape: dialect_char("escape", &request.escape, &defaults.escape, builtin.escape)?,
    };

    let store_ids = parse_store_ids(&pick(&request.store_id, &defaults.store_ids).unwrap_or_default())?;
    let field_names = parse_field_names(&pick(&request.fields, &defaults.fields).unwrap_or_default());
    let overrides = RowOverrides::new(
        pick(&request.id_path_pattern, &defaults.id_path_pattern).as_deref(),
        pick(&request.options, &defaults.options).as_deref(),
    );

    Ok(ImportConfig {
        dialect,
        skip_first_line: request.skipline.or(defaults.skipline).unwrap_or(false),
        store_ids,
        field_names,
        overrides,
    })
}

/// 由结果分类生成提示消息
pub fn flash_messages(outcome: Option<&ImportOutcome>) -> Vec<FlashMessage> {
    let mut messages = Vec::new();

    let last_error = match outcome {
        None => return messages,
        Some(ImportOutcome::FullSuccess { total }) => {
            messages.push(FlashMessage::new(
                FlashLevel::Success,
                t_with_args("import.all_imported", &[("total", &total.to_string())]),
            ));
            None
        }
        Some(ImportOutcome::TotalFailure { last_error }) => {
            messages.push(FlashMessage::new(FlashLevel::Error, t("import.none_imported")));
            last_error.as_deref()
        }
        Some(ImportOutcome::PartialSuccess {
            not_imported,
            last_error,
        }) => {
            messages.push(FlashMessage::new(
                FlashLevel::Notice,
                t_with_args("import.not_imported", &[("count", &not_imported.to_string())]),
            ));
            last_error.as_deref()
        }
    };

    if let Some(message) = last_error {
        messages.push(FlashMessage::new(
            FlashLevel::Error,
            t_with_args("import.last_exception", &[("message", message)]),
        ));
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuiltinDefaults;
    use rusqlite::Connection;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn in_memory_api() -> ImportApi<UrlRewriteRepositoryImpl, BuiltinDefaults> {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let repo = UrlRewriteRepositoryImpl::from_connection(conn).unwrap();
        ImportApi::new(ImportEngine::new(repo), BuiltinDefaults)
    }

    fn upload(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    fn request(file: &NamedTempFile) -> ImportRequest {
        ImportRequest {
            file_path: file.path().display().to_string(),
            mime_type: "text/csv".to_string(),
            ..ImportRequest::default()
        }
    }

    #[test]
    fn test_resolve_config_builtin_defaults() {
        let config = resolve_config(&ImportRequest::default(), &ImportDefaults::default()).unwrap();
        assert_eq!(config, ImportConfig::default());
    }

    #[test]
    fn test_resolve_config_request_beats_configured() {
        let request = ImportRequest {
            delimiter: Some(";".to_string()),
            store_id: Some("5".to_string()),
            ..ImportRequest::default()
        };
        let defaults = ImportDefaults {
            delimiter: Some("|".to_string()),
            enclosure: Some("'".to_string()),
            store_ids: Some("1,2".to_string()),
            skipline: Some(true),
            ..ImportDefaults::default()
        };

        let config = resolve_config(&request, &defaults).unwrap();
        assert_eq!(config.dialect.delimiter, b';');
        assert_eq!(config.dialect.enclosure, b'\'');
        assert_eq!(config.store_ids, vec![5]);
        assert!(config.skip_first_line);
    }

    #[test]
    fn test_resolve_config_invalid_delimiter() {
        let request = ImportRequest {
            delimiter: Some("::".to_string()),
            ..ImportRequest::default()
        };
        assert!(resolve_config(&request, &ImportDefaults::default()).is_err());
    }

    #[test]
    fn test_flash_messages_shapes() {
        assert!(flash_messages(None).is_empty());

        let full = flash_messages(Some(&ImportOutcome::FullSuccess { total: 3 }));
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].level, FlashLevel::Success);
        assert!(full[0].text.contains('3'));

        let failed = flash_messages(Some(&ImportOutcome::TotalFailure {
            last_error: Some("E".to_string()),
        }));
        let levels: Vec<FlashLevel> = failed.iter().map(|m| m.level).collect();
        assert_eq!(levels, vec![FlashLevel::Error, FlashLevel::Error]);
        assert!(failed[1].text.contains('E'));

        let partial = flash_messages(Some(&ImportOutcome::PartialSuccess {
            not_imported: -2,
            last_error: None,
        }));
        assert_eq!(partial.len(), 1);
        assert_eq!(partial[0].level, FlashLevel::Notice);
        assert!(partial[0].text.contains("-2"));
    }

    #[tokio::test]
    async fn test_upload_missing() {
        let api = in_memory_api();
        let request = ImportRequest {
            file_path: "/nonexistent/upload.csv".to_string(),
            mime_type: "text/csv".to_string(),
            ..ImportRequest::default()
        };

        let err = api.import_url_rewrites(&request).await.unwrap_err();
        assert!(matches!(err, ApiError::UploadMissing(_)));
    }

    #[tokio::test]
    async fn test_mime_rejected_keeps_file() {
        let api = in_memory_api();
        let file = upload("0,p,a.html,b.html,\n");
        let request = ImportRequest {
            mime_type: "application/json".to_string(),
            ..request(&file)
        };

        let err = api.import_url_rewrites(&request).await.unwrap_err();
        assert!(matches!(err, ApiError::MimeRejected(_)));
        assert!(file.path().exists());
    }

    #[tokio::test]
    async fn test_full_success_response() {
        let api = in_memory_api();
        let file = upload("0,p/1,a.html,b.html,RP\n0,p/2,c.html,d.html,\n");

        let response = api.import_url_rewrites(&request(&file)).await.unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.total_success, 2);
        assert_eq!(response.outcome, Some(ImportOutcome::FullSuccess { total: 2 }));
        assert_eq!(response.messages.len(), 1);
        assert_eq!(api.engine().repository().count().unwrap(), 2);
    }
}
