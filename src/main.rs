// ==========================================
// URL 重写导入 - 命令行入口
// ==========================================
// 用法: url-rewrite-import --file rewrites.csv --store-id 1,2
// 退出码: 0 = 导入已执行；1 = 数据库/内部错误；2 = 上传或参数被拒绝
// ==========================================

use clap::Parser;
use std::process::ExitCode;
use url_rewrite_importer::api::{ApiError, ImportApi, ImportApiResponse, ImportRequest};
use url_rewrite_importer::db::{default_db_path, DB_PATH_ENV};
use url_rewrite_importer::{i18n, logging};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "url-rewrite-import")]
#[command(about = "Import URL rewrites from a CSV file")]
#[command(version)]
struct Args {
    /// 待导入的 CSV 文件（导入完成后删除）
    #[arg(short, long)]
    file: String,

    /// 声明的 MIME 类型
    #[arg(long, default_value = "text/csv")]
    mime_type: String,

    /// SQLite 数据库路径
    #[arg(long, env = DB_PATH_ENV)]
    db: Option<String>,

    /// 每次读取的最大字节数，超长行按此切分（0 = 不限）
    #[arg(long)]
    length: Option<usize>,

    #[arg(long)]
    delimiter: Option<String>,

    #[arg(long)]
    enclosure: Option<String>,

    #[arg(long)]
    escape: Option<String>,

    /// 跳过首行（表头）
    #[arg(long)]
    skipline: bool,

    /// 逗号分隔的店铺 ID
    #[arg(long)]
    store_id: Option<String>,

    /// 逗号分隔的列名
    #[arg(long)]
    fields: Option<String>,

    /// id_path 覆盖模板，支持 {time} / {id}
    #[arg(long)]
    id_path_pattern: Option<String>,

    /// options 覆盖值
    #[arg(long)]
    options: Option<String>,

    /// 提示消息语言（zh-CN / en）
    #[arg(long, default_value = "zh-CN")]
    locale: String,

    /// 以 JSON 输出导入结果
    #[arg(long)]
    json: bool,
}

impl Args {
    fn to_request(&self) -> ImportRequest {
        ImportRequest {
            file_path: self.file.clone(),
            mime_type: self.mime_type.clone(),
            length: self.length,
            delimiter: self.delimiter.clone(),
            enclosure: self.enclosure.clone(),
            escape: self.escape.clone(),
            // 未传 --skipline 时交给 config_kv 决定
            skipline: self.skipline.then_some(true),
            store_id: self.store_id.clone(),
            fields: self.fields.clone(),
            id_path_pattern: self.id_path_pattern.clone(),
            options: self.options.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.json {
        logging::init_json();
    } else {
        logging::init();
    }
    i18n::set_locale(&args.locale);

    let db_path = args.db.clone().unwrap_or_else(default_db_path);
    tracing::info!(version = url_rewrite_importer::VERSION, db = %db_path, "URL 重写导入启动");

    let api = match ImportApi::open(&db_path) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("{}: {}", i18n::t("common.failed"), e);
            return ExitCode::FAILURE;
        }
    };

    match api.import_url_rewrites(&args.to_request()).await {
        Ok(response) => {
            print_response(&response, args.json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let flash = e.to_flash();
            if args.json {
                println!("{}", serde_json::json!({ "error": flash }));
            } else {
                eprintln!("[{:?}] {}", flash.level, flash.text);
            }
            exit_code_for(&e)
        }
    }
}

fn print_response(response: &ImportApiResponse, json: bool) {
    if json {
        match serde_json::to_string_pretty(response) {
            Ok(body) => println!("{}", body),
            Err(e) => eprintln!("{}: {}", i18n::t("common.failed"), e),
        }
        return;
    }

    for message in &response.messages {
        println!("[{:?}] {}", message.level, message.text);
    }
}

fn exit_code_for(err: &ApiError) -> ExitCode {
    match err {
        ApiError::UploadMissing(_) | ApiError::MimeRejected(_) | ApiError::InvalidInput(_) => {
            ExitCode::from(2)
        }
        _ => ExitCode::FAILURE,
    }
}
