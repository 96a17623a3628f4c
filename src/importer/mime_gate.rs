// ==========================================
// URL 重写导入 - MIME 类型校验
// ==========================================

/// 允许的上传 MIME 类型（精确匹配，大小写敏感）
pub const ALLOWED_MIME_TYPES: [&str; 10] = [
    "text/csv",
    "text/plain",
    "application/csv",
    "text/comma-separated-values",
    "application/excel",
    "application/vnd.ms-excel",
    "application/vnd.msexcel",
    "text/anytext",
    "application/octet-stream",
    "application/txt",
];

pub fn is_allowed(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}
