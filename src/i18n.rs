// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use url_rewrite_importer::i18n::t;
/// let msg = t("import.none_imported");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use url_rewrite_importer::i18n::t_with_args;
/// let msg = t_with_args("import.mime_rejected", &[("mime", "image/png")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(&*rust_i18n::locale(), "en");

        // 恢复默认语言
        set_locale("zh-CN");
        assert_eq!(&*rust_i18n::locale(), "zh-CN");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        assert_eq!(t("common.failed"), "操作失败");

        set_locale("en");
        assert_eq!(t("common.failed"), "Operation failed");

        // 恢复默认语言
        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args("import.mime_rejected", &[("mime", "image/png")]);
        assert!(msg.contains("image/png"));
        assert!(!msg.contains("%{mime}"));

        set_locale("en");
        let msg = t_with_args("import.all_imported", &[("total", "3")]);
        assert_eq!(msg, "All 3 URL rewrites have been successfully imported.");

        let msg = t_with_args("import.last_exception", &[("message", "E")]);
        assert_eq!(msg, "Last logged exception: E");

        // 恢复默认语言
        set_locale("zh-CN");
    }

    #[test]
    fn test_translate_plain_notice() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(t("import.none_imported"), "No URL rewrites have been imported.");
        set_locale("zh-CN");
    }
}
