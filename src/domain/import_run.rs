// ==========================================
// URL 重写导入 - 导入运行结果
// ==========================================
// ImportReport: 单次导入运行的计数与最后一条落库错误
// ImportOutcome: 三态结果分类（全部成功 / 部分成功 / 全部失败）
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ImportOutcome - 结果分类
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportOutcome {
    /// 行数 == 成功落库数 且 行数 > 0
    FullSuccess { total: u64 },

    /// 其余情况；not_imported = 行数 - 成功落库数（多店铺时可能为负）
    PartialSuccess {
        not_imported: i64,
        last_error: Option<String>,
    },

    /// 成功落库数为 0
    TotalFailure { last_error: Option<String> },
}

impl ImportOutcome {
    pub fn last_error(&self) -> Option<&str> {
        match self {
            ImportOutcome::FullSuccess { .. } => None,
            ImportOutcome::PartialSuccess { last_error, .. }
            | ImportOutcome::TotalFailure { last_error } => last_error.as_deref(),
        }
    }
}

// ==========================================
// ImportReport - 运行汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub run_id: String,
    pub timestamp: i64,      // 运行开始时刻（秒）
    pub total: u64,          // 读到的行数（含被跳过的首行）
    pub total_success: u64,  // 成功落库的 (行, 店铺) 数
    pub current_id: u64,     // 运行结束时的序号计数器
    pub last_error: Option<String>,
    pub stream_opened: bool, // 文件未能打开时为 false，此时不做分类
}

impl ImportReport {
    /// 结果分类
    ///
    /// 注意: 比较的是“行数”与“落库成功数”，
    /// 多店铺导入时两者口径不同，此处保持原有口径不做修正。
    pub fn outcome(&self) -> Option<ImportOutcome> {
        if !self.stream_opened {
            return None;
        }

        let last_error = self.last_error.clone();

        let outcome = if self.total == self.total_success && self.total > 0 {
            ImportOutcome::FullSuccess { total: self.total }
        } else if self.total_success == 0 {
            ImportOutcome::TotalFailure { last_error }
        } else {
            ImportOutcome::PartialSuccess {
                not_imported: self.total as i64 - self.total_success as i64,
                last_error,
            }
        };

        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(total: u64, total_success: u64, last_error: Option<&str>) -> ImportReport {
        ImportReport {
            run_id: "run".to_string(),
            timestamp: 1_700_000_000,
            total,
            total_success,
            current_id: total_success + 1,
            last_error: last_error.map(str::to_string),
            stream_opened: true,
        }
    }

    #[test]
    fn test_outcome_full_success() {
        assert_eq!(
            report(3, 3, None).outcome(),
            Some(ImportOutcome::FullSuccess { total: 3 })
        );
    }

    #[test]
    fn test_outcome_total_failure_carries_error() {
        let outcome = report(3, 0, Some("E")).outcome().unwrap();
        assert_eq!(
            outcome,
            ImportOutcome::TotalFailure {
                last_error: Some("E".to_string())
            }
        );
        assert_eq!(outcome.last_error(), Some("E"));
    }

    #[test]
    fn test_outcome_empty_stream_is_total_failure() {
        assert_eq!(
            report(0, 0, None).outcome(),
            Some(ImportOutcome::TotalFailure { last_error: None })
        );
    }

    #[test]
    fn test_outcome_partial_negative_count() {
        // 3 行 × 2 店铺，失败 1 次
        assert_eq!(
            report(3, 5, Some("dup")).outcome(),
            Some(ImportOutcome::PartialSuccess {
                not_imported: -2,
                last_error: Some("dup".to_string())
            })
        );
    }

    #[test]
    fn test_outcome_none_when_stream_not_opened() {
        let mut r = report(0, 0, None);
        r.stream_opened = false;
        assert_eq!(r.outcome(), None);
    }

    #[test]
    fn test_outcome_serialization_tag() {
        let json = serde_json::to_value(ImportOutcome::FullSuccess { total: 2 }).unwrap();
        assert_eq!(json["kind"], "FULL_SUCCESS");
        assert_eq!(json["total"], 2);
    }
}
