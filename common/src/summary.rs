//! 実行統計の集計

use crate::types::LookupOutcome;
use serde::Serialize;

/// 実行結果の集計値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub match_count: usize,
}

impl RunSummary {
    /// 成功率（0.0〜1.0、総行数0なら0.0）
    pub fn success_rate(&self) -> f64 {
        ratio(self.success_count, self.total_rows)
    }

    /// 一致率（0.0〜1.0、総行数0なら0.0）
    pub fn match_rate(&self) -> f64 {
        ratio(self.match_count, self.total_rows)
    }
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// 行ごとの結果を受け取って集計する
///
/// `observe` は1行につき1回、`observe_match` は照合パスで1行につき1回呼ぶ。
#[derive(Debug, Default)]
pub struct Aggregator {
    summary: RunSummary,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, outcome: &LookupOutcome) {
        self.summary.total_rows += 1;
        match outcome {
            Ok(_) => self.summary.success_count += 1,
            Err(_) => self.summary.error_count += 1,
        }
    }

    pub fn observe_match(&mut self, match_flag: u8) {
        if match_flag == 1 {
            self.summary.match_count += 1;
        }
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }
}
