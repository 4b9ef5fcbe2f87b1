//! 照合処理の型定義
//!
//! CLIとテストで共有される型:
//! - CellValue: 入力ワークブックのセル値（出力へそのまま引き継ぐ）
//! - Recommendation: 推薦APIの成功結果
//! - LookupFailure: 行単位の失敗（実行全体は止めない）
//! - TaskRecord: 1行分の最終結果

use crate::identity::AccountNameMap;
use std::fmt;
use thiserror::Error;

/// ワークブックのセル値
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// 空白セルか（空文字・空白のみの文字列も含む）
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 前後の空白を除いた文字列表現
    pub fn trimmed(&self) -> String {
        self.to_string().trim().to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            // 整数値のセルは "12.0" ではなく "12" と表示
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// 推薦APIの成功結果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recommendation {
    /// 推薦された領導アカウント
    pub account: String,
    /// マッチスコア
    pub score: f64,
    /// 推薦理由
    pub reason: String,
}

/// 行単位の失敗種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// タイトルが空（API呼び出しなし）
    EmptyInput,
    /// タイトル列が存在しない（API呼び出しなし）
    MissingTitleColumn,
    /// 非200応答・不正なボディ・通信エラー
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::EmptyInput => write!(f, "タイトルが空"),
            FailureKind::MissingTitleColumn => write!(f, "タイトル列なし"),
            FailureKind::Network => write!(f, "API呼び出し失敗"),
        }
    }
}

/// 行単位の失敗
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {detail}")]
pub struct LookupFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl LookupFailure {
    pub fn empty_input() -> Self {
        Self {
            kind: FailureKind::EmptyInput,
            detail: "タイトルが空のためスキップ".into(),
        }
    }

    pub fn missing_title_column(column: &str) -> Self {
        Self {
            kind: FailureKind::MissingTitleColumn,
            detail: format!("列 '{}' が見つかりません", column),
        }
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            detail: detail.into(),
        }
    }
}

/// 推薦取得の結果
pub type LookupOutcome = std::result::Result<Recommendation, LookupFailure>;

/// 1行分の照合結果
///
/// パイプラインの各段階は `self` を消費して新しいレコードを返す。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskRecord {
    /// 入力行番号（0始まり、ヘッダー除く）
    pub row_index: usize,
    /// 入力行のセル（変更せず出力へ）
    pub cells: Vec<CellValue>,
    pub title: String,
    /// 現在の処理者（前後空白除去済み）
    pub actual_handler: String,
    pub recommended_account: String,
    /// 推薦アカウントから解決した表示名（未知なら空）
    pub recommended_name: String,
    /// 失敗行は None
    pub score: Option<f64>,
    pub reason: String,
    /// 0 または 1
    pub match_flag: u8,
}

impl TaskRecord {
    pub fn new(row_index: usize, cells: Vec<CellValue>, title: &str, actual_handler: &str) -> Self {
        Self {
            row_index,
            cells,
            title: title.trim().to_string(),
            actual_handler: actual_handler.trim().to_string(),
            ..Default::default()
        }
    }

    /// 推薦結果をマージ（失敗時は推薦欄を空のまま返す）
    pub fn with_outcome(self, outcome: &LookupOutcome, names: &AccountNameMap) -> Self {
        match outcome {
            Ok(rec) => Self {
                recommended_name: names.resolve_name(&rec.account),
                recommended_account: rec.account.clone(),
                score: Some(rec.score),
                reason: rec.reason.clone(),
                ..self
            },
            Err(_) => self,
        }
    }

    pub fn with_match_flag(self, match_flag: u8) -> Self {
        Self { match_flag, ..self }
    }
}
