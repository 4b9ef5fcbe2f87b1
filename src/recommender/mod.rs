//! 推薦サービス連携モジュール
//!
//! - `RecommendationSource`: 1回分の問い合わせ（HTTP実装・テスト用スタブ）
//! - `RecommendationClient`: 空タイトル判定・ペーシング・リトライを担当

mod http;
mod pacer;
mod retry;

pub use http::HttpRecommender;
pub use pacer::Pacer;
pub use retry::RetryPolicy;

use assign_audit_common::{LookupFailure, LookupOutcome, Recommendation};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// 1回の問い合わせで起きた失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// 200以外のステータス
    Status(u16),
    /// 接続エラーなど
    Transport(String),
    Timeout(String),
    /// ボディがJSONとして解釈できない
    Body(String),
}

impl FetchError {
    /// 通信エラー・タイムアウト・5xx のみ再試行対象
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) | FetchError::Timeout(_) => true,
            FetchError::Status(code) => *code >= 500,
            FetchError::Body(_) => false,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "ステータスコード: {}", code),
            FetchError::Transport(e) => write!(f, "通信エラー: {}", e),
            FetchError::Timeout(e) => write!(f, "タイムアウト: {}", e),
            FetchError::Body(e) => write!(f, "レスポンス解析エラー: {}", e),
        }
    }
}

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Recommendation, FetchError>> + Send + 'a>>;

/// 推薦の取得元
pub trait RecommendationSource {
    /// タイトル（空でないことは呼び出し側が保証）で1回だけ問い合わせる
    fn fetch<'a>(&'a self, task_title: &'a str) -> FetchFuture<'a>;
}

/// 推薦クライアント
pub struct RecommendationClient<S> {
    source: S,
    pacer: Pacer,
    retry: RetryPolicy,
}

impl<S: RecommendationSource> RecommendationClient<S> {
    pub fn new(source: S, pacer: Pacer, retry: RetryPolicy) -> Self {
        Self { source, pacer, retry }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// タイトルに対する推薦を取得
    ///
    /// 空白のみのタイトルは問い合わせずに `EmptyInput` を返す。
    /// 失敗は行単位の結果として返し、実行全体は止めない。
    pub async fn recommend(&self, task_title: &str) -> LookupOutcome {
        let title = task_title.trim();
        if title.is_empty() {
            return Err(LookupFailure::empty_input());
        }

        let mut attempt = 1;
        loop {
            self.pacer.wait().await;

            match self.source.fetch(title).await {
                Ok(recommendation) => return Ok(recommendation),
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::debug!(title, attempt, ?delay, error = %e, "推薦APIを再試行");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(LookupFailure::network(e.to_string())),
            }
        }
    }
}
