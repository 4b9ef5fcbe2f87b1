use crate::error::{AuditError, Result};
use assign_audit_common::AccountNameMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 推薦APIのベースURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "ASSIGN_AUDIT_BASE_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 推薦サービスのベースURL
    pub base_url: String,
    /// API呼び出し開始の最小間隔（ミリ秒）
    pub request_interval_ms: u64,
    /// 同時に投げるリクエスト数
    pub concurrency: usize,
    /// 1行あたりの最大試行回数（1 = リトライなし）
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    /// 未設定ならHTTPクライアントの既定値
    pub timeout_seconds: Option<u64>,
    pub title_column: String,
    pub handler_column: String,
    pub output_file: PathBuf,
    /// 推薦アカウント → 領導表示名
    pub leaders: AccountNameMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8082".into(),
            request_interval_ms: 100,
            concurrency: 1,
            max_attempts: 1,
            retry_backoff_ms: 500,
            timeout_seconds: None,
            title_column: "协配标题".into(),
            handler_column: "当前办理人".into(),
            output_file: PathBuf::from("协配流转_处理结果.xlsx"),
            leaders: AccountNameMap::default(),
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み（なければ既定値）、環境変数で上書き
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config: Config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        // 環境変数を優先
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AuditError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("assign-audit").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(AuditError::Config("concurrency は1以上にしてください".into()));
        }
        if self.max_attempts == 0 {
            return Err(AuditError::Config("max_attempts は1以上にしてください".into()));
        }
        if self.leaders.is_empty() {
            return Err(AuditError::Config("leaders が空です".into()));
        }
        if self.title_column.trim().is_empty() {
            return Err(AuditError::Config("title_column が空です".into()));
        }
        reqwest::Url::parse(&self.base_url)
            .map_err(|e| AuditError::InvalidBaseUrl(format!("{}: {}", self.base_url, e)))?;
        Ok(())
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}
