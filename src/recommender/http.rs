//! 推薦サービスのHTTPクライアント
//!
//! `GET <base>/api/recommendation/recommend?taskTitle=<エンコード済みタイトル>`

use super::{FetchError, FetchFuture, RecommendationSource};
use crate::error::{AuditError, Result};
use assign_audit_common::Recommendation;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

const RECOMMEND_PATH: [&str; 3] = ["api", "recommendation", "recommend"];

/// タイトルのエンコード対象（英数字と `-_.~/` 以外、空白は %20）
const TITLE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// 推薦APIのレスポンス（欠けたフィールドはゼロ値扱い）
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RecommendResponse {
    leader_account: Option<String>,
    score: Option<f64>,
    reason: Option<String>,
}

impl From<RecommendResponse> for Recommendation {
    fn from(r: RecommendResponse) -> Self {
        Self {
            account: r.leader_account.unwrap_or_default(),
            score: r.score.unwrap_or_default(),
            reason: r.reason.unwrap_or_default(),
        }
    }
}

pub struct HttpRecommender {
    client: Client,
    base_url: Url,
}

impl HttpRecommender {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AuditError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AuditError::InvalidBaseUrl(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AuditError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// タイトルをクエリに埋め込んだURL
    pub fn recommend_url(&self, task_title: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(RECOMMEND_PATH);
        }
        let title = utf8_percent_encode(task_title, TITLE_ENCODE_SET);
        url.set_query(Some(&format!("taskTitle={}", title)));
        url
    }

    async fn get(&self, task_title: &str) -> std::result::Result<Recommendation, FetchError> {
        let url = self.recommend_url(task_title);
        tracing::debug!(%url, "推薦APIを呼び出し");

        let response = self.client.get(url).send().await.map_err(classify)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let parsed: RecommendResponse = response.json().await.map_err(classify)?;

        Ok(parsed.into())
    }
}

impl RecommendationSource for HttpRecommender {
    fn fetch<'a>(&'a self, task_title: &'a str) -> FetchFuture<'a> {
        Box::pin(self.get(task_title))
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(e.to_string())
    } else if e.is_decode() {
        FetchError::Body(e.to_string())
    } else {
        FetchError::Transport(e.to_string())
    }
}
