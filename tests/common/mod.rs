//! 統合テスト用ヘルパー
//!
//! - 推薦サービスのスタブHTTPサーバー
//! - 入力Excelの作成

#![allow(dead_code)]

use reqwest::Url;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Handler = dyn Fn(&str) -> (u16, String) + Send + Sync;

/// スタブサーバー（受け取ったタイトルを記録する）
pub struct StubServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    titles: Arc<Mutex<Vec<String>>>,
    targets: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// タイトル → (ステータス, ボディ) を返すハンドラで起動
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
        let addr = listener.local_addr().expect("アドレス取得失敗");
        let handler: Arc<Handler> = Arc::new(handler);
        let hits = Arc::new(AtomicUsize::new(0));
        let titles = Arc::new(Mutex::new(Vec::new()));
        let targets = Arc::new(Mutex::new(Vec::new()));

        let (server_hits, server_titles, server_targets) =
            (hits.clone(), titles.clone(), targets.clone());
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let handler = handler.clone();
                let hits = server_hits.clone();
                let titles = server_titles.clone();
                let targets = server_targets.clone();

                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => {
                                buf.extend_from_slice(&chunk[..n]);
                                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                    break;
                                }
                            }
                        }
                    }

                    let request = String::from_utf8_lossy(&buf);
                    let target = request.split_whitespace().nth(1).unwrap_or("/");
                    let title = Url::parse(&format!("http://stub{}", target))
                        .ok()
                        .and_then(|url| {
                            url.query_pairs()
                                .find(|(k, _)| k == "taskTitle")
                                .map(|(_, v)| v.into_owned())
                        })
                        .unwrap_or_default();

                    hits.fetch_add(1, Ordering::SeqCst);
                    titles.lock().unwrap().push(title.clone());
                    targets.lock().unwrap().push(target.to_string());

                    let (status, body) = handler(&title);
                    let response = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
            titles,
            targets,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn titles(&self) -> Vec<String> {
        self.titles.lock().unwrap().clone()
    }

    /// デコード前のリクエストターゲット（パス + クエリ）
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

/// 推薦APIの成功ボディ
pub fn recommendation_body(account: &str, score: f64, reason: &str) -> String {
    serde_json::json!({
        "leaderAccount": account,
        "score": score,
        "reason": reason,
    })
    .to_string()
}

/// 入力Excelを作成（1行目ヘッダー、空文字のセルは書き込まない）
pub fn write_input_workbook(path: &Path, headers: &[&str], rows: &[Vec<&str>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }

    workbook.save(path).expect("入力Excel保存失敗");
}
