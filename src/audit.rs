//! 照合処理の実行（読み込み → 推薦取得・照合 → 保存 → サマリー）

use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::pipeline::{ColumnNames, Pipeline};
use crate::progress::Progress;
use crate::recommender::{HttpRecommender, Pacer, RecommendationClient, RetryPolicy};
use crate::workbook::read_task_table;
use assign_audit_common::{RunSummary, TaskRecord};
use std::path::Path;
use std::time::Duration;

/// 1回の実行結果
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub records: Vec<TaskRecord>,
    pub summary: RunSummary,
    /// 出力ファイルを保存できたか
    pub saved: bool,
}

/// 入力ファイルを照合して結果を保存
///
/// 入力ファイルが開けない場合と設定が不正な場合のみエラーを返す。
/// 行単位の失敗・保存失敗は表示したうえで処理を続ける。
pub async fn run_audit(config: &Config, input: &Path) -> Result<AuditReport> {
    println!("[1/3] Excelファイルを読み込み中...");
    let table = read_task_table(input)?;
    println!("✔ {}行のデータを読み込みました", table.len());
    println!("  列: {:?}\n", table.headers);

    let source = HttpRecommender::new(&config.base_url, config.timeout())?;
    let client = RecommendationClient::new(
        source,
        Pacer::new(config.request_interval()),
        RetryPolicy::new(config.max_attempts, Duration::from_millis(config.retry_backoff_ms)),
    );
    let columns = ColumnNames {
        title: config.title_column.clone(),
        handler: config.handler_column.clone(),
    };
    let pipeline = Pipeline::new(client, config.leaders.clone(), columns)
        .with_concurrency(config.concurrency);

    let leaders: Vec<(&str, &str)> = config.leaders.iter().collect();
    tracing::debug!(
        base_url = %config.base_url,
        concurrency = config.concurrency,
        max_attempts = config.max_attempts,
        ?leaders,
        "推薦取得を開始"
    );

    println!("[2/3] 推薦取得・照合中...");
    let progress = Progress::new(table.len());
    progress.set_message("推薦取得中");
    let output = pipeline.run(&table, &progress).await;
    progress.finish();

    println!("\n[3/3] 結果を保存中...");
    let saved = match export::write_report(&config.output_file, &table.headers, &output.records) {
        Ok(()) => {
            println!("✔ 結果を保存: {}", config.output_file.display());
            true
        }
        Err(e) => {
            println!("✖ 結果の保存に失敗: {}", e);
            false
        }
    };

    print_summary(&output.summary);

    Ok(AuditReport {
        records: output.records,
        summary: output.summary,
        saved,
    })
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n実行結果サマリー:");
    println!("  総行数: {}", summary.total_rows);
    println!("  成功: {}行", summary.success_count);
    println!("  失敗: {}行", summary.error_count);
    println!("  成功率: {:.2}%", summary.success_rate() * 100.0);
    println!("  Q列=1の行数: {}", summary.match_count);
    println!("  Q列=1の割合: {:.2}%", summary.match_rate() * 100.0);
}
