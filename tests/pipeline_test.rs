//! 照合パイプラインのテスト
//!
//! 推薦の取得元をスタブに差し替え、集計と照合フラグを検証

use assign_audit::pipeline::{ColumnNames, Pipeline, PipelineOutput};
use assign_audit::progress::Progress;
use assign_audit::recommender::{
    FetchError, FetchFuture, Pacer, RecommendationClient, RecommendationSource, RetryPolicy,
};
use assign_audit::workbook::InputTable;
use assign_audit_common::{AccountNameMap, CellValue, Recommendation};
use std::sync::Mutex;
use std::time::Duration;

/// タイトル → 応答 の関数で振る舞うスタブ
struct StubSource<F> {
    respond: F,
    calls: Mutex<Vec<String>>,
}

impl<F> StubSource<F>
where
    F: Fn(&str) -> Result<Recommendation, FetchError>,
{
    fn new(respond: F) -> Self {
        Self {
            respond,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl<F> RecommendationSource for StubSource<F>
where
    F: Fn(&str) -> Result<Recommendation, FetchError>,
{
    fn fetch<'a>(&'a self, task_title: &'a str) -> FetchFuture<'a> {
        self.calls.lock().unwrap().push(task_title.to_string());
        let response = (self.respond)(task_title);
        Box::pin(async move { response })
    }
}

/// タイトルごとに応答時間が異なるスタブ
struct SlowSource;

impl RecommendationSource for SlowSource {
    fn fetch<'a>(&'a self, task_title: &'a str) -> FetchFuture<'a> {
        let n: u64 = task_title.trim_start_matches("task-").parse().unwrap_or(0);
        Box::pin(async move {
            // 前の行ほど遅く返す
            tokio::time::sleep(Duration::from_millis(50 - n * 5)).await;
            Ok(Recommendation {
                account: format!("acct-{}", n),
                ..Default::default()
            })
        })
    }
}

fn synthetic_names() -> AccountNameMap {
    AccountNameMap::new([("a1", "NameA"), ("b1", "NameB"), ("c1", "NameC")]).unwrap()
}

fn columns() -> ColumnNames {
    ColumnNames {
        title: "协配标题".into(),
        handler: "当前办理人".into(),
    }
}

fn table(rows: &[(&str, &str)]) -> InputTable {
    InputTable {
        headers: vec!["协配标题".into(), "当前办理人".into(), "备注".into()],
        rows: rows
            .iter()
            .enumerate()
            .map(|(i, (title, handler))| {
                vec![
                    text(title),
                    text(handler),
                    CellValue::Number(i as f64),
                ]
            })
            .collect(),
    }
}

fn text(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(s.to_string())
    }
}

fn pipeline<S: RecommendationSource>(source: S) -> Pipeline<S> {
    let client = RecommendationClient::new(source, Pacer::new(Duration::ZERO), RetryPolicy::none());
    Pipeline::new(client, synthetic_names(), columns())
}

fn recommend(account: &str) -> Result<Recommendation, FetchError> {
    Ok(Recommendation {
        account: account.to_string(),
        score: 0.8,
        reason: "テスト".into(),
    })
}

fn assert_counts_consistent(output: &PipelineOutput) {
    let s = output.summary;
    assert_eq!(s.success_count + s.error_count, s.total_rows);
    assert_eq!(output.records.len(), s.total_rows);
}

#[tokio::test]
async fn test_ten_rows_with_single_match() {
    let rows: Vec<(String, String)> = (1..=10)
        .map(|i| {
            let handler = if i == 3 { "NameA" } else { "NameC" };
            (format!("task-{}", i), handler.to_string())
        })
        .collect();
    let rows: Vec<(&str, &str)> = rows.iter().map(|(t, h)| (t.as_str(), h.as_str())).collect();

    let pipeline = pipeline(StubSource::new(|title| {
        if title == "task-3" {
            recommend("a1")
        } else {
            recommend("b1")
        }
    }));

    let output = pipeline.run(&table(&rows), &Progress::hidden()).await;

    assert_counts_consistent(&output);
    assert_eq!(output.summary.total_rows, 10);
    assert_eq!(output.summary.success_count, 10);
    assert_eq!(output.records[2].recommended_name, "NameA");
    assert_eq!(output.records[2].match_flag, 1);
    assert_eq!(output.summary.match_count, 1);
    assert!((output.summary.match_rate() - 0.1).abs() < 1e-9);

    let flags: Vec<u8> = output.records.iter().map(|r| r.match_flag).collect();
    assert_eq!(flags, vec![0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
}

#[tokio::test]
async fn test_all_server_errors() {
    let pipeline = pipeline(StubSource::new(|_| Err(FetchError::Status(500))));
    let input = table(&[("a", "NameA"), ("", "NameB"), ("c", ""), ("d", "NameC")]);

    let output = pipeline.run(&input, &Progress::hidden()).await;

    assert_counts_consistent(&output);
    assert_eq!(output.summary.success_count, 0);
    assert_eq!(output.summary.error_count, 4);
    assert_eq!(output.summary.match_count, 0);
    assert_eq!(output.summary.success_rate(), 0.0);
    assert!(output.records.iter().all(|r| r.match_flag == 0 && r.score.is_none()));
    // 処理者は失敗行でも記録される
    assert_eq!(output.records[0].actual_handler, "NameA");
}

#[tokio::test]
async fn test_blank_titles_skip_lookup() {
    let pipeline = pipeline(StubSource::new(|_| recommend("a1")));
    let input = table(&[("", "NameA"), ("   ", "NameA"), ("real", "NameA")]);

    let output = pipeline.run(&input, &Progress::hidden()).await;

    let calls = pipeline.client().source().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["real"]);
    assert_eq!(output.summary.error_count, 2);
    assert_eq!(output.summary.success_count, 1);
    assert_eq!(output.summary.match_count, 1);
    assert_eq!(output.records[0].match_flag, 0);
    assert_eq!(output.records[2].match_flag, 1);
}

#[tokio::test]
async fn test_unknown_account_records_account_only() {
    let pipeline = pipeline(StubSource::new(|_| recommend("stranger")));
    let input = table(&[("a", "NameA"), ("b", "")]);

    let output = pipeline.run(&input, &Progress::hidden()).await;

    for record in &output.records {
        assert_eq!(record.recommended_account, "stranger");
        assert_eq!(record.recommended_name, "");
        assert_eq!(record.match_flag, 0);
    }
    // 処理者・推薦領導ともに空でも一致にはならない
    assert_eq!(output.summary.match_count, 0);
    assert_eq!(output.summary.success_count, 2);
}

#[tokio::test]
async fn test_handler_is_trimmed_before_matching() {
    let pipeline = pipeline(StubSource::new(|_| recommend("b1")));
    let input = table(&[("a", "  NameB  ")]);

    let output = pipeline.run(&input, &Progress::hidden()).await;

    assert_eq!(output.records[0].actual_handler, "NameB");
    assert_eq!(output.records[0].match_flag, 1);
}

#[tokio::test]
async fn test_missing_title_column() {
    let pipeline = pipeline(StubSource::new(|_| recommend("a1")));
    let input = InputTable {
        headers: vec!["标题".into(), "当前办理人".into()],
        rows: vec![vec![text("a"), text("NameA")], vec![text("b"), text("NameB")]],
    };

    let output = pipeline.run(&input, &Progress::hidden()).await;

    assert!(pipeline.client().source().calls.lock().unwrap().is_empty());
    assert_counts_consistent(&output);
    assert_eq!(output.summary.error_count, 2);
    assert_eq!(output.summary.match_count, 0);
}

#[tokio::test]
async fn test_missing_handler_column() {
    let pipeline = pipeline(StubSource::new(|_| recommend("a1")));
    let input = InputTable {
        headers: vec!["协配标题".into()],
        rows: vec![vec![text("a")], vec![text("b")]],
    };

    let output = pipeline.run(&input, &Progress::hidden()).await;

    assert_eq!(output.summary.success_count, 2);
    assert!(output.records.iter().all(|r| r.actual_handler.is_empty()));
    assert_eq!(output.summary.match_count, 0);
}

#[tokio::test]
async fn test_passthrough_cells_are_kept() {
    let pipeline = pipeline(StubSource::new(|_| recommend("c1")));
    let input = table(&[("a", "NameC"), ("b", "NameA")]);

    let output = pipeline.run(&input, &Progress::hidden()).await;

    assert_eq!(output.records[0].cells, input.rows[0]);
    assert_eq!(output.records[1].cells[2], CellValue::Number(1.0));
    assert_eq!(output.records[1].row_index, 1);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let respond = |title: &str| match title {
        "a" => recommend("a1"),
        "b" => Err(FetchError::Status(502)),
        _ => recommend("unknown"),
    };
    let input = table(&[("a", "NameA"), ("b", "NameB"), ("c", "NameC"), ("", "")]);

    let first = pipeline(StubSource::new(respond)).run(&input, &Progress::hidden()).await;
    let second = pipeline(StubSource::new(respond)).run(&input, &Progress::hidden()).await;

    let flags = |o: &PipelineOutput| o.records.iter().map(|r| r.match_flag).collect::<Vec<_>>();
    assert_eq!(flags(&first), flags(&second));
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.summary.success_rate(), second.summary.success_rate());
    assert_eq!(first.summary.match_rate(), second.summary.match_rate());
}

#[tokio::test]
async fn test_concurrent_lookups_keep_input_order() {
    let rows: Vec<String> = (1..=8).map(|i| format!("task-{}", i)).collect();
    let input = table(&rows.iter().map(|t| (t.as_str(), "")).collect::<Vec<_>>());

    let client = RecommendationClient::new(SlowSource, Pacer::new(Duration::ZERO), RetryPolicy::none());
    let pipeline = Pipeline::new(client, synthetic_names(), columns()).with_concurrency(4);

    let output = pipeline.run(&input, &Progress::hidden()).await;

    let accounts: Vec<&str> = output
        .records
        .iter()
        .map(|r| r.recommended_account.as_str())
        .collect();
    assert_eq!(
        accounts,
        vec!["acct-1", "acct-2", "acct-3", "acct-4", "acct-5", "acct-6", "acct-7", "acct-8"]
    );
    let indices: Vec<usize> = output.records.iter().map(|r| r.row_index).collect();
    assert_eq!(indices, (0..8).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_malformed_body_counts_as_error() {
    let pipeline = pipeline(StubSource::new(|_| Err(FetchError::Body("eof".into()))));
    let input = table(&[("a", "NameA")]);

    let output = pipeline.run(&input, &Progress::hidden()).await;
    assert_eq!(output.summary.error_count, 1);
    assert_eq!(output.records[0].recommended_account, "");
    assert_eq!(output.records[0].match_flag, 0);
}

#[tokio::test]
async fn test_empty_table() {
    let pipeline = pipeline(StubSource::new(|_| recommend("a1")));
    let output = pipeline.run(&table(&[]), &Progress::hidden()).await;

    assert_eq!(output.summary.total_rows, 0);
    assert_eq!(output.summary.success_rate(), 0.0);
    assert_eq!(output.summary.match_rate(), 0.0);
}
