//! 照合パイプライン
//!
//! 1. 推薦取得パス: 各行のタイトルで推薦を取得し、結果をレコードへマージ
//! 2. 照合パス: 全行の取得後、処理者と推薦領導を比較してフラグを付与
//!
//! 同時実行数を増やしても、レコードと表示は入力順のまま。

use crate::progress::Progress;
use crate::recommender::{RecommendationClient, RecommendationSource};
use crate::workbook::{cell_at, InputTable};
use assign_audit_common::{
    reconcile, AccountNameMap, Aggregator, FailureKind, LookupFailure, LookupOutcome, RunSummary,
    TaskRecord,
};
use futures::stream::{self, StreamExt};

/// 照合パスで詳細を表示する先頭行数
const PREVIEW_ROWS: usize = 10;

/// 照合に使う列名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    pub title: String,
    pub handler: String,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// 入力順のレコード
    pub records: Vec<TaskRecord>,
    pub summary: RunSummary,
}

pub struct Pipeline<S> {
    client: RecommendationClient<S>,
    names: AccountNameMap,
    columns: ColumnNames,
    concurrency: usize,
}

impl<S: RecommendationSource> Pipeline<S> {
    pub fn new(client: RecommendationClient<S>, names: AccountNameMap, columns: ColumnNames) -> Self {
        Self {
            client,
            names,
            columns,
            concurrency: 1,
        }
    }

    /// 同時に問い合わせる行数（1以上）
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn client(&self) -> &RecommendationClient<S> {
        &self.client
    }

    pub async fn run(&self, table: &InputTable, progress: &Progress) -> PipelineOutput {
        let mut aggregator = Aggregator::new();

        let records = self.resolve_all(table, &mut aggregator, progress).await;
        let records = self.evaluate_matches(records, &mut aggregator, progress);

        PipelineOutput {
            records,
            summary: aggregator.summary(),
        }
    }

    async fn resolve_all(
        &self,
        table: &InputTable,
        aggregator: &mut Aggregator,
        progress: &Progress,
    ) -> Vec<TaskRecord> {
        let title_col = table.column_index(&self.columns.title);
        let handler_col = table.column_index(&self.columns.handler);

        if title_col.is_none() {
            progress.println(format!(
                "⚠ タイトル列 '{}' が見つかりません。全行を失敗として扱います",
                self.columns.title
            ));
        }
        if handler_col.is_none() {
            progress.println(format!(
                "⚠ 処理者列 '{}' が見つかりません。H列は空になります",
                self.columns.handler
            ));
            progress.println(format!("  利用可能な列: {:?}", table.headers));
        }

        let client = &self.client;
        let title_column = self.columns.title.as_str();

        let mut lookups = stream::iter(table.rows.iter().enumerate())
            .map(move |(index, row)| async move {
                let (title, outcome) = match title_col {
                    Some(col) => {
                        let title = cell_at(row, col).trimmed();
                        let outcome = client.recommend(&title).await;
                        (title, outcome)
                    }
                    None => (String::new(), Err(LookupFailure::missing_title_column(title_column))),
                };
                (index, row, title, outcome)
            })
            .buffered(self.concurrency);

        let mut records = Vec::with_capacity(table.len());
        while let Some((index, row, title, outcome)) = lookups.next().await {
            aggregator.observe(&outcome);

            let handler = handler_col
                .map(|col| cell_at(row, col).trimmed())
                .unwrap_or_default();
            let record = TaskRecord::new(index, row.clone(), &title, &handler)
                .with_outcome(&outcome, &self.names);

            narrate_lookup(progress, &record, &outcome);
            progress.inc();
            records.push(record);
        }

        records
    }

    fn evaluate_matches(
        &self,
        records: Vec<TaskRecord>,
        aggregator: &mut Aggregator,
        progress: &Progress,
    ) -> Vec<TaskRecord> {
        let records: Vec<TaskRecord> = records
            .into_iter()
            .map(|record| {
                let flag = reconcile(&record.actual_handler, &record.recommended_name, &self.names);
                aggregator.observe_match(flag);

                if record.row_index < PREVIEW_ROWS {
                    progress.println(format!(
                        "  行 {}: H(処理者)='{}', M(推薦領導)='{}'",
                        record.row_index + 1,
                        record.actual_handler,
                        record.recommended_name
                    ));
                }
                if flag == 1 {
                    progress.println(format!(
                        "  一致: 行 {}, H='{}', M='{}'",
                        record.row_index + 1,
                        record.actual_handler,
                        record.recommended_name
                    ));
                }

                record.with_match_flag(flag)
            })
            .collect();

        let matched = records.iter().filter(|r| r.match_flag == 1).count();
        progress.println(format!("照合ルールで {} 行が一致（Q列=1）", matched));

        records
    }
}

fn narrate_lookup(progress: &Progress, record: &TaskRecord, outcome: &LookupOutcome) {
    let line = record.row_index + 1;
    match outcome {
        Ok(_) => {
            progress.println(format!("第{}行を処理: {}", line, record.title));
            progress.println(format!(
                "  ✔ 成功: 推薦アカウント={}, 領導名={}, スコア={}",
                record.recommended_account,
                record.recommended_name,
                record.score.unwrap_or_default()
            ));
        }
        Err(failure) if failure.kind == FailureKind::Network => {
            progress.println(format!("第{}行を処理: {}", line, record.title));
            progress.println(format!("  ✖ {}", failure));
        }
        Err(failure) => {
            progress.println(format!("第{}行: {}", line, failure.detail));
        }
    }
}
