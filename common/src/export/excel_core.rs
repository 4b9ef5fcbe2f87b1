//! 照合結果Excel生成（共通ライブラリ）
//!
//! 入力列をそのまま残し、照合結果の列を追加したワークブックを生成する。
//! 入力に同名の列がある場合はその列を上書きする。

use crate::types::{CellValue, TaskRecord};
use rust_xlsxwriter::*;

/// 現在の処理者（前後空白除去済み）
pub const COL_HANDLER: &str = "H";
/// 推薦領導の表示名
pub const COL_LEADER_NAME: &str = "M";
/// 照合フラグ（0/1）
pub const COL_MATCH_FLAG: &str = "Q";
pub const COL_ACCOUNT: &str = "推荐领导账号";
pub const COL_SCORE: &str = "匹配分数";
pub const COL_REASON: &str = "推荐理由";

/// 追加する列（この順で出力）
pub const RESULT_COLUMNS: [&str; 6] = [
    COL_HANDLER,
    COL_LEADER_NAME,
    COL_MATCH_FLAG,
    COL_ACCOUNT,
    COL_SCORE,
    COL_REASON,
];

/// 出力シートの列配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    /// ヘッダー行
    pub headers: Vec<String>,
    /// RESULT_COLUMNS それぞれの列番号
    pub result_columns: [usize; 6],
}

impl ReportLayout {
    /// 入力ヘッダーから出力列配置を決定
    pub fn for_input_headers(input_headers: &[String]) -> Self {
        let mut headers = input_headers.to_vec();
        let mut result_columns = [0usize; 6];

        for (slot, name) in result_columns.iter_mut().zip(RESULT_COLUMNS) {
            *slot = match headers.iter().position(|h| h == name) {
                Some(idx) => idx,
                None => {
                    headers.push(name.to_string());
                    headers.len() - 1
                }
            };
        }

        Self { headers, result_columns }
    }

    fn is_result_column(&self, col: usize) -> bool {
        self.result_columns.contains(&col)
    }
}

/// 照合結果Excelをバッファに生成
///
/// # Arguments
/// * `input_headers` - 入力シートのヘッダー
/// * `records` - 入力順の照合結果
pub fn generate_report_buffer(
    input_headers: &[String],
    records: &[TaskRecord],
) -> Result<Vec<u8>, String> {
    let layout = ReportLayout::for_input_headers(input_headers);
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, header) in layout.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, to_col(col)?, header, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    for (idx, record) in records.iter().enumerate() {
        let row = u32::try_from(idx + 1)
            .map_err(|_| "行数がExcelの上限を超えています".to_string())?;

        // 入力セル（上書き対象の列は除く）
        for (col, cell) in record.cells.iter().enumerate() {
            if layout.is_result_column(col) {
                continue;
            }
            write_cell(worksheet, row, to_col(col)?, cell)?;
        }

        let [handler, name, flag, account, score, reason] = layout.result_columns;
        write_cell(worksheet, row, to_col(handler)?, &CellValue::Text(record.actual_handler.clone()))?;
        write_cell(worksheet, row, to_col(name)?, &CellValue::Text(record.recommended_name.clone()))?;
        write_cell(worksheet, row, to_col(flag)?, &CellValue::Number(f64::from(record.match_flag)))?;
        write_cell(worksheet, row, to_col(account)?, &CellValue::Text(record.recommended_account.clone()))?;
        let score_cell = record.score.map(CellValue::Number).unwrap_or_default();
        write_cell(worksheet, row, to_col(score)?, &score_cell)?;
        write_cell(worksheet, row, to_col(reason)?, &CellValue::Text(record.reason.clone()))?;
    }

    workbook.save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}

fn to_col(col: usize) -> Result<u16, String> {
    u16::try_from(col).map_err(|_| "列数がExcelの上限を超えています".to_string())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, cell: &CellValue) -> Result<(), String> {
    let written = match cell {
        CellValue::Empty => return Ok(()),
        CellValue::Text(s) if s.is_empty() => return Ok(()),
        CellValue::Text(s) => worksheet.write_string(row, col, s.as_str()),
        CellValue::Number(n) => worksheet.write_number(row, col, *n),
        CellValue::Bool(b) => worksheet.write_boolean(row, col, *b),
    };
    written
        .map(|_| ())
        .map_err(|e| format!("セル書き込みエラー ({}, {}): {}", row, col, e))
}
