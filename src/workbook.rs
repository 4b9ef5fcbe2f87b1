//! 入力Excelの読み込み
//!
//! 先頭シートの1行目をヘッダーとし、以降の行をセル値のまま保持する。

use crate::error::{AuditError, Result};
use assign_audit_common::CellValue;
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// 入力シートの内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl InputTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name.trim())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 行のセルを取得（列が短い行は空セル扱い）
pub fn cell_at(row: &[CellValue], col: usize) -> CellValue {
    row.get(col).cloned().unwrap_or_default()
}

pub fn read_task_table(path: &Path) -> Result<InputTable> {
    if !path.exists() {
        return Err(AuditError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| AuditError::WorkbookRead(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AuditError::EmptyWorkbook(path.display().to_string()))?
        .map_err(|e| AuditError::WorkbookRead(format!("{}: {}", path.display(), e)))?;

    // Range は最初の使用セルから始まるため、A列からの位置に戻す
    let offset = range.start().map_or(0, |(_, col)| col as usize);

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| AuditError::EmptyWorkbook(path.display().to_string()))?;

    Ok(table_from_rows(offset, header_row, rows))
}

fn table_from_rows<'a>(
    offset: usize,
    header_row: &[Data],
    rows: impl Iterator<Item = &'a [Data]>,
) -> InputTable {
    let headers = std::iter::repeat(&Data::Empty)
        .take(offset)
        .chain(header_row)
        .enumerate()
        .map(|(i, cell)| {
            let name = convert_cell(cell).trimmed();
            if name.is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name
            }
        })
        .collect();

    let rows = rows
        .map(|row| {
            std::iter::repeat(CellValue::Empty)
                .take(offset)
                .chain(row.iter().map(convert_cell))
                .collect()
        })
        .collect();

    InputTable { headers, rows }
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // 日付はシリアル値のまま引き継ぐ
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
