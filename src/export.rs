//! 照合結果のExcel出力

use crate::error::{AuditError, Result};
use assign_audit_common::export::excel_core::generate_report_buffer;
use assign_audit_common::TaskRecord;
use std::path::Path;

/// 入力列 + 照合結果列のワークブックを書き出す
pub fn write_report(output_path: &Path, input_headers: &[String], records: &[TaskRecord]) -> Result<()> {
    let buffer = generate_report_buffer(input_headers, records).map_err(AuditError::ExcelGeneration)?;

    std::fs::write(output_path, buffer).map_err(|e| {
        AuditError::ExcelGeneration(format!("{}: {}", output_path.display(), e))
    })?;

    Ok(())
}
