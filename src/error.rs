use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("Excelファイルの読み込みに失敗: {0}")]
    WorkbookRead(String),

    #[error("ワークシートにヘッダー行がありません: {0}")]
    EmptyWorkbook(String),

    #[error("推薦APIのURLが不正: {0}")]
    InvalidBaseUrl(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
