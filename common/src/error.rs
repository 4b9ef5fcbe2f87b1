//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 領導マッピングが不正（空・空欄のアカウントや表示名）
    #[error("Leader mapping error: {0}")]
    Mapping(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
