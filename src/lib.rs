//! 協配フロー推薦照合ツール
//!
//! タスクごとに推薦サービスへ問い合わせ、推薦領導と実際の処理者を照合する。

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod progress;
pub mod recommender;
pub mod workbook;
