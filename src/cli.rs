use clap::Parser;
use std::path::PathBuf;

/// 入力ファイルの既定名
pub const DEFAULT_INPUT: &str = "协配流转.xlsx";

#[derive(Parser)]
#[command(name = "assign-audit")]
#[command(about = "協配フローの処理者と推薦領導を照合するツール", long_about = None)]
pub struct Cli {
    /// 入力Excelファイル
    #[arg(default_value = DEFAULT_INPUT)]
    pub input: PathBuf,
}
