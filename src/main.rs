use assign_audit::{audit, cli, config, error};
use clap::Parser;
use cli::Cli;
use config::Config;
use error::Result;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("assign_audit=info")),
        )
        .with_writer(std::io::stdout)
        .init();

    let cli = Cli::parse();

    // エラーも標準出力にのみ表示する
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("✖ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load()?;

    println!("📋 assign-audit - 推薦照合\n");

    let report = audit::run_audit(&config, &cli.input).await?;
    if report.saved {
        println!("\n✅ 完了");
    }
    Ok(())
}
