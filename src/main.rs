//! Ledgerview main entry point

mod render;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use ledgerview_config::Config;
use ledgerview_core::{ReportPeriod, ReportService};
use ledgerview_store::JsonFileStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

use render::TableRenderer;

#[derive(Parser, Debug)]
#[command(name = "ledgerview")]
#[command(author = "Ledgerview Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Trial balance, income statement and balance sheet from a chart of accounts", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Debit and credit totals for every account
    TrialBalance {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Revenues, cost of sales and operating expenses
    IncomeStatement {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Assets, liabilities and equity as of a date
    BalanceSheet {
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Report journals whose postings do not sum to zero
    CheckJournals,
    /// Print a default configuration file
    InitConfig,
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Config::load(path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to load configuration from {}\n{}",
                path.display(),
                e.to_details()
            )
        })
    } else {
        Ok(Config::default())
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Command::InitConfig = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(&args.config)?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if !args.config.exists() {
        log::warn!(
            "Config file {} not found, using defaults",
            args.config.display()
        );
    }
    log::info!(
        "Reading accounts from {} and postings from {}",
        config.accounts_path().display(),
        config.transactions_path().display()
    );

    let store = Arc::new(JsonFileStore::new(
        config.accounts_path(),
        config.transactions_path(),
    ));
    let service = ReportService::from_config(&config, store.clone(), store)?;
    let renderer = TableRenderer::new(&config.currency);

    let rt = Runtime::new()?;
    rt.block_on(async {
        match args.command {
            Command::TrialBalance { from, to } => {
                let period = ReportPeriod { start: from, end: to };
                let report = service.trial_balance(period).await?;
                match args.format {
                    Format::Json => print_json(&report)?,
                    Format::Table => {
                        print!("{}", renderer.trial_balance(&report, &period.description()));
                        eprint!("{}", render::warnings(&report.warnings));
                    }
                }
            }
            Command::IncomeStatement { from, to } => {
                let period = ReportPeriod { start: from, end: to };
                let report = service.income_statement(period).await?;
                match args.format {
                    Format::Json => print_json(&report)?,
                    Format::Table => {
                        print!("{}", renderer.income_statement(&report, &period.description()));
                        eprint!("{}", render::warnings(&report.warnings));
                    }
                }
            }
            Command::BalanceSheet { to } => {
                let period = ReportPeriod { start: None, end: to };
                let report = service.balance_sheet(to).await?;
                match args.format {
                    Format::Json => print_json(&report)?,
                    Format::Table => {
                        print!("{}", renderer.balance_sheet(&report, &period.description()));
                        eprint!("{}", render::warnings(&report.warnings));
                    }
                }
            }
            Command::CheckJournals => {
                let warnings = service.journal_warnings().await?;
                match args.format {
                    Format::Json => print_json(&warnings)?,
                    Format::Table if warnings.is_empty() => println!("All journals balance"),
                    Format::Table => print!("{}", render::warnings(&warnings)),
                }
            }
            Command::InitConfig => {}
        }
        Ok::<(), anyhow::Error>(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let config = load_config(Path::new("/definitely/not/here/config.yaml")).unwrap();
        assert_eq!(config.reports.current_earnings_code, "3999");
    }

    #[test]
    fn test_invalid_config_reports_setting() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "store:\n  fetch_timeout_ms: 0").unwrap();

        let message = load_config(file.path()).unwrap_err().to_string();
        assert!(message.contains("[INVALID_VALUE]"));
        assert!(message.contains("store.fetch_timeout_ms"));
    }
}
