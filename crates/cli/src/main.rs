use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::info;

use dgi_tracker_core::errors::CoreError;
use dgi_tracker_core::render::write_dashboard;
use dgi_tracker_core::spreadsheet::reader::read_transactions;
use dgi_tracker_core::spreadsheet::writer::write_portfolio;
use dgi_tracker_core::DgiTracker;

/// File name of the generated portfolio workbook.
const PORTFOLIO_FILE_NAME: &str = "dgi-portfolio.xlsx";

#[derive(Parser)]
#[command(
    name = "dgi-tracker",
    version,
    about = "Dividend-growth portfolio tracker: aggregates a brokerage \
             transaction export, enriches it with market data, and renders \
             a single-ticker dividend dashboard"
)]
struct Cli {
    /// Brokerage transaction export (.xlsx, sheet "Sheet1")
    transactions: PathBuf,

    /// Output directory (or a file inside it) for the portfolio workbook
    output: PathBuf,

    /// Also render a dividend dashboard for this ticker
    #[arg(long)]
    dashboard: Option<String>,

    /// Trailing window of dashboard history, in years
    #[arg(long, default_value_t = 6)]
    years: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // Usage errors are reported before any computation
    let (portfolio_path, output_dir) = match resolve_paths(&cli.transactions, &cli.output) {
        Ok(paths) => paths,
        Err(message) => {
            eprintln!("Error: {message}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &portfolio_path, &output_dir).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, portfolio_path: &Path, output_dir: &Path) -> Result<(), CoreError> {
    info!("Reading transactions from {}", cli.transactions.display());
    let transactions = read_transactions(&cli.transactions)?;
    info!("Read {} transactions", transactions.len());

    let tracker = DgiTracker::new()?;

    info!("Creating portfolio");
    let report = tracker.build_portfolio(&transactions).await?;
    write_portfolio(&report, portfolio_path)?;
    info!("Wrote {}", portfolio_path.display());

    if let Some(ticker) = &cli.dashboard {
        let ticker = ticker.to_uppercase();
        info!("Building {}-year dashboard for {ticker}", cli.years);
        let dashboard = tracker.build_dashboard(&ticker, cli.years).await?;
        let dashboard_path = output_dir.join(format!("dgi-dashboard-{ticker}.html"));
        write_dashboard(&dashboard, &dashboard_path)?;
        info!("Wrote {}", dashboard_path.display());
    }

    Ok(())
}

/// Validate the transaction file and resolve the output paths.
///
/// The transaction file must exist and carry an `.xlsx` extension. The
/// output argument may be an existing directory (the workbook name is
/// appended) or an existing file (its parent directory is used).
fn resolve_paths(transactions: &Path, output: &Path) -> Result<(PathBuf, PathBuf), String> {
    if !transactions.is_file() {
        return Err(format!(
            "transaction table '{}' does not exist",
            transactions.display()
        ));
    }
    if transactions.extension().and_then(|e| e.to_str()) != Some("xlsx") {
        return Err(format!(
            "transaction table '{}' is not an .xlsx file",
            transactions.display()
        ));
    }

    let output_dir = if output.is_dir() {
        output.to_path_buf()
    } else if output.is_file() {
        output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    } else {
        return Err(format!("invalid output path '{}'", output.display()));
    };

    Ok((output_dir.join(PORTFOLIO_FILE_NAME), output_dir))
}
