pub mod errors;
pub mod models;
pub mod providers;
pub mod render;
pub mod services;
pub mod spreadsheet;

use errors::CoreError;
use models::dashboard::{Dashboard, DashboardSummary};
use models::position::PortfolioReport;
use models::transaction::Transaction;
use providers::traits::MarketDataProvider;
use providers::yahoo_finance::YahooFinanceProvider;
use services::chart_service::{ChartService, DEFAULT_GRIDLINES};
use services::dividend_service::DividendService;
use services::portfolio_service::PortfolioService;

/// Main entry point for the DGI tracker core library.
///
/// Owns the market-data provider and the services for the two batch
/// pipelines: the portfolio aggregator and the dividend dashboard. Each
/// call is a fresh, independent computation over its inputs — no state is
/// carried between runs.
#[must_use]
pub struct DgiTracker {
    provider: Box<dyn MarketDataProvider>,
    portfolio_service: PortfolioService,
    dividend_service: DividendService,
    chart_service: ChartService,
}

impl DgiTracker {
    /// Create a tracker backed by Yahoo Finance.
    pub fn new() -> Result<Self, CoreError> {
        Ok(Self::with_provider(Box::new(YahooFinanceProvider::new()?)))
    }

    /// Create a tracker with a custom market-data provider (tests swap in
    /// a mock here).
    pub fn with_provider(provider: Box<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            portfolio_service: PortfolioService::new(),
            dividend_service: DividendService::new(),
            chart_service: ChartService::new(),
        }
    }

    // ── Portfolio Aggregator ────────────────────────────────────────

    /// Aggregate transactions per symbol, enrich each position with its
    /// market snapshot and compute the derived columns.
    pub async fn build_portfolio(
        &self,
        transactions: &[Transaction],
    ) -> Result<PortfolioReport, CoreError> {
        let positions = self.portfolio_service.aggregate(transactions);
        self.portfolio_service
            .enrich(positions, self.provider.as_ref())
            .await
    }

    // ── Dividend Dashboard ──────────────────────────────────────────

    /// Build the single-ticker dashboard: fetch history and snapshot,
    /// derive the dividend series, and compute the synchronized axis
    /// layout for the renderer.
    ///
    /// A symbol with no dividend history gets zeroed dividend metrics and
    /// an empty payments list. A missing current market price is an error
    /// — the stock CAGR cannot be computed without it.
    pub async fn build_dashboard(
        &self,
        ticker: &str,
        years: u32,
    ) -> Result<Dashboard, CoreError> {
        let ticker = ticker.to_uppercase();
        let history = self.provider.get_price_history(&ticker, years).await?;
        let snapshot = self.provider.get_snapshot(&ticker).await?;
        let span = history.span_years();

        let current_price =
            snapshot
                .regular_market_price
                .ok_or_else(|| CoreError::MissingField {
                    symbol: ticker.clone(),
                    field: "regularMarketPrice".into(),
                })?;
        let start_price = history
            .bars
            .first()
            .map(|b| b.high)
            .ok_or_else(|| CoreError::EmptyHistory(ticker.clone()))?;
        let stock_cagr = self.dividend_service.cagr(start_price, current_price, span);

        let retained = self.dividend_service.deduplicate(&history.dividends);
        let (dividend_cagr, frequency, payments) = if retained.is_empty() {
            (0.0, 0, Vec::new())
        } else {
            let frequency = self.dividend_service.frequency(retained.len(), span);
            let dividend_cagr = self.dividend_service.cagr(
                retained[0].amount,
                retained[retained.len() - 1].amount,
                span,
            );
            let payments = self
                .dividend_service
                .build_points(&history, &retained, frequency)?;
            (dividend_cagr, frequency, payments)
        };

        let amounts: Vec<f64> = payments.iter().map(|p| p.amount).collect();
        let yields: Vec<f64> = payments.iter().map(|p| p.historic_yield).collect();
        let axes = self
            .chart_service
            .build_layout(&amounts, &yields, DEFAULT_GRIDLINES);

        Ok(Dashboard {
            summary: DashboardSummary {
                ticker,
                long_name: snapshot.long_name.clone(),
                years: span,
                current_price,
                dividend_cagr,
                current_yield: snapshot.dividend_yield,
                payout_ratio: snapshot.payout_ratio,
                forward_pe: snapshot.forward_pe,
                stock_cagr,
                dividend_frequency: frequency,
            },
            payments,
            max_price: history.max_high(),
            prices: history.bars,
            axes,
        })
    }
}
