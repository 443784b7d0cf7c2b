// ═══════════════════════════════════════════════════════════════════
// Service & Integration Tests — PortfolioService, DividendService,
// DgiTracker facade with a mock market-data provider
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use dgi_tracker_core::errors::CoreError;
use dgi_tracker_core::models::market::{
    DividendEvent, MarketSnapshot, PriceBar, PriceHistory,
};
use dgi_tracker_core::models::transaction::Transaction;
use dgi_tracker_core::providers::traits::MarketDataProvider;
use dgi_tracker_core::services::dividend_service::DividendService;
use dgi_tracker_core::services::portfolio_service::PortfolioService;
use dgi_tracker_core::DgiTracker;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Mock Provider
// ═══════════════════════════════════════════════════════════════════

#[derive(Default)]
struct MockMarketProvider {
    snapshots: HashMap<String, MarketSnapshot>,
    histories: HashMap<String, PriceHistory>,
}

impl MockMarketProvider {
    fn with_snapshot(mut self, snapshot: MarketSnapshot) -> Self {
        self.snapshots.insert(snapshot.symbol.clone(), snapshot);
        self
    }

    fn with_history(mut self, symbol: &str, history: PriceHistory) -> Self {
        self.histories.insert(symbol.to_string(), history);
        self
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketProvider {
    fn name(&self) -> &str {
        "MockProvider"
    }

    async fn get_snapshot(&self, symbol: &str) -> Result<MarketSnapshot, CoreError> {
        self.snapshots
            .get(symbol)
            .cloned()
            .ok_or_else(|| CoreError::Api {
                provider: "MockProvider".into(),
                message: format!("no snapshot for {symbol}"),
            })
    }

    async fn get_price_history(
        &self,
        symbol: &str,
        _years: u32,
    ) -> Result<PriceHistory, CoreError> {
        self.histories
            .get(symbol)
            .cloned()
            .ok_or_else(|| CoreError::EmptyHistory(symbol.to_string()))
    }
}

fn ko_snapshot() -> MarketSnapshot {
    MarketSnapshot {
        symbol: "KO".into(),
        short_name: Some("Coca-Cola Company (The)".into()),
        long_name: Some("The Coca-Cola Company".into()),
        sector: Some("Consumer Defensive".into()),
        previous_close: Some(60.0),
        regular_market_price: Some(61.0),
        dividend_rate: Some(1.94),
        dividend_yield: Some(0.0318),
        forward_pe: Some(20.5),
        forward_eps: Some(2.97),
        price_to_book: Some(9.8),
        payout_ratio: Some(0.68),
        ex_dividend_date: Some(d(2025, 6, 13)),
        market_cap: Some(260_000_000_000.0),
    }
}

/// Six years of bars (sparse — only the dates the tests touch) plus a
/// quarterly dividend tail.
fn ko_history() -> PriceHistory {
    let mut bars = vec![
        PriceBar { date: d(2019, 7, 1), high: 40.0 },
        PriceBar { date: d(2023, 1, 3), high: 58.0 },
        PriceBar { date: d(2023, 1, 9), high: 58.5 },
        PriceBar { date: d(2023, 4, 3), high: 59.0 },
        PriceBar { date: d(2023, 7, 3), high: 60.0 },
    ];
    bars.push(PriceBar { date: d(2025, 7, 1), high: 62.0 });
    PriceHistory {
        bars,
        dividends: vec![
            DividendEvent { date: d(2023, 1, 3), amount: 0.42 },
            DividendEvent { date: d(2023, 1, 9), amount: 0.42 },
            DividendEvent { date: d(2023, 4, 3), amount: 0.42 },
            DividendEvent { date: d(2023, 7, 3), amount: 0.46 },
        ],
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioService — aggregation
// ═══════════════════════════════════════════════════════════════════

mod aggregation {
    use super::*;

    #[test]
    fn sums_columns_and_counts_tranches() {
        let service = PortfolioService::new();
        let transactions = vec![
            Transaction::new("KO", 10.0, 400.0, 1.0),
            Transaction::new("KO", 5.0, 210.0, 1.0),
        ];

        let positions = service.aggregate(&transactions);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].symbol, "KO");
        assert_eq!(positions[0].quantity, 15.0);
        assert_eq!(positions[0].principal, 610.0);
        assert_eq!(positions[0].commission, 2.0);
        assert_eq!(positions[0].tranches, 2);
    }

    #[test]
    fn output_is_sorted_by_symbol() {
        let service = PortfolioService::new();
        let transactions = vec![
            Transaction::new("PEP", 3.0, 500.0, 1.0),
            Transaction::new("KO", 10.0, 400.0, 1.0),
            Transaction::new("MMM", 2.0, 200.0, 1.0),
        ];

        let symbols: Vec<String> = service
            .aggregate(&transactions)
            .into_iter()
            .map(|p| p.symbol)
            .collect();
        assert_eq!(symbols, vec!["KO", "MMM", "PEP"]);
    }

    #[test]
    fn empty_input_yields_empty_portfolio() {
        let service = PortfolioService::new();
        assert!(service.aggregate(&[]).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioService — derived columns
// ═══════════════════════════════════════════════════════════════════

mod enrichment {
    use super::*;

    #[tokio::test]
    async fn derives_cash_flow_and_market_value() {
        let provider = MockMarketProvider::default().with_snapshot(ko_snapshot());
        let service = PortfolioService::new();
        let positions = service.aggregate(&[
            Transaction::new("KO", 10.0, 400.0, 1.0),
            Transaction::new("KO", 5.0, 210.0, 1.0),
        ]);

        let report = service.enrich(positions, &provider).await.unwrap();
        let row = &report.positions[0];

        assert!((row.cash_flow - 15.0 * 1.94).abs() < 1e-9);
        assert!((row.market_value - 15.0 * 60.0).abs() < 1e-9);
        assert!((row.yield_on_cost - (15.0 * 1.94) / 610.0).abs() < 1e-9);
        // single symbol owns the whole portfolio
        assert!((row.cash_flow_pct - 1.0).abs() < 1e-9);
        assert!((row.market_value_pct - 1.0).abs() < 1e-9);

        assert!((report.totals.quantity - 15.0).abs() < 1e-9);
        assert!((report.totals.principal - 610.0).abs() < 1e-9);
        assert!((report.totals.commission - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn missing_dividend_rate_zeroes_cash_flow_without_aborting() {
        let mut no_dividend = MarketSnapshot::empty("GOOG");
        no_dividend.previous_close = Some(180.0);
        let provider = MockMarketProvider::default()
            .with_snapshot(ko_snapshot())
            .with_snapshot(no_dividend);

        let service = PortfolioService::new();
        let positions = service.aggregate(&[
            Transaction::new("GOOG", 2.0, 300.0, 1.0),
            Transaction::new("KO", 15.0, 610.0, 2.0),
        ]);

        let report = service.enrich(positions, &provider).await.unwrap();
        let goog = &report.positions[0];
        assert_eq!(goog.position.symbol, "GOOG");
        assert_eq!(goog.cash_flow, 0.0);
        assert_eq!(goog.cash_flow_pct, 0.0);
        assert_eq!(goog.yield_on_cost, 0.0);
        // KO still carries the full cash flow
        assert!((report.positions[1].cash_flow_pct - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn percentage_shares_sum_to_one() {
        let mut pep = ko_snapshot();
        pep.symbol = "PEP".into();
        pep.previous_close = Some(170.0);
        pep.dividend_rate = Some(5.42);
        let provider = MockMarketProvider::default()
            .with_snapshot(ko_snapshot())
            .with_snapshot(pep);

        let service = PortfolioService::new();
        let positions = service.aggregate(&[
            Transaction::new("KO", 15.0, 610.0, 2.0),
            Transaction::new("PEP", 4.0, 700.0, 1.0),
        ]);

        let report = service.enrich(positions, &provider).await.unwrap();
        let cash_flow_pct: f64 = report.positions.iter().map(|p| p.cash_flow_pct).sum();
        let market_value_pct: f64 = report.positions.iter().map(|p| p.market_value_pct).sum();
        assert!((cash_flow_pct - 1.0).abs() < 1e-9);
        assert!((market_value_pct - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn failed_snapshot_lookup_aborts_the_batch() {
        let provider = MockMarketProvider::default(); // knows nothing
        let service = PortfolioService::new();
        let positions = service.aggregate(&[Transaction::new("KO", 1.0, 60.0, 1.0)]);

        let err = service.enrich(positions, &provider).await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  DividendService
// ═══════════════════════════════════════════════════════════════════

mod dividends {
    use super::*;

    #[test]
    fn near_duplicate_drops_the_earlier_record() {
        let service = DividendService::new();
        let payments = vec![
            DividendEvent { date: d(2023, 1, 3), amount: 0.42 },
            DividendEvent { date: d(2023, 1, 9), amount: 0.42 },
            DividendEvent { date: d(2023, 4, 3), amount: 0.44 },
        ];

        let retained = service.deduplicate(&payments);
        let dates: Vec<NaiveDate> = retained.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2023, 1, 9), d(2023, 4, 3)]);
    }

    #[test]
    fn ten_days_apart_keeps_both() {
        let service = DividendService::new();
        let payments = vec![
            DividendEvent { date: d(2023, 1, 3), amount: 0.42 },
            DividendEvent { date: d(2023, 1, 13), amount: 0.42 },
        ];
        assert_eq!(service.deduplicate(&payments).len(), 2);
    }

    #[test]
    fn frequency_is_rounded_per_year() {
        let service = DividendService::new();
        assert_eq!(service.frequency(24, 6), 4);
        assert_eq!(service.frequency(11, 6), 2);
        assert_eq!(service.frequency(4, 1), 4);
        assert_eq!(service.frequency(0, 6), 0);
    }

    #[test]
    fn cagr_doubling_in_one_year() {
        let service = DividendService::new();
        assert!((service.cagr(1.0, 2.0, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cagr_zero_start_is_zero() {
        let service = DividendService::new();
        assert_eq!(service.cagr(0.0, 0.46, 6), 0.0);
    }

    #[test]
    fn percent_increase_series() {
        let service = DividendService::new();
        let history = ko_history();
        let retained = service.deduplicate(&history.dividends);
        let points = service.build_points(&history, &retained, 4).unwrap();

        // amounts [0.42, 0.42, 0.46] → [None, None, ~9.52%]
        let increases: Vec<Option<f64>> =
            points.iter().map(|p| p.percent_increase).collect();
        assert_eq!(increases[0], None);
        assert_eq!(increases[1], None);
        let last = increases[2].unwrap();
        assert!((last - 0.095238).abs() < 1e-4);
    }

    #[test]
    fn historic_yield_uses_daily_high() {
        let service = DividendService::new();
        let history = ko_history();
        let retained = service.deduplicate(&history.dividends);
        let points = service.build_points(&history, &retained, 4).unwrap();

        // first retained payment lands on 2023-01-09 (high 58.5)
        assert_eq!(points[0].date, d(2023, 1, 9));
        assert!((points[0].historic_yield - 0.42 * 4.0 / 58.5).abs() < 1e-9);
    }

    #[test]
    fn payment_before_first_bar_is_an_error() {
        let service = DividendService::new();
        let history = PriceHistory {
            bars: vec![PriceBar { date: d(2023, 1, 3), high: 58.0 }],
            dividends: vec![],
        };
        let orphan = [DividendEvent { date: d(2022, 12, 1), amount: 0.42 }];

        let err = service.build_points(&history, &orphan, 4).unwrap_err();
        assert!(matches!(err, CoreError::EmptyHistory(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  DgiTracker facade
// ═══════════════════════════════════════════════════════════════════

mod facade {
    use super::*;

    #[tokio::test]
    async fn builds_full_portfolio_report() {
        let provider = MockMarketProvider::default().with_snapshot(ko_snapshot());
        let tracker = DgiTracker::with_provider(Box::new(provider));

        let report = tracker
            .build_portfolio(&[
                Transaction::new("KO", 10.0, 400.0, 1.0),
                Transaction::new("KO", 5.0, 210.0, 1.0),
            ])
            .await
            .unwrap();

        assert_eq!(report.positions.len(), 1);
        assert_eq!(report.positions[0].position.tranches, 2);
        assert!((report.totals.cash_flow - 15.0 * 1.94).abs() < 1e-9);
    }

    #[tokio::test]
    async fn builds_dashboard_with_synchronized_axes() {
        let provider = MockMarketProvider::default()
            .with_snapshot(ko_snapshot())
            .with_history("KO", ko_history());
        let tracker = DgiTracker::with_provider(Box::new(provider));

        let dashboard = tracker.build_dashboard("ko", 6).await.unwrap();

        assert_eq!(dashboard.summary.ticker, "KO");
        assert_eq!(dashboard.summary.years, 6);
        assert_eq!(dashboard.summary.current_price, 61.0);
        // 3 retained payments over 6 years rounds to 1 per year
        assert_eq!(dashboard.summary.dividend_frequency, 1);
        assert_eq!(dashboard.payments.len(), 3);
        assert!(dashboard.summary.dividend_cagr > 0.0);
        assert!(dashboard.summary.stock_cagr > 0.0);
        assert!((dashboard.max_price - 62.0).abs() < 1e-9);

        // synchronized layout: both axes share the rendered gridline count
        let axes = &dashboard.axes;
        assert!(axes.amount_range_max > axes.amount_axis.max_value);
        let amount_lines = axes.amount_range_max / axes.amount_axis.tick_interval;
        let yield_lines = axes.yield_range_max / axes.yield_axis.tick_interval;
        assert!((amount_lines - yield_lines).abs() < 1e-9);
    }

    #[tokio::test]
    async fn no_dividend_history_zeroes_the_metrics() {
        let mut snapshot = ko_snapshot();
        snapshot.symbol = "AMZN".into();
        let history = PriceHistory {
            bars: vec![
                PriceBar { date: d(2019, 7, 1), high: 40.0 },
                PriceBar { date: d(2025, 7, 1), high: 62.0 },
            ],
            dividends: vec![],
        };
        let provider = MockMarketProvider::default()
            .with_snapshot(snapshot)
            .with_history("AMZN", history);
        let tracker = DgiTracker::with_provider(Box::new(provider));

        let dashboard = tracker.build_dashboard("AMZN", 6).await.unwrap();
        assert!(dashboard.payments.is_empty());
        assert_eq!(dashboard.summary.dividend_cagr, 0.0);
        assert_eq!(dashboard.summary.dividend_frequency, 0);
        // stock CAGR still computed from price history
        assert!(dashboard.summary.stock_cagr > 0.0);
        // empty series fall back, axes stay valid for the renderer
        assert!(dashboard.axes.amount_range_max > 0.0);
        assert!(dashboard.axes.yield_range_max > 0.0);
    }

    #[tokio::test]
    async fn missing_current_price_is_an_error() {
        let mut snapshot = ko_snapshot();
        snapshot.regular_market_price = None;
        let provider = MockMarketProvider::default()
            .with_snapshot(snapshot)
            .with_history("KO", ko_history());
        let tracker = DgiTracker::with_provider(Box::new(provider));

        let err = tracker.build_dashboard("KO", 6).await.unwrap_err();
        assert!(matches!(err, CoreError::MissingField { .. }));
    }
}
