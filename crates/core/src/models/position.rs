use serde::{Deserialize, Serialize};

use super::market::MarketSnapshot;

/// Aggregate of all transactions for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Ticker symbol, uppercased
    pub symbol: String,

    /// Total shares held
    pub quantity: f64,

    /// Total invested principal
    pub principal: f64,

    /// Total commissions paid
    pub commission: f64,

    /// Number of discrete purchases contributing to the position
    pub tranches: usize,
}

/// A position enriched with its market snapshot and derived columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub position: Position,
    pub snapshot: MarketSnapshot,

    /// Annual dividend cash flow: quantity × forward dividend rate
    /// (0 when the rate is absent for this symbol)
    pub cash_flow: f64,

    /// This position's share of the portfolio's total cash flow
    pub cash_flow_pct: f64,

    /// quantity × previous close (0 when the close is absent)
    pub market_value: f64,

    /// This position's share of the portfolio's total market value
    pub market_value_pct: f64,

    /// Yield on cost: cash flow / invested principal
    pub yield_on_cost: f64,
}

/// Column-wise totals for the summary sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    pub quantity: f64,
    pub principal: f64,
    pub cash_flow: f64,
    pub commission: f64,
    pub market_value: f64,
}

/// The full aggregated, enriched portfolio — everything the writer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioReport {
    /// One row per symbol, sorted by symbol
    pub positions: Vec<PortfolioPosition>,
    pub totals: PortfolioTotals,
}
