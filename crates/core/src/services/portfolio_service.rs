use std::collections::BTreeMap;

use log::warn;

use crate::errors::CoreError;
use crate::models::market::MarketSnapshot;
use crate::models::position::{PortfolioPosition, PortfolioReport, PortfolioTotals, Position};
use crate::models::transaction::Transaction;
use crate::providers::traits::MarketDataProvider;

/// Aggregates transactions into per-symbol positions and enriches them
/// with market data and derived columns.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Group transactions by symbol, summing quantity, principal and
    /// commission and counting tranches. Output is sorted by symbol.
    pub fn aggregate(&self, transactions: &[Transaction]) -> Vec<Position> {
        let mut by_symbol: BTreeMap<String, Position> = BTreeMap::new();

        for tx in transactions {
            let entry = by_symbol
                .entry(tx.symbol.clone())
                .or_insert_with(|| Position {
                    symbol: tx.symbol.clone(),
                    quantity: 0.0,
                    principal: 0.0,
                    commission: 0.0,
                    tranches: 0,
                });
            entry.quantity += tx.quantity;
            entry.principal += tx.principal;
            entry.commission += tx.commission;
            entry.tranches += 1;
        }

        by_symbol.into_values().collect()
    }

    /// Fetch a market snapshot per position and compute the derived
    /// columns. Absent market fields contribute zero to the derived
    /// metrics and do not abort the batch; a failed lookup does.
    pub async fn enrich(
        &self,
        positions: Vec<Position>,
        provider: &dyn MarketDataProvider,
    ) -> Result<PortfolioReport, CoreError> {
        let mut snapshots = Vec::with_capacity(positions.len());
        for position in &positions {
            snapshots.push(provider.get_snapshot(&position.symbol).await?);
        }

        Ok(self.build_report(positions, snapshots))
    }

    /// Derive cash flow, market value, yield-on-cost and the percentage
    /// shares, then total everything up.
    pub fn build_report(
        &self,
        positions: Vec<Position>,
        snapshots: Vec<MarketSnapshot>,
    ) -> PortfolioReport {
        let mut rows: Vec<PortfolioPosition> = positions
            .into_iter()
            .zip(snapshots)
            .map(|(position, snapshot)| {
                let cash_flow = match snapshot.dividend_rate {
                    Some(rate) => position.quantity * rate,
                    None => {
                        warn!("{}: no dividend rate, cash flow set to 0", position.symbol);
                        0.0
                    }
                };
                let market_value = match snapshot.previous_close {
                    Some(close) => position.quantity * close,
                    None => {
                        warn!("{}: no closing price, market value set to 0", position.symbol);
                        0.0
                    }
                };
                let yield_on_cost = if position.principal > 0.0 {
                    cash_flow / position.principal
                } else {
                    0.0
                };

                PortfolioPosition {
                    position,
                    snapshot,
                    cash_flow,
                    cash_flow_pct: 0.0,    // filled below
                    market_value,
                    market_value_pct: 0.0, // filled below
                    yield_on_cost,
                }
            })
            .collect();

        let totals = PortfolioTotals {
            quantity: rows.iter().map(|r| r.position.quantity).sum(),
            principal: rows.iter().map(|r| r.position.principal).sum(),
            cash_flow: rows.iter().map(|r| r.cash_flow).sum(),
            commission: rows.iter().map(|r| r.position.commission).sum(),
            market_value: rows.iter().map(|r| r.market_value).sum(),
        };

        for row in &mut rows {
            row.cash_flow_pct = if totals.cash_flow > 0.0 {
                row.cash_flow / totals.cash_flow
            } else {
                0.0
            };
            row.market_value_pct = if totals.market_value > 0.0 {
                row.market_value / totals.market_value
            } else {
                0.0
            };
        }

        PortfolioReport {
            positions: rows,
            totals,
        }
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
