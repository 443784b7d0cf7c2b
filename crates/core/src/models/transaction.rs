use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// One row of the brokerage transaction export: a single purchase
/// (tranche) of a security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Ticker symbol, uppercased (e.g., "KO", "PEP")
    pub symbol: String,

    /// Trade date, when the export carries a parseable one
    pub trade_date: Option<NaiveDate>,

    /// Number of shares bought
    pub quantity: f64,

    /// Principal amount of the trade
    pub principal: f64,

    /// Broker commission
    pub commission: f64,

    /// Per-share purchase price
    pub price: f64,

    /// Exchange/regulatory fees
    pub other_fees: f64,

    /// Net amount charged to the account
    pub net_amount: f64,
}

impl Transaction {
    pub fn new(symbol: impl Into<String>, quantity: f64, principal: f64, commission: f64) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            trade_date: None,
            quantity,
            principal,
            commission,
            price: 0.0,
            other_fees: 0.0,
            net_amount: 0.0,
        }
    }
}

/// Normalize a currency-formatted cell into an `f64`.
///
/// The export renders numeric columns as text like `"$1,234.56"`; everything
/// other than ASCII digits and the decimal point is stripped before parsing.
pub fn parse_currency(raw: &str) -> Result<f64, CoreError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidNumber(raw.to_string()))
}
