use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-symbol snapshot of named market fields.
///
/// The market-data source is a black box that may omit any field for any
/// symbol, so every field is an `Option`. Consumers match on presence
/// explicitly; an absent field never aborts a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Ticker symbol, uppercased
    pub symbol: String,

    pub sector: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,

    /// Previous session's closing price
    pub previous_close: Option<f64>,

    /// Latest traded price
    pub regular_market_price: Option<f64>,

    /// Forward annual dividend per share
    pub dividend_rate: Option<f64>,

    /// Forward dividend yield (fraction, not percent)
    pub dividend_yield: Option<f64>,

    pub forward_pe: Option<f64>,
    pub forward_eps: Option<f64>,
    pub price_to_book: Option<f64>,

    /// Fraction of earnings paid out as dividends
    pub payout_ratio: Option<f64>,

    /// Ex-dividend date, converted from the source's epoch timestamp
    pub ex_dividend_date: Option<NaiveDate>,

    pub market_cap: Option<f64>,
}

impl MarketSnapshot {
    /// A snapshot with every field absent. Useful as a test fixture and as
    /// the shape returned for symbols the source knows nothing about.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            ..Self::default()
        }
    }
}

/// One day of price history. Only the daily high is kept; it is the price
/// reference for historic-yield computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub high: f64,
}

/// A dividend payment record from the price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Daily price bars plus dividend payment records over a trailing window.
/// Both lists are sorted by date ascending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceHistory {
    pub bars: Vec<PriceBar>,
    pub dividends: Vec<DividendEvent>,
}

impl PriceHistory {
    /// Calendar span of the returned bars in whole years:
    /// `round(days / 365.25)`, clamped to at least 1 so that CAGR and
    /// frequency stay defined for short windows.
    pub fn span_years(&self) -> u32 {
        let (Some(first), Some(last)) = (self.bars.first(), self.bars.last()) else {
            return 1;
        };
        let days = (last.date - first.date).num_days() as f64;
        let years = (days / 365.25).round() as u32;
        years.max(1)
    }

    /// Daily high on `date`, falling back to the nearest earlier bar
    /// (dividend records land on trading days, but the sources disagree
    /// occasionally).
    pub fn high_on(&self, date: NaiveDate) -> Option<f64> {
        match self.bars.binary_search_by_key(&date, |b| b.date) {
            Ok(idx) => Some(self.bars[idx].high),
            Err(0) => None,
            Err(idx) => Some(self.bars[idx - 1].high),
        }
    }

    /// Maximum of all daily highs, 0.0 for an empty history.
    pub fn max_high(&self) -> f64 {
        self.bars.iter().map(|b| b.high).fold(0.0, f64::max)
    }
}
