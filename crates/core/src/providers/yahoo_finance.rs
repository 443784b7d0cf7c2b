use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::market::{DividendEvent, MarketSnapshot, PriceBar, PriceHistory};
use super::traits::MarketDataProvider;

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const QUOTE_SUMMARY_MODULES: &str = "assetProfile,summaryDetail,defaultKeyStatistics,price";

/// Yahoo Finance market-data provider.
///
/// - **Free**: No API key required (unofficial public API).
/// - **History**: daily OHLC plus dividend payment records via the
///   `yahoo_finance_api` crate.
/// - **Snapshot**: the quoteSummary endpoint queried directly with
///   reqwest, since the chart API does not expose fundamentals
///   (dividend rate, payout ratio, forward P/E, ...).
///
/// Any field can be missing for any symbol; the snapshot keeps those as
/// `None` and lets the caller decide what is required.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
    client: Client,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Ok(Self { connector, client })
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }
}

// ── quoteSummary response types ─────────────────────────────────────
// Numeric fields arrive as `{"raw": ..., "fmt": "..."}` objects; only
// the raw value matters here.

#[derive(Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: Option<QuoteSummaryBody>,
}

#[derive(Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfile>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatistics>,
    price: Option<PriceBlock>,
}

#[derive(Deserialize, Default)]
struct AssetProfile {
    sector: Option<String>,
}

#[derive(Deserialize, Default)]
struct SummaryDetail {
    #[serde(rename = "previousClose")]
    previous_close: Option<RawValue>,
    #[serde(rename = "dividendRate")]
    dividend_rate: Option<RawValue>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawValue>,
    #[serde(rename = "payoutRatio")]
    payout_ratio: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
    #[serde(rename = "exDividendDate")]
    ex_dividend_date: Option<RawValue>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Deserialize, Default)]
struct KeyStatistics {
    #[serde(rename = "forwardEps")]
    forward_eps: Option<RawValue>,
    #[serde(rename = "priceToBook")]
    price_to_book: Option<RawValue>,
}

#[derive(Deserialize, Default)]
struct PriceBlock {
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<RawValue>,
}

#[derive(Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn get_snapshot(&self, symbol: &str) -> Result<MarketSnapshot, CoreError> {
        let url = format!("{QUOTE_SUMMARY_URL}/{}", symbol.to_uppercase());
        let resp: QuoteSummaryResponse = self
            .client
            .get(&url)
            .query(&[("modules", QUOTE_SUMMARY_MODULES)])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to parse snapshot for {symbol}: {e}"),
            })?;

        let result = resp
            .quote_summary
            .and_then(|b| b.result)
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("No quoteSummary data for {symbol}"),
            })?;

        let profile = result.asset_profile.unwrap_or_default();
        let detail = result.summary_detail.unwrap_or_default();
        let stats = result.key_statistics.unwrap_or_default();
        let price = result.price.unwrap_or_default();

        let ex_dividend_date = raw(&detail.ex_dividend_date)
            .and_then(|ts| Self::timestamp_to_naive_date(ts as i64));

        Ok(MarketSnapshot {
            symbol: symbol.to_uppercase(),
            sector: profile.sector,
            short_name: price.short_name,
            long_name: price.long_name,
            previous_close: raw(&detail.previous_close),
            regular_market_price: raw(&price.regular_market_price),
            dividend_rate: raw(&detail.dividend_rate),
            dividend_yield: raw(&detail.dividend_yield),
            forward_pe: raw(&detail.forward_pe),
            forward_eps: raw(&stats.forward_eps),
            price_to_book: raw(&stats.price_to_book),
            payout_ratio: raw(&detail.payout_ratio),
            ex_dividend_date,
            market_cap: raw(&detail.market_cap),
        })
    }

    async fn get_price_history(
        &self,
        symbol: &str,
        years: u32,
    ) -> Result<PriceHistory, CoreError> {
        let range = format!("{years}y");
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", &range)
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch {range} history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let mut bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp as i64)?;
                Some(PriceBar {
                    date,
                    high: q.high,
                })
            })
            .collect();
        bars.sort_by_key(|b| b.date);

        if bars.is_empty() {
            return Err(CoreError::EmptyHistory(symbol.to_uppercase()));
        }

        // Dividend records ride along in the same chart response
        let mut dividends: Vec<DividendEvent> = resp
            .dividends()
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to parse dividends for {symbol}: {e}"),
            })?
            .iter()
            .filter_map(|d| {
                let date = Self::timestamp_to_naive_date(d.date as i64)?;
                Some(DividendEvent {
                    date,
                    amount: d.amount,
                })
            })
            .collect();
        dividends.sort_by_key(|d| d.date);

        Ok(PriceHistory { bars, dividends })
    }
}
