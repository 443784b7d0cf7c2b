use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::market::{MarketSnapshot, PriceHistory};

/// Trait abstraction over the market-data source.
///
/// The rest of the codebase treats the source as a black box returning
/// named fields per symbol. If the API changes or a different vendor is
/// swapped in, only the provider implementation moves.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the per-symbol snapshot of named market fields.
    /// Individual fields may be absent; that is not an error.
    async fn get_snapshot(&self, symbol: &str) -> Result<MarketSnapshot, CoreError>;

    /// Fetch daily price bars and dividend payment records over a
    /// trailing window of `years`. Both lists come back sorted by date.
    async fn get_price_history(
        &self,
        symbol: &str,
        years: u32,
    ) -> Result<PriceHistory, CoreError>;
}
