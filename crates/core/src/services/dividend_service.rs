use crate::errors::CoreError;
use crate::models::dashboard::DividendPoint;
use crate::models::market::{DividendEvent, PriceHistory};

/// Two dividend records closer together than this are treated as a
/// data-quality artifact of the source, not two real payments.
const DUPLICATE_WINDOW_DAYS: i64 = 10;

/// Derives dividend series from raw price history: deduplication, payment
/// frequency, historic yield, percent increases, and CAGR.
pub struct DividendService;

impl DividendService {
    pub fn new() -> Self {
        Self
    }

    /// Drop near-duplicate dividend records.
    ///
    /// The source occasionally reports the same payment twice a few days
    /// apart. A record within 10 days of the previously kept record
    /// replaces it: the earlier record is discarded, the later kept.
    /// Input must be sorted by date ascending.
    pub fn deduplicate(&self, payments: &[DividendEvent]) -> Vec<DividendEvent> {
        let mut kept: Vec<DividendEvent> = Vec::with_capacity(payments.len());
        for payment in payments {
            if let Some(last) = kept.last() {
                if (payment.date - last.date).num_days() < DUPLICATE_WINDOW_DAYS {
                    kept.pop();
                }
            }
            kept.push(payment.clone());
        }
        kept
    }

    /// Payments per year, applied uniformly across the window:
    /// `round(count / years)`. A simplifying approximation — no per-period
    /// detection of frequency changes.
    pub fn frequency(&self, payment_count: usize, span_years: u32) -> u32 {
        (payment_count as f64 / f64::from(span_years.max(1))).round() as u32
    }

    /// Compound annual growth rate: `(end/start)^(1/years) - 1`.
    /// Zero when the start value is not positive (no meaningful growth
    /// base, e.g. no dividend history).
    pub fn cagr(&self, start: f64, end: f64, years: u32) -> f64 {
        if start <= 0.0 {
            return 0.0;
        }
        (end / start).powf(1.0 / f64::from(years.max(1))) - 1.0
    }

    /// Build the per-payment dashboard series from retained records.
    ///
    /// For each record: historic yield is `amount * frequency / high`,
    /// where `high` is the daily high on the payment date; percent
    /// increase compares against the immediately prior retained amount
    /// and is `None` when unchanged or first.
    pub fn build_points(
        &self,
        history: &PriceHistory,
        retained: &[DividendEvent],
        frequency: u32,
    ) -> Result<Vec<DividendPoint>, CoreError> {
        let mut points = Vec::with_capacity(retained.len());
        let mut prev_amount: Option<f64> = None;

        for payment in retained {
            let high = history.high_on(payment.date).ok_or_else(|| {
                CoreError::EmptyHistory(format!(
                    "no price bar at or before dividend date {}",
                    payment.date
                ))
            })?;

            let historic_yield = payment.amount * f64::from(frequency) / high;

            let percent_increase = match prev_amount {
                Some(prev) if payment.amount != prev => {
                    Some((payment.amount - prev) / prev)
                }
                _ => None,
            };

            points.push(DividendPoint {
                date: payment.date,
                amount: payment.amount,
                historic_yield,
                percent_increase,
            });
            prev_amount = Some(payment.amount);
        }

        Ok(points)
    }
}

impl Default for DividendService {
    fn default() -> Self {
        Self::new()
    }
}
