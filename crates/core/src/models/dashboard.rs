use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::market::PriceBar;

/// Read-only axis descriptor computed from one series and a gridline count.
///
/// `tick_interval` (plotting-library "dtick") is the spacing between
/// gridlines; `tick_ratio` relates the scaled range to that spacing and is
/// what the cross-axis synchronizer maximizes over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// Maximum observed value (or the empty-series fallback)
    pub max_value: f64,

    /// `max_value * 1000` — scaled up before digit counting so sub-unit
    /// series keep their leading digit
    pub scaled_range: f64,

    /// Gridline spacing in data units
    pub tick_interval: f64,

    /// `scaled_range / tick_interval`
    pub tick_ratio: f64,
}

impl AxisSpec {
    /// A degenerate axis carries no usable scale and renders as a flat
    /// zero line.
    pub fn is_degenerate(&self) -> bool {
        self.tick_interval == 0.0
    }
}

/// One global scale shared by all synchronized axes on a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedAxes {
    /// Maximum `tick_ratio` across the input axes
    pub global_tick_ratio: f64,

    /// Maximum positive ratio across the input axes plus fixed headroom,
    /// so the topmost data point never sits flush against the axis top
    pub global_positive_ratio: f64,

    /// Rendered range maximum per input axis, in input order:
    /// `global_positive_ratio * tick_interval_i`
    pub range_max: Vec<f64>,
}

/// Axis parameters for the dashboard's two synchronized y-axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    pub amount_axis: AxisSpec,
    pub yield_axis: AxisSpec,

    /// Rendered range maximum for the dividend-amount axis
    pub amount_range_max: f64,

    /// Rendered range maximum for the historic-yield axis
    pub yield_range_max: f64,

    pub gridlines: u32,
}

/// One retained dividend payment with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendPoint {
    pub date: NaiveDate,

    /// Dividend per share
    pub amount: f64,

    /// `amount * annual_frequency / daily_high_on_date`
    pub historic_yield: f64,

    /// Increase over the previous retained amount, as a fraction.
    /// `None` for the first record and when the amount is unchanged;
    /// cuts produce negative values.
    pub percent_increase: Option<f64>,
}

/// Header-table values for the dashboard. Optional fields render as a
/// placeholder when the source omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub ticker: String,
    pub long_name: Option<String>,

    /// Whole years of history actually returned
    pub years: u32,

    pub current_price: f64,
    pub dividend_cagr: f64,
    pub current_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub stock_cagr: f64,

    /// Dividend payments per year, `round(count / years)`
    pub dividend_frequency: u32,
}

/// Everything the rendering layer consumes: computed series plus axis
/// parameters. The renderer adds no numbers of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub summary: DashboardSummary,

    /// Retained dividend payments with derived metrics, date ascending
    pub payments: Vec<DividendPoint>,

    /// Daily highs over the trailing window
    pub prices: Vec<PriceBar>,

    /// Maximum daily high — range of the share-price axis
    pub max_price: f64,

    pub axes: AxisLayout,
}
