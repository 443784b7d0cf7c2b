use crate::models::dashboard::{AxisLayout, AxisSpec, SyncedAxes};

/// Gridlines per synchronized axis on the dashboard.
pub const DEFAULT_GRIDLINES: u32 = 4;

/// Scale-up factor applied before digit counting, so series with sub-unit
/// maxima (dividend amounts, yields) keep a countable leading digit.
const PRECISION_SCALE: f64 = 1000.0;

/// Stand-in maximum for an empty series, e.g. a security that has never
/// paid a dividend. Keeps the axis and the synchronizer well-defined.
const EMPTY_SERIES_MAX: f64 = 5.0;

/// Fixed padding added to the global positive ratio so the topmost data
/// point never touches the axis top.
const RANGE_HEADROOM: f64 = 0.1;

/// Computes gridline spacing for a single axis and one shared scale for a
/// set of overlaid axes, so unrelated units (dollars and percent) line up
/// on the same gridlines with their zero baselines aligned.
///
/// Pure arithmetic over the input series; holds no state between builds.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one series of non-negative values onto "round" gridlines.
    ///
    /// The tick interval is derived from the leading decimal digit of the
    /// series maximum, so it is independent of the series' absolute
    /// magnitude: scaling the input by a power of ten scales the tick
    /// interval by the same power and leaves the leading digit unchanged.
    ///
    /// `gridline_count` must be at least 1. An empty series falls back to
    /// a maximum of 5.0. A series whose maximum is zero (or so small that
    /// the scaled range has no integer digits) produces a degenerate axis
    /// with a zero tick interval — the digit count is undefined there.
    pub fn normalize_axis(&self, values: &[f64], gridline_count: u32) -> AxisSpec {
        let max_value = match values.iter().copied().reduce(f64::max) {
            Some(max) => max,
            None => EMPTY_SERIES_MAX,
        };

        let scaled_range = max_value * PRECISION_SCALE;
        let floored = scaled_range.floor();
        if floored < 1.0 {
            // Degenerate: no leading digit to count. Rendered as a flat
            // zero line.
            return AxisSpec {
                max_value,
                scaled_range,
                tick_interval: 0.0,
                tick_ratio: 0.0,
            };
        }

        let digit_count = (floored as u64).ilog10() + 1;
        let divisor = 10f64.powi(digit_count as i32 - 1);
        let leading_digit = (scaled_range / divisor).floor();
        let rounded_max = divisor * leading_digit / PRECISION_SCALE;
        let tick_interval = rounded_max / f64::from(gridline_count);
        let tick_ratio = scaled_range / tick_interval;

        AxisSpec {
            max_value,
            scaled_range,
            tick_interval,
            tick_ratio,
        }
    }

    /// Compute one shared scale for two or more axes rendered on the same
    /// chart.
    ///
    /// Each axis's rendered range becomes `global_positive_ratio *
    /// tick_interval_i`, which gives every axis the same gridline count
    /// with zero at the same height. Degenerate axes contribute nothing to
    /// the global ratios and get a zero range.
    pub fn synchronize_axes(&self, axes: &[AxisSpec]) -> SyncedAxes {
        let global_tick_ratio = axes
            .iter()
            .map(|a| a.tick_ratio)
            .fold(0.0, f64::max);

        let global_positive_ratio = axes
            .iter()
            .filter(|a| !a.is_degenerate())
            .map(|a| (a.max_value / a.scaled_range).abs() * global_tick_ratio)
            .fold(0.0, f64::max)
            + RANGE_HEADROOM;

        let range_max = axes
            .iter()
            .map(|a| global_positive_ratio * a.tick_interval)
            .collect();

        SyncedAxes {
            global_tick_ratio,
            global_positive_ratio,
            range_max,
        }
    }

    /// Axis layout for the dashboard's amount and yield axes.
    pub fn build_layout(&self, amounts: &[f64], yields: &[f64], gridlines: u32) -> AxisLayout {
        let amount_axis = self.normalize_axis(amounts, gridlines);
        let yield_axis = self.normalize_axis(yields, gridlines);
        let synced = self.synchronize_axes(&[amount_axis, yield_axis]);

        AxisLayout {
            amount_axis,
            yield_axis,
            amount_range_max: synced.range_max[0],
            yield_range_max: synced.range_max[1],
            gridlines,
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
