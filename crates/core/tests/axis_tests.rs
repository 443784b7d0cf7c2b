// ═══════════════════════════════════════════════════════════════════
// Axis Normalizer & Cross-Axis Synchronizer — gridline spacing,
// fallbacks, degenerate axes, shared-scale alignment
// ═══════════════════════════════════════════════════════════════════

use dgi_tracker_core::models::dashboard::AxisSpec;
use dgi_tracker_core::services::chart_service::ChartService;

const GRIDLINES: u32 = 4;

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-6, "expected {b}, got {a}");
}

// ═══════════════════════════════════════════════════════════════════
//  normalize_axis
// ═══════════════════════════════════════════════════════════════════

#[test]
fn hand_computed_spacing() {
    let service = ChartService::new();

    // max 0.46 → scaled 460 → leading digit 4 → rounded max 0.4
    let spec = service.normalize_axis(&[0.42, 0.42, 0.46], GRIDLINES);
    approx(spec.max_value, 0.46);
    approx(spec.scaled_range, 460.0);
    approx(spec.tick_interval, 0.1);
    approx(spec.tick_ratio, 4600.0);

    // max 7.3 → scaled 7300 → leading digit 7 → rounded max 7.0
    let spec = service.normalize_axis(&[7.3], 5);
    approx(spec.tick_interval, 1.4);
    approx(spec.tick_ratio, 7300.0 / 1.4);

    // max 123 → scaled 123000 → leading digit 1 → rounded max 100
    let spec = service.normalize_axis(&[123.0], GRIDLINES);
    approx(spec.tick_interval, 25.0);
    approx(spec.tick_ratio, 4920.0);
}

#[test]
fn gridline_count_honored() {
    let service = ChartService::new();
    for gridlines in 1..=8u32 {
        for max in [0.07, 0.46, 1.9, 7.3, 55.0, 123.0, 9999.0] {
            let spec = service.normalize_axis(&[max], gridlines);
            let rounded_max = spec.tick_interval * f64::from(gridlines);
            approx(rounded_max / spec.tick_interval, f64::from(gridlines));
            assert!(rounded_max <= spec.max_value + 1e-9);
        }
    }
}

#[test]
fn leading_digit_is_scale_invariant() {
    let service = ChartService::new();
    let base = service.normalize_axis(&[0.42, 0.46], GRIDLINES);

    for power in 1..=4i32 {
        let factor = 10f64.powi(power);
        let scaled: Vec<f64> = [0.42, 0.46].iter().map(|v| v * factor).collect();
        let spec = service.normalize_axis(&scaled, GRIDLINES);

        // Same leading digit means the same tick ratio; the interval
        // scales by the same power of ten as the input.
        approx(spec.tick_ratio, base.tick_ratio);
        approx(spec.tick_interval, base.tick_interval * factor);
    }
}

#[test]
fn empty_series_falls_back_to_five() {
    let service = ChartService::new();
    let empty = service.normalize_axis(&[], GRIDLINES);
    let five = service.normalize_axis(&[5.0], GRIDLINES);

    assert_eq!(empty, five);
    approx(empty.max_value, 5.0);
    approx(empty.tick_interval, 1.25);
    approx(empty.tick_ratio, 4000.0);
}

#[test]
fn zero_maximum_is_degenerate() {
    let service = ChartService::new();
    let spec = service.normalize_axis(&[0.0, 0.0], GRIDLINES);

    assert!(spec.is_degenerate());
    approx(spec.max_value, 0.0);
    approx(spec.tick_interval, 0.0);
    approx(spec.tick_ratio, 0.0);
}

#[test]
fn sub_millesimal_maximum_is_degenerate() {
    // scaled range floors to zero, so the digit count is undefined there too
    let service = ChartService::new();
    let spec = service.normalize_axis(&[0.0009], GRIDLINES);
    assert!(spec.is_degenerate());
}

#[test]
fn single_gridline() {
    let service = ChartService::new();
    let spec = service.normalize_axis(&[0.46], 1);
    approx(spec.tick_interval, 0.4);
}

// ═══════════════════════════════════════════════════════════════════
//  synchronize_axes
// ═══════════════════════════════════════════════════════════════════

#[test]
fn shared_scale_aligns_gridlines() {
    let service = ChartService::new();
    let amount_axis = service.normalize_axis(&[0.46], GRIDLINES);
    let yield_axis = service.normalize_axis(&[0.03], GRIDLINES);

    let synced = service.synchronize_axes(&[amount_axis, yield_axis]);

    // yield axis has the larger tick ratio (~6000)
    approx(synced.global_tick_ratio, yield_axis.tick_ratio);
    approx(synced.global_positive_ratio, 6.1);
    approx(synced.range_max[0], 6.1 * 0.1);
    approx(synced.range_max[1], 6.1 * 0.005);

    // Both axes render the same number of gridlines
    approx(
        synced.range_max[0] / amount_axis.tick_interval,
        synced.range_max[1] / yield_axis.tick_interval,
    );
}

#[test]
fn global_ratio_never_drops_as_one_series_grows() {
    let service = ChartService::new();
    let fixed = service.normalize_axis(&[1.9], GRIDLINES);

    let mut last_global = 0.0;
    for max in [0.5, 1.1, 1.5, 1.85, 1.95, 1.99] {
        let growing = service.normalize_axis(&[max], GRIDLINES);
        let synced = service.synchronize_axes(&[fixed, growing]);
        assert!(
            synced.global_tick_ratio >= last_global - 1e-9,
            "global ratio dropped at max={max}"
        );
        last_global = synced.global_tick_ratio;
    }
}

#[test]
fn all_empty_series_still_produce_a_valid_scale() {
    let service = ChartService::new();
    let a = service.normalize_axis(&[], GRIDLINES);
    let b = service.normalize_axis(&[], GRIDLINES);

    let synced = service.synchronize_axes(&[a, b]);
    approx(synced.global_tick_ratio, 4000.0);
    approx(synced.global_positive_ratio, 4.1);
    approx(synced.range_max[0], 4.1 * 1.25);
    assert!(synced.range_max.iter().all(|r| *r > 0.0));
}

#[test]
fn degenerate_axis_contributes_nothing() {
    let service = ChartService::new();
    let live = service.normalize_axis(&[0.46], GRIDLINES);
    let flat = service.normalize_axis(&[0.0], GRIDLINES);

    let synced = service.synchronize_axes(&[live, flat]);
    approx(synced.global_tick_ratio, live.tick_ratio);
    // a flat axis renders as a zero line: zero range
    approx(synced.range_max[1], 0.0);
    assert!(synced.range_max[0] > 0.0);
}

#[test]
fn build_layout_wires_both_axes() {
    let service = ChartService::new();
    let layout = service.build_layout(&[0.42, 0.46], &[0.029, 0.031], GRIDLINES);

    assert_eq!(layout.gridlines, GRIDLINES);
    assert!(!layout.amount_axis.is_degenerate());
    assert!(!layout.yield_axis.is_degenerate());
    approx(
        layout.amount_range_max / layout.amount_axis.tick_interval,
        layout.yield_range_max / layout.yield_axis.tick_interval,
    );
}

#[test]
fn axis_spec_is_plain_data() {
    let spec = AxisSpec {
        max_value: 1.0,
        scaled_range: 1000.0,
        tick_interval: 0.25,
        tick_ratio: 4000.0,
    };
    let copy = spec;
    assert_eq!(spec, copy);
    assert!(!spec.is_degenerate());
}
