use std::path::Path;

use log::debug;

use crate::errors::CoreError;
use crate::models::dashboard::Dashboard;

// Canvas geometry. The dividend panel carries the synchronized axes; the
// price panel sits above it with its own independent scale.
const WIDTH: f64 = 960.0;
const PRICE_HEIGHT: f64 = 220.0;
const DIVIDEND_HEIGHT: f64 = 360.0;
const PADDING: f64 = 48.0;

// Palette carried over from the original dashboard.
const COLOR_DIVIDENDS: &str = "#3d85c6";
const COLOR_YIELDS: &str = "#f4b400";
const COLOR_WHITE: &str = "#FFFFFF";
const COLOR_GRID: &str = "#a8a8a8";
const COLOR_BACKGROUND: &str = "#434343";
const COLOR_LINE_AREA: &str = "#42576b";

/// Placeholder for summary fields the market-data source omitted.
const MISSING_LABEL: &str = "n/a";

/// Render the dashboard to a standalone HTML artifact: summary table plus
/// the four chart traces. All numbers, ranges and gridline spacings come
/// from the `Dashboard` value; nothing is computed here beyond pixel
/// placement.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str(&format!(
        "<title>{}-Year Dividend Summary for {}</title>",
        dashboard.summary.years, dashboard.summary.ticker
    ));
    html.push_str(&format!(
        "<style>body{{background:{bg};color:{fg};font-family:Arial,sans-serif;margin:24px}}\
         table{{border-collapse:collapse;margin-bottom:18px}}\
         th,td{{border:1px solid {grid};padding:6px 10px;text-align:center;font-size:13px}}\
         th{{background:#b7b7b7;color:black}}td{{background:#6ea8dc;color:black;font-weight:bold}}\
         h1{{font-size:20px}}p.sub{{font-size:12px;color:{grid}}}</style></head><body>",
        bg = COLOR_BACKGROUND,
        fg = COLOR_WHITE,
        grid = COLOR_GRID,
    ));

    let title = match &dashboard.summary.long_name {
        Some(name) => format!("{}: {}", dashboard.summary.ticker, name),
        None => dashboard.summary.ticker.clone(),
    };
    html.push_str(&format!(
        "<h1>{}-Year Dividend Summary for {title}</h1>",
        dashboard.summary.years
    ));
    html.push_str(
        "<p class=\"sub\">Information accuracy and completeness not guaranteed. \
         Not all source dividends are adjusted for splits.</p>",
    );

    html.push_str(&summary_table(dashboard));
    html.push_str(&price_chart(dashboard));
    html.push_str(&dividend_chart(dashboard));
    html.push_str("</body></html>");
    html
}

/// Render and write the artifact to disk.
pub fn write_dashboard(dashboard: &Dashboard, path: &Path) -> Result<(), CoreError> {
    std::fs::write(path, render_dashboard(dashboard))?;
    debug!("wrote dashboard to {}", path.display());
    Ok(())
}

fn summary_table(dashboard: &Dashboard) -> String {
    let s = &dashboard.summary;
    let headers = [
        "Ticker".to_string(),
        "Time Range (years)".to_string(),
        "Current Share Price".to_string(),
        format!("{}-Year Dividend CAGR", s.years),
        "Current Yield".to_string(),
        "Payout Ratio (Forward)".to_string(),
        "PE Ratio".to_string(),
        format!("{}-Year Stock CAGR", s.years),
        "Consecutive Dividend Increases (years)".to_string(),
        "Dividends/Year (frequency)".to_string(),
    ];
    let cells = [
        s.ticker.clone(),
        s.years.to_string(),
        format!("${:.2}", s.current_price),
        fmt_pct(s.dividend_cagr),
        s.current_yield.map_or(MISSING_LABEL.into(), fmt_pct),
        s.payout_ratio.map_or(MISSING_LABEL.into(), fmt_pct),
        s.forward_pe.map_or(MISSING_LABEL.into(), |v| format!("{v:.2}")),
        fmt_pct(s.stock_cagr),
        // Not computed — intentionally left as a placeholder
        "TBD".to_string(),
        s.dividend_frequency.to_string(),
    ];

    let mut table = String::from("<table><tr>");
    for h in &headers {
        table.push_str(&format!("<th>{h}</th>"));
    }
    table.push_str("</tr><tr>");
    for c in &cells {
        table.push_str(&format!("<td>{c}</td>"));
    }
    table.push_str("</tr></table>");
    table
}

/// Share-price filled area on its own axis, range `[0, max_price]`.
fn price_chart(dashboard: &Dashboard) -> String {
    let mut svg = svg_header(WIDTH, PRICE_HEIGHT, "Share Price ($)");
    let range_max = dashboard.max_price;

    if range_max > 0.0 && dashboard.prices.len() > 1 {
        let xs = x_positions(dashboard.prices.len());
        let points: Vec<(f64, f64)> = dashboard
            .prices
            .iter()
            .zip(&xs)
            .map(|(bar, &x)| (x, scale_y(bar.high, range_max, PRICE_HEIGHT)))
            .collect();

        // Filled area down to the zero baseline
        let baseline = scale_y(0.0, range_max, PRICE_HEIGHT);
        let mut path: Vec<String> = points
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect();
        path.push(format!("{:.2},{baseline:.2}", points[points.len() - 1].0));
        path.insert(0, format!("{:.2},{baseline:.2}", points[0].0));
        svg.push_str(&format!(
            r#"<polygon points="{}" fill="{COLOR_LINE_AREA}" stroke="none" />"#,
            path.join(" ")
        ));
        svg.push_str(&polyline(&points, COLOR_DIVIDENDS, 3.0));

        svg.push_str(&axis_label(range_max, range_max, &format!("${range_max:.0}")));
        svg.push_str(&zero_line(PRICE_HEIGHT));
    }

    svg.push_str("</svg>");
    svg
}

/// The synchronized dual-axis panel: dividend-amount bars on the left
/// axis, historic-yield line and percent-increase markers on the right.
/// Gridlines are drawn at multiples of the amount axis's tick interval;
/// by construction the yield axis lands on the same pixels.
fn dividend_chart(dashboard: &Dashboard) -> String {
    let axes = &dashboard.axes;
    let mut svg = svg_header(
        WIDTH,
        DIVIDEND_HEIGHT,
        "Dividend Amount ($), Historic Yield and Dividend Increase (%)",
    );

    let amount_range = axes.amount_range_max;
    // The yield trace renders at double range/spacing, keeping it in the
    // lower half of the panel under the amount bars.
    let yield_range = axes.yield_range_max * 2.0;

    // Gridlines with left ($ amount) and right (% yield) labels
    if !axes.amount_axis.is_degenerate() {
        let mut tick = 0.0;
        let mut level = 0u32;
        while tick <= amount_range {
            let y = scale_y(tick, amount_range, DIVIDEND_HEIGHT);
            svg.push_str(&format!(
                r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{COLOR_GRID}" stroke-width="0.5" />"#,
                x1 = PADDING,
                x2 = WIDTH - PADDING,
            ));
            svg.push_str(&format!(
                r##"<text x="{x:.2}" y="{y:.2}" text-anchor="end" fill="{COLOR_GRID}">${tick:.2}</text>"##,
                x = PADDING - 6.0,
                y = y + 3.0,
            ));
            if !axes.yield_axis.is_degenerate() {
                let yield_tick = f64::from(level) * axes.yield_axis.tick_interval * 2.0;
                svg.push_str(&format!(
                    r##"<text x="{x:.2}" y="{y:.2}" text-anchor="start" fill="{COLOR_GRID}">{label}</text>"##,
                    x = WIDTH - PADDING + 6.0,
                    y = y + 3.0,
                    label = fmt_pct(yield_tick),
                ));
            }
            tick += axes.amount_axis.tick_interval;
            level += 1;
        }
    } else {
        svg.push_str(&zero_line(DIVIDEND_HEIGHT));
    }

    if !dashboard.payments.is_empty() {
        let xs = x_positions(dashboard.payments.len());
        let bar_width = ((WIDTH - 2.0 * PADDING) / dashboard.payments.len() as f64 * 0.6).min(40.0);
        let baseline = scale_y(0.0, amount_range, DIVIDEND_HEIGHT);

        // Dividend amount bars
        if amount_range > 0.0 {
            for (point, &x) in dashboard.payments.iter().zip(&xs) {
                let top = scale_y(point.amount, amount_range, DIVIDEND_HEIGHT);
                svg.push_str(&format!(
                    r#"<rect x="{rx:.2}" y="{top:.2}" width="{bar_width:.2}" height="{h:.2}" fill="{COLOR_DIVIDENDS}" />"#,
                    rx = x - bar_width / 2.0,
                    h = baseline - top,
                ));
                svg.push_str(&format!(
                    r##"<text x="{x:.2}" y="{ty:.2}" text-anchor="middle" fill="{COLOR_WHITE}">${amount:.2}</text>"##,
                    ty = top + 12.0,
                    amount = point.amount,
                ));
            }
        }

        // Historic yield line
        if yield_range > 0.0 {
            let points: Vec<(f64, f64)> = dashboard
                .payments
                .iter()
                .zip(&xs)
                .map(|(p, &x)| (x, scale_y(p.historic_yield, yield_range, DIVIDEND_HEIGHT)))
                .collect();
            svg.push_str(&polyline(&points, COLOR_YIELDS, 3.0));
        }

        // Percent-increase markers, own zero-anchored scale, no gridlines
        let max_increase = dashboard
            .payments
            .iter()
            .filter_map(|p| p.percent_increase)
            .fold(0.0, f64::max);
        if max_increase > 0.0 {
            let increase_range = max_increase * 1.25;
            for (point, &x) in dashboard.payments.iter().zip(&xs) {
                let Some(increase) = point.percent_increase else {
                    continue;
                };
                let y = scale_y(increase.max(0.0), increase_range, DIVIDEND_HEIGHT);
                svg.push_str(&format!(
                    r#"<circle cx="{x:.2}" cy="{y:.2}" r="3.5" fill="{COLOR_WHITE}" />"#
                ));
                svg.push_str(&format!(
                    r##"<text x="{x:.2}" y="{ty:.2}" text-anchor="middle" fill="{COLOR_WHITE}">{label}</text>"##,
                    ty = y - 8.0,
                    label = fmt_pct(increase),
                ));
            }
        }

        // Payment date labels along the x axis
        for (point, &x) in dashboard.payments.iter().zip(&xs) {
            svg.push_str(&format!(
                r##"<text x="{x:.2}" y="{ty:.2}" text-anchor="middle" fill="{COLOR_GRID}">{date}</text>"##,
                ty = DIVIDEND_HEIGHT - PADDING + 16.0,
                date = point.date,
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

// ── SVG helpers ─────────────────────────────────────────────────────

fn svg_header(width: f64, height: f64, title: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width:.0} {height:.0}" style="background:{COLOR_BACKGROUND};display:block;margin-bottom:12px"><style>text{{font-family:Arial,sans-serif;font-size:10px}}</style><text x="{tx:.2}" y="16" fill="{COLOR_WHITE}" font-size="12">{title}</text>"##,
        tx = PADDING,
    )
}

/// Evenly spaced x pixel positions across the drawable width.
fn x_positions(len: usize) -> Vec<f64> {
    let inner = WIDTH - 2.0 * PADDING;
    if len <= 1 {
        return vec![PADDING + inner / 2.0];
    }
    (0..len)
        .map(|i| PADDING + inner * i as f64 / (len - 1) as f64)
        .collect()
}

/// Map a data value on `[0, range_max]` to a y pixel (zero at the bottom).
fn scale_y(value: f64, range_max: f64, height: f64) -> f64 {
    let inner = height - 2.0 * PADDING;
    let norm = if range_max > 0.0 { value / range_max } else { 0.0 };
    PADDING + (1.0 - norm) * inner
}

fn polyline(points: &[(f64, f64)], stroke: &str, width: f64) -> String {
    let joined: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect();
    format!(
        r#"<polyline points="{}" fill="none" stroke="{stroke}" stroke-width="{width}" />"#,
        joined.join(" ")
    )
}

fn zero_line(height: f64) -> String {
    let y = height - PADDING;
    format!(
        r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{COLOR_GRID}" stroke-width="2" />"#,
        x1 = PADDING,
        x2 = WIDTH - PADDING,
    )
}

fn axis_label(value: f64, range_max: f64, label: &str) -> String {
    let y = scale_y(value, range_max, PRICE_HEIGHT);
    format!(
        r##"<text x="{x:.2}" y="{ty:.2}" text-anchor="end" fill="{COLOR_GRID}">{label}</text>"##,
        x = PADDING - 6.0,
        ty = y + 3.0,
    )
}

fn fmt_pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
