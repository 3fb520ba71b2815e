use crate::domain::DeviceReport;
use crate::ui::components::gauge::{render_gauge, rescale};

const LABEL_WIDTH: usize = 14;
const COLUMN_WIDTH: usize = 8;

/// "P90", "P99.9"
pub fn percentile_label(pct: f64) -> String {
    if pct.fract() == 0.0 {
        format!("P{}", pct as i64)
    } else {
        format!("P{}", pct)
    }
}

/// 950 -> "950", 12_300 -> "12.3K", 4_500_000 -> "4.5M"
pub fn format_count(count: u64) -> String {
    if count >= 1_000_000_000 {
        format!("{:.1}B", count as f64 / 1_000_000_000.0)
    } else if count >= 1_000_000 {
        format!("{:.1}M", count as f64 / 1_000_000.0)
    } else if count >= 1_000 {
        format!("{:.1}K", count as f64 / 1_000.0)
    } else {
        count.to_string()
    }
}

pub fn table_width(columns: &[f64], bar_width: i64) -> usize {
    LABEL_WIDTH + 10 + 10 + 9 + 9 + columns.len() * (COLUMN_WIDTH + 1) + bar_width.max(0) as usize + 4
}

pub fn render_header(percentile: f64, columns: &[f64], bar_width: i64) -> String {
    let mut line = format!(
        "{:<label$} {:>9} {:>9} {:>8} {:>8}",
        "Device",
        "Current",
        percentile_label(percentile),
        "Avg",
        "Util",
        label = LABEL_WIDTH
    );
    for &pct in columns {
        line.push_str(&format!(" {:>width$}", percentile_label(pct), width = COLUMN_WIDTH));
    }
    line.push_str(&format!("  {:<width$}", "Utilization", width = bar_width.max(0) as usize + 2));
    line.trim_end().to_string()
}

pub fn render_row(device: &DeviceReport, bar_width: i64) -> String {
    let label = match &device.size {
        Some(size) => format!("{}({})", device.label, size),
        None => device.label.clone(),
    };

    let bar = render_gauge(
        rescale(device.current, device.scale, bar_width),
        rescale(device.percentile, device.scale, bar_width),
        bar_width,
    );

    let mut line = format!(
        "{:<label_w$} {:>4}/{:<4} {:>4}/{:<4} {:>8.2} {:>7.1}%",
        label,
        device.current,
        device.scale,
        device.percentile,
        device.scale,
        device.average,
        device.utilization,
        label_w = LABEL_WIDTH
    );
    for value in &device.columns {
        line.push_str(&format!(" {:>width$.2}", value, width = COLUMN_WIDTH));
    }
    line.push_str(&format!("  [{}]", bar));
    line
}
