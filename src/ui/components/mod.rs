pub mod gauge;
pub mod stats_table;

pub use gauge::render_gauge;
pub use stats_table::{format_count, percentile_label, render_header, render_row, table_width};
