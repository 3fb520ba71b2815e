pub const FILLED: char = '█';
pub const SHADOW: char = '░';
pub const EMPTY: char = '-';

/// Fixed-width bar: `1..=current` filled, up to `shadow` shaded, rest empty.
///
/// Both values clamp to `[0, width]`, so the bar is always exactly `width`
/// cells long.
pub fn render_gauge(current: i64, shadow: i64, width: i64) -> String {
    let width = width.max(0);
    (1..=width)
        .map(|i| {
            if i <= current {
                FILLED
            } else if i <= shadow {
                SHADOW
            } else {
                EMPTY
            }
        })
        .collect()
}

/// Map a value on `0..=scale` onto `0..=width` cells, rounding to nearest
pub fn rescale(value: i64, scale: i64, width: i64) -> i64 {
    if scale <= 0 || scale == width {
        return value;
    }
    (value as f64 / scale as f64 * width as f64).round() as i64
}
