//! Distance → fill percent, LED count, and volume.

/// Interpolated readings never drop below this. The inclusive empty
/// bound still reads 0.
pub const FILL_FLOOR_PERCENT: u8 = 5;

/// Map a sensor-to-surface distance into a 0–100 fill percentage.
///
/// - `distance <= min_bound` → 100
/// - `distance >= max_bound` → 0
/// - otherwise linear, rounded, floored at [`FILL_FLOOR_PERCENT`]
pub fn compute_fill_percent(distance_cm: f32, min_bound_cm: f32, max_bound_cm: f32) -> u8 {
    if distance_cm <= min_bound_cm {
        return 100;
    }
    if distance_cm >= max_bound_cm {
        return 0;
    }
    let span = max_bound_cm - min_bound_cm;
    let pct = 100.0 * (1.0 - (distance_cm - min_bound_cm) / span);
    (pct.round() as u8).clamp(FILL_FLOOR_PERCENT, 100)
}

/// LEDs to light for `percent`: proportional, at least one while on.
pub fn lit_leds(percent: u8, led_count: u8) -> u8 {
    // Integer round-half-up keeps 45 % of 10 LEDs at exactly 5.
    let n = (u16::from(percent.min(100)) * u16::from(led_count) + 50) / 100;
    (n as u8).clamp(1, led_count.max(1))
}

/// Liquid volume in liters for a fill percent of `capacity_liters`.
pub fn volume_liters(percent: u8, capacity_liters: u32) -> f32 {
    capacity_liters as f32 * f32::from(percent.min(100)) / 100.0
}
