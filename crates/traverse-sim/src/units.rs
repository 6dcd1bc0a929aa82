//! Unit conversions shared by the models

/// 0 °C in kelvin
pub const ZERO_CELSIUS_K: f64 = 273.15;

/// Seconds per Earth day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn kelvin_to_celsius(k: f64) -> f64 {
    k - ZERO_CELSIUS_K
}

pub fn celsius_to_kelvin(c: f64) -> f64 {
    c + ZERO_CELSIUS_K
}

/// Speed in m/s to km travelled over `dt_s` seconds
pub fn km_travelled(speed_mps: f64, dt_s: f64) -> f64 {
    speed_mps * 1e-3 * dt_s
}

pub fn days_to_seconds(days: f64) -> f64 {
    days * SECONDS_PER_DAY
}

pub fn seconds_to_days(seconds: f64) -> f64 {
    seconds / SECONDS_PER_DAY
}
