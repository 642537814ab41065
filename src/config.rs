//! System configuration parameters
//!
//! All tunable parameters for the tank monitor. The timing constants
//! (long-press, auto-repeat, menu idle, debounce, alarm interval) are
//! load-bearing for the button protocol; tests override them freely.
//!
//! Only [`TankConfig`] is user-editable (through the on-device menu).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::level::units;

/// User-editable tank geometry and display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankConfig {
    /// Sensor-to-surface distance (cm) at which the tank reads full.
    pub min_distance_cm: f32,
    /// Sensor-to-bottom distance, expressed in the active length unit
    /// (cm, or m when `display_meters` is set).
    pub max_distance: f32,
    /// Usable tank volume in liters.
    pub capacity_liters: u32,
    /// Show volumes in US gallons instead of liters.
    pub display_gallons: bool,
    /// Show lengths in meters instead of centimeters.
    pub display_meters: bool,
}

impl TankConfig {
    /// Max distance in centimeters regardless of the active unit.
    pub fn max_distance_cm(&self) -> f32 {
        if self.display_meters {
            units::meters_to_cm(self.max_distance)
        } else {
            self.max_distance
        }
    }

    /// Flip the length unit, rescaling the stored max distance so the
    /// physical value is unchanged.
    pub fn toggle_meters(&mut self) {
        self.max_distance = if self.display_meters {
            units::meters_to_cm(self.max_distance)
        } else {
            units::cm_to_meters(self.max_distance)
        };
        self.display_meters = !self.display_meters;
    }
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            min_distance_cm: 5.0,
            max_distance: 100.0,
            capacity_liters: 100,
            display_gallons: false,
            display_meters: false,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Tank ---
    pub tank: TankConfig,

    // --- Sampling ---
    /// Raw echo pulses averaged into one reading.
    pub samples_per_reading: u8,
    /// Readings above this distance (cm) are discarded as noise.
    pub sample_valid_max_cm: f32,
    /// Echo wait before a pulse counts as "no signal" (microseconds).
    pub echo_timeout_us: u32,
    /// Minimum change (cm) before the filtered distance moves.
    pub noise_threshold_cm: f32,
    /// Distance past `min_distance_cm` that releases the fill lock.
    pub fill_unlock_margin_cm: f32,

    // --- Alarm ---
    /// Temperature (Celsius) at or above which the alarm sounds.
    pub temp_alarm_c: f32,
    /// Fill percent at or below which the alarm sounds.
    pub fill_low_percent: u8,
    /// Fill percent at or above which the alarm sounds.
    pub fill_high_percent: u8,
    /// Minimum spacing between audible alerts (milliseconds).
    pub alarm_interval_ms: u32,

    // --- Buttons / menu ---
    pub long_press_ms: u32,
    pub repeat_ms: u32,
    pub menu_idle_ms: u32,
    pub debounce_ms: u32,

    // --- Indicators ---
    /// LEDs in the bar graph.
    pub led_count: u8,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Serial telemetry interval (milliseconds)
    pub telemetry_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            tank: TankConfig::default(),

            // Sampling
            samples_per_reading: 5,
            sample_valid_max_cm: 200.0,
            echo_timeout_us: 30_000,
            noise_threshold_cm: 1.0,
            fill_unlock_margin_cm: 2.0,

            // Alarm
            temp_alarm_c: 40.0,
            fill_low_percent: 5,
            fill_high_percent: 95,
            alarm_interval_ms: 1000,

            // Buttons / menu
            long_press_ms: 5000,
            repeat_ms: 200,
            menu_idle_ms: 10_000,
            debounce_ms: 300,

            // Indicators
            led_count: 10,

            // Timing
            control_loop_interval_ms: 50, // 20 Hz button polling
            telemetry_interval_ms: 500,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Rejects rather than clamps: a bad
    /// compile-time or injected config must not boot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=16).contains(&self.samples_per_reading) {
            return Err(ConfigError::ValidationFailed(
                "samples_per_reading must be 1–16",
            ));
        }
        if self.sample_valid_max_cm <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "sample_valid_max_cm must be positive",
            ));
        }
        if !(1_000..=100_000).contains(&self.echo_timeout_us) {
            return Err(ConfigError::ValidationFailed(
                "echo_timeout_us must be 1000–100000",
            ));
        }
        if self.noise_threshold_cm < 0.0 || self.fill_unlock_margin_cm < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "noise and unlock margins must be non-negative",
            ));
        }
        if self.tank.min_distance_cm < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "min_distance_cm must be non-negative",
            ));
        }
        if self.tank.max_distance_cm() <= self.tank.min_distance_cm {
            return Err(ConfigError::ValidationFailed(
                "max distance must exceed min_distance_cm",
            ));
        }
        if self.fill_low_percent >= self.fill_high_percent || self.fill_high_percent > 100 {
            return Err(ConfigError::ValidationFailed(
                "fill_low_percent must be < fill_high_percent <= 100",
            ));
        }
        if self.led_count == 0 {
            return Err(ConfigError::ValidationFailed("led_count must be >= 1"));
        }
        if self.repeat_ms == 0 || self.repeat_ms >= self.long_press_ms {
            return Err(ConfigError::ValidationFailed(
                "repeat_ms must be non-zero and shorter than long_press_ms",
            ));
        }
        if self.debounce_ms >= self.long_press_ms {
            return Err(ConfigError::ValidationFailed(
                "debounce_ms must be shorter than long_press_ms",
            ));
        }
        if self.menu_idle_ms == 0 || self.alarm_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "menu_idle_ms and alarm_interval_ms must be non-zero",
            ));
        }
        if !(10..=1000).contains(&self.control_loop_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be 10–1000",
            ));
        }
        Ok(())
    }
}
