//! Fill-level estimation — pure logic, zero I/O.
//!
//! ```text
//!  echo pulses ──▶ DistanceSampler ──▶ DistanceFilter ──▶ fill::percent
//!   (5 × raw)       (reject, average)   (noise gate, lock)   (0–100 %)
//! ```
//!
//! The sampler and filter never see hardware; raw pulses are pulled
//! through a closure so the same code runs against the HC-SR04 driver
//! and against scripted test input.

pub mod fill;
pub mod sampler;
pub mod units;

/// One loop's worth of derived level data, in canonical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelReading {
    /// Filtered sensor-to-surface distance (cm).
    pub distance_cm: f32,
    /// Fill estimate (0–100).
    pub percent: u8,
    /// Liquid volume (liters) derived from percent and tank capacity.
    pub volume_liters: f32,
    /// Fill lock engaged this cycle.
    pub locked: bool,
}
