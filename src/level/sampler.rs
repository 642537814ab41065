//! Noise-rejecting distance sampler and the lock-aware distance filter.
//!
//! ## Sampling
//!
//! One reading is a batch of raw HC-SR04 pulses. Pulses that time out
//! or convert to a distance outside `(0, valid_max]` are discarded; the
//! rest are averaged. A batch with no survivors is
//! [`SensorError::NoValidSamples`].
//!
//! ## Filtering
//!
//! The filtered distance only moves when a new reading differs from it
//! by more than the noise threshold. Once it reaches the "full" bound
//! the fill lock latches and the value stays pinned until a reading
//! exceeds `min_bound + unlock_margin`, so the display does not flicker
//! at the tank-full edge. Invalid readings leave the value untouched.

use log::{debug, trace};

use crate::config::SystemConfig;
use crate::error::SensorError;

/// Round-trip speed of sound (cm per microsecond) used by the device.
const SOUND_CM_PER_US: f32 = 0.034;

/// Convert an echo HIGH duration into a one-way distance.
pub fn echo_to_cm(duration_us: u32) -> f32 {
    duration_us as f32 * SOUND_CM_PER_US / 2.0
}

/// Batch sampler: N pulses in, one averaged distance out.
#[derive(Debug, Clone, Copy)]
pub struct DistanceSampler {
    samples: u8,
    valid_max_cm: f32,
}

impl DistanceSampler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            samples: config.samples_per_reading,
            valid_max_cm: config.sample_valid_max_cm,
        }
    }

    /// Pull `samples` raw echo durations from `pulse` and average the
    /// plausible ones.
    pub fn measure(
        &self,
        mut pulse: impl FnMut() -> Result<u32, SensorError>,
    ) -> Result<f32, SensorError> {
        let mut sum = 0.0_f32;
        let mut accepted = 0u8;

        for _ in 0..self.samples {
            match pulse() {
                Ok(us) => {
                    let cm = echo_to_cm(us);
                    if cm > 0.0 && cm <= self.valid_max_cm {
                        sum += cm;
                        accepted += 1;
                    } else {
                        trace!("sampler: discarded {:.1}cm", cm);
                    }
                }
                Err(e) => trace!("sampler: pulse failed ({e})"),
            }
        }

        if accepted == 0 {
            return Err(SensorError::NoValidSamples);
        }
        Ok(sum / f32::from(accepted))
    }
}

/// Last accepted distance plus the fill-lock latch.
#[derive(Debug, Clone)]
pub struct DistanceFilter {
    filtered_cm: f32,
    locked: bool,
    noise_threshold_cm: f32,
    unlock_margin_cm: f32,
}

impl DistanceFilter {
    /// Start at `initial_cm` (the empty-tank distance), unlocked.
    pub fn new(config: &SystemConfig, initial_cm: f32) -> Self {
        Self {
            filtered_cm: initial_cm,
            locked: false,
            noise_threshold_cm: config.noise_threshold_cm,
            unlock_margin_cm: config.fill_unlock_margin_cm,
        }
    }

    /// Fold one sampler result into the filter and return the filtered
    /// distance. Never fails: an invalid reading yields the previous value.
    pub fn update(&mut self, reading: Result<f32, SensorError>, min_bound_cm: f32) -> f32 {
        let Ok(sample) = reading else {
            return self.filtered_cm;
        };

        if self.locked {
            if sample <= min_bound_cm + self.unlock_margin_cm {
                return self.filtered_cm;
            }
            debug!("filter: fill lock released at {:.1}cm", sample);
            self.locked = false;
        }

        if (sample - self.filtered_cm).abs() > self.noise_threshold_cm {
            self.filtered_cm = sample;
        }

        if self.filtered_cm <= min_bound_cm {
            debug!("filter: fill lock engaged at {:.1}cm", self.filtered_cm);
            self.locked = true;
        }

        self.filtered_cm
    }

    pub fn filtered_cm(&self) -> f32 {
        self.filtered_cm
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}
