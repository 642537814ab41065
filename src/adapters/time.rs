//! Loop clock.
//!
//! Millisecond timestamps for the control loop, derived from the
//! microsecond uptime counter in [`hw_init`] (`esp_timer_get_time()` on
//! the device, `std::time::Instant` on the host). Counts from
//! construction, so the first loop pass sees a time near zero.

use crate::drivers::hw_init;

pub struct LoopClock {
    epoch_us: u64,
}

impl Default for LoopClock {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopClock {
    pub fn new() -> Self {
        Self {
            epoch_us: hw_init::uptime_us(),
        }
    }

    /// Microseconds since construction.
    pub fn elapsed_us(&self) -> u64 {
        hw_init::uptime_us().saturating_sub(self.epoch_us)
    }

    /// Loop clock in milliseconds. Wraps after ~49.7 days; every
    /// consumer compares with `wrapping_sub`.
    pub fn now_ms(&self) -> u32 {
        (self.elapsed_us() / 1_000) as u32
    }
}
