//! HC-SR04 ultrasonic distance sensor.
//!
//! A 10 us HIGH on TRIG starts a ping; ECHO then goes HIGH for the
//! round-trip time. The driver measures one pulse per call and reports
//! the raw duration; conversion and averaging live in
//! [`crate::level::sampler`].
//!
//! The measurement is a synchronous busy-poll bounded by the echo
//! timeout (30 ms default). A short settle delay after each ping keeps
//! consecutive pulses from hearing each other's echo.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives TRIG/ECHO via hw_init GPIO helpers and times the
//! pulse with `esp_timer_get_time()`.
//! On host/test: returns the duration injected with [`sim_set_echo_us`].

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

const TRIGGER_PULSE_US: u32 = 10;
const SETTLE_US: u32 = 2_000;

/// Injected echo duration; `0` simulates a timeout.
#[cfg(not(target_os = "espidf"))]
static SIM_ECHO_US: AtomicU32 = AtomicU32::new(2_941); // ≈ 50 cm

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(duration_us: Option<u32>) {
    SIM_ECHO_US.store(duration_us.unwrap_or(0), Ordering::Relaxed);
}

pub struct UltrasonicSensor<D: DelayNs> {
    trig_gpio: i32,
    echo_gpio: i32,
    timeout_us: u32,
    delay: D,
}

impl<D: DelayNs> UltrasonicSensor<D> {
    pub fn new(trig_gpio: i32, echo_gpio: i32, timeout_us: u32, delay: D) -> Self {
        Self {
            trig_gpio,
            echo_gpio,
            timeout_us,
            delay,
        }
    }

    /// Fire one ping and return the echo HIGH time in microseconds.
    pub fn echo_duration_us(&mut self) -> Result<u32, SensorError> {
        self.trigger();
        let result = self.time_echo();
        self.delay.delay_us(SETTLE_US);
        result
    }

    fn trigger(&mut self) {
        self.write_trig(false);
        self.delay.delay_us(2);
        self.write_trig(true);
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.write_trig(false);
    }

    #[cfg(target_os = "espidf")]
    fn write_trig(&self, high: bool) {
        hw_init::gpio_write(self.trig_gpio, high);
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_trig(&self, _high: bool) {
        let _ = self.trig_gpio;
    }

    /// Wait for the rising edge, then time the HIGH phase. Both waits
    /// share one timeout budget.
    #[cfg(target_os = "espidf")]
    fn time_echo(&self) -> Result<u32, SensorError> {
        let start = hw_init::uptime_us();
        let budget = u64::from(self.timeout_us);

        while !hw_init::gpio_read(self.echo_gpio) {
            if hw_init::uptime_us().wrapping_sub(start) > budget {
                return Err(SensorError::EchoTimeout);
            }
        }
        let rise = hw_init::uptime_us();
        while hw_init::gpio_read(self.echo_gpio) {
            if hw_init::uptime_us().wrapping_sub(start) > budget {
                return Err(SensorError::EchoTimeout);
            }
        }
        Ok(hw_init::uptime_us().wrapping_sub(rise) as u32)
    }

    #[cfg(not(target_os = "espidf"))]
    fn time_echo(&self) -> Result<u32, SensorError> {
        let _ = self.echo_gpio;
        match SIM_ECHO_US.load(Ordering::Relaxed) {
            0 => Err(SensorError::EchoTimeout),
            us if us > self.timeout_us => Err(SensorError::EchoTimeout),
            us => Ok(us),
        }
    }
}
