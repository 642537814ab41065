//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every input the control loop polls: the ultrasonic
//! ranger, the temperature probe, and the two button lines.

pub mod temperature;
pub mod ultrasonic;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use crate::app::ports::ButtonLevels;
use crate::error::SensorError;
use temperature::TemperatureSensor;
use ultrasonic::UltrasonicSensor;

#[cfg(not(target_os = "espidf"))]
static SIM_BUTTON_A: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_BUTTON_B: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_buttons(a: bool, b: bool) {
    SIM_BUTTON_A.store(a, Ordering::Relaxed);
    SIM_BUTTON_B.store(b, Ordering::Relaxed);
}

/// Aggregates all input drivers.
pub struct SensorHub<D: DelayNs> {
    pub ultrasonic: UltrasonicSensor<D>,
    pub temperature: TemperatureSensor,
    button_a_gpio: i32,
    button_b_gpio: i32,
}

impl<D: DelayNs> SensorHub<D> {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(
        ultrasonic: UltrasonicSensor<D>,
        temperature: TemperatureSensor,
        button_a_gpio: i32,
        button_b_gpio: i32,
    ) -> Self {
        Self {
            ultrasonic,
            temperature,
            button_a_gpio,
            button_b_gpio,
        }
    }

    pub fn echo_duration_us(&mut self) -> Result<u32, SensorError> {
        self.ultrasonic.echo_duration_us()
    }

    pub fn temperature_c(&self) -> f32 {
        self.temperature.read().celsius
    }

    /// Raw (undebounced) button levels; `true` = pressed.
    #[cfg(target_os = "espidf")]
    pub fn buttons(&self) -> ButtonLevels {
        use crate::drivers::hw_init::gpio_read;
        ButtonLevels {
            a: gpio_read(self.button_a_gpio),
            b: gpio_read(self.button_b_gpio),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn buttons(&self) -> ButtonLevels {
        let _ = (self.button_a_gpio, self.button_b_gpio);
        ButtonLevels {
            a: SIM_BUTTON_A.load(Ordering::Relaxed),
            b: SIM_BUTTON_B.load(Ordering::Relaxed),
        }
    }
}
