//! LM35 analog temperature sensor (10 mV/°C, 0 V at 0 °C).
//!
//! Read via the ESP32-S3 ADC at 12-bit resolution. A failed ADC read is
//! reported as [`DISCONNECTED_C`], the same sentinel a missing digital
//! probe produces, so downstream logic sees one convention.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU32 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

/// Sentinel for "no probe". Compared like any other temperature.
pub const DISCONNECTED_C: f32 = -127.0;

const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;
const VOLTS_PER_DEGREE: f32 = 0.01;

/// Injected raw ADC value; `u32::MAX` simulates a failed read.
#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_ADC: AtomicU32 = AtomicU32::new(310); // ≈ 25 °C

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: Option<u16>) {
    SIM_TEMP_ADC.store(raw.map_or(u32::MAX, u32::from), Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
pub struct TemperatureReading {
    pub raw: Option<u16>,
    pub celsius: f32,
}

pub struct TemperatureSensor {
    _adc_gpio: i32,
}

impl TemperatureSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self { _adc_gpio: adc_gpio }
    }

    pub fn read(&self) -> TemperatureReading {
        match self.read_adc() {
            Ok(raw) => TemperatureReading {
                raw: Some(raw),
                celsius: adc_to_celsius(raw),
            },
            Err(_) => TemperatureReading {
                raw: None,
                celsius: DISCONNECTED_C,
            },
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(hw_init::ADC1_CH_TEMP)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        u16::try_from(SIM_TEMP_ADC.load(Ordering::Relaxed)).map_err(|_| SensorError::AdcReadFailed)
    }
}

fn adc_to_celsius(raw: u16) -> f32 {
    let voltage = (f32::from(raw) / ADC_MAX) * V_REF;
    voltage / VOLTS_PER_DEGREE
}
