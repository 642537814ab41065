//! GPIO / peripheral pin assignments for the tank monitor board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic sensor
// ---------------------------------------------------------------------------

/// Digital output: 10 us HIGH pulse starts a measurement.
pub const ULTRASONIC_TRIG_GPIO: i32 = 7;
/// Digital input: HIGH for the round-trip time of the ping.
/// 5 V echo goes through a resistive divider to 3.3 V.
pub const ULTRASONIC_ECHO_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Temperature (LM35, 10 mV/°C)
// ---------------------------------------------------------------------------

/// ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Buttons (active-high with external pull-down)
// ---------------------------------------------------------------------------

/// Button A: power-on hold, menu entry, field advance, value up.
pub const BUTTON_A_GPIO: i32 = 15;
/// Button B: power-off hold, edit toggle, value down, mute.
pub const BUTTON_B_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Buzzer (passive piezo on an LEDC channel)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// LED bar graph, bottom LED first
// ---------------------------------------------------------------------------

pub const LED_BAR_GPIOS: [i32; 10] = [8, 9, 10, 11, 12, 13, 14, 17, 18, 21];

// ---------------------------------------------------------------------------
// I²C bus (LCD1602 with PCF8574 backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 1;
pub const I2C_SCL_GPIO: i32 = 2;
pub const I2C_FREQ_HZ: u32 = 100_000;
pub const LCD_I2C_ADDR: u8 = 0x27;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// Initial buzzer frequency; retuned per note.
pub const BUZZER_BASE_FREQ_HZ: u32 = 1_000;
