//! Integration test: AppService → HardwareAdapter → simulated drivers.
//!
//! Runs the real adapter stack (sensor hub, LCD, LED bar, buzzer) on the
//! host simulation layer. The simulation inputs are process-wide
//! statics, so the whole scenario lives in one test.

#![cfg(not(target_os = "espidf"))]

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

use tankmon::adapters::hardware::HardwareAdapter;
use tankmon::adapters::log_sink::LogEventSink;
use tankmon::app::service::AppService;
use tankmon::config::SystemConfig;
use tankmon::drivers::buzzer::BuzzerDriver;
use tankmon::drivers::lcd::Lcd1602;
use tankmon::drivers::led_bar::LedBar;
use tankmon::fsm::StateId;
use tankmon::pins;
use tankmon::sensors::temperature::{sim_set_temp_adc, TemperatureSensor};
use tankmon::sensors::ultrasonic::{sim_set_echo_us, UltrasonicSensor};
use tankmon::sensors::{sim_set_buttons, SensorHub};

struct NullBus;

impl ErrorType for NullBus {
    type Error = Infallible;
}

impl I2c<SevenBitAddress> for NullBus {
    fn transaction(&mut self, _: u8, _: &mut [Operation<'_>]) -> Result<(), Infallible> {
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

type SimHardware = HardwareAdapter<NoDelay, NullBus, NoDelay>;

fn sim_hardware(config: &SystemConfig) -> SimHardware {
    let hub = SensorHub::new(
        UltrasonicSensor::new(
            pins::ULTRASONIC_TRIG_GPIO,
            pins::ULTRASONIC_ECHO_GPIO,
            config.echo_timeout_us,
            NoDelay,
        ),
        TemperatureSensor::new(pins::TEMP_ADC_GPIO),
        pins::BUTTON_A_GPIO,
        pins::BUTTON_B_GPIO,
    );
    let mut lcd = Lcd1602::new(NullBus, NoDelay, pins::LCD_I2C_ADDR);
    lcd.init().unwrap();
    HardwareAdapter::new(hub, lcd, LedBar::new(&pins::LED_BAR_GPIOS), BuzzerDriver::new())
}

/// Drive the loop exactly as `main` does, `ms` worth of 50 ms passes.
fn run(app: &mut AppService, hw: &mut SimHardware, sink: &mut LogEventSink, now: &mut u32, ms: u32) {
    let end = *now + ms;
    while *now < end {
        hw.advance(*now);
        app.tick(*now, hw, sink);
        *now += 50;
    }
}

#[test]
fn simulated_device_end_to_end() {
    let config = SystemConfig::default();
    let mut hw = sim_hardware(&config);
    let mut sink = LogEventSink::new();
    let mut app = AppService::new(config.clone());
    app.start(&mut sink);
    let mut now = 0;

    sim_set_echo_us(Some(2_941)); // ≈ 50 cm
    sim_set_temp_adc(Some(310)); // ≈ 25 °C
    sim_set_buttons(false, false);
    run(&mut app, &mut hw, &mut sink, &mut now, 500);
    assert_eq!(app.state(), StateId::Off);
    assert_eq!(hw.bar().lit(), 0);

    // Power on: hold A for five seconds.
    sim_set_buttons(true, false);
    run(&mut app, &mut hw, &mut sink, &mut now, 5_100);
    sim_set_buttons(false, false);
    run(&mut app, &mut hw, &mut sink, &mut now, 400);
    assert_eq!(app.state(), StateId::Monitoring);

    assert_eq!(app.reading().percent, 53);
    assert_eq!(hw.bar().lit(), 5);
    assert!(hw.lcd().backlight());
    assert_eq!(hw.lcd().line(0).trim_end(), " 53%  25.0C");
    assert_eq!(hw.lcd().line(1).trim_end(), "50.0cm 53.0L");
    assert!(!hw.buzzer().is_playing());

    // Tank full: the high-fill chirp starts.
    sim_set_echo_us(Some(176)); // ≈ 3 cm
    run(&mut app, &mut hw, &mut sink, &mut now, 50);
    assert_eq!(app.reading().percent, 100);
    assert_eq!(hw.bar().lit(), 10);
    assert!(hw.buzzer().is_playing());
    assert_ne!(hw.buzzer().current_freq(), 0);

    // Probe unplugged.
    sim_set_temp_adc(None);
    run(&mut app, &mut hw, &mut sink, &mut now, 500);
    assert!(hw.lcd().line(0).starts_with("100%  --.-C"));

    // Echo lost: last distance holds.
    sim_set_echo_us(None);
    run(&mut app, &mut hw, &mut sink, &mut now, 500);
    assert_eq!(app.reading().percent, 100);

    // Power off: hold B for five seconds.
    sim_set_buttons(false, true);
    run(&mut app, &mut hw, &mut sink, &mut now, 5_100);
    sim_set_buttons(false, false);
    run(&mut app, &mut hw, &mut sink, &mut now, 400);
    assert_eq!(app.state(), StateId::Off);
    assert_eq!(hw.bar().lit(), 0);
    assert!(!hw.buzzer().is_playing());
    assert!(!hw.lcd().backlight());
    assert_eq!(hw.lcd().line(0).trim_end(), "");
}
