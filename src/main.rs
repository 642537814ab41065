//! TankMon Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single polling control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter       LogEventSink   VolatileConfigStore      │
//! │  (Sensor+Indicator)    (EventSink)    (ConfigPort)             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Buttons · FSM · Sampler/Filter · Fill · Alarm         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  LoopClock · Watchdog                                          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result};
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use tankmon::adapters::config_store::VolatileConfigStore;
use tankmon::adapters::hardware::HardwareAdapter;
use tankmon::adapters::log_sink::LogEventSink;
use tankmon::adapters::time::LoopClock;
use tankmon::app::ports::{ConfigPort, IndicatorPort};
use tankmon::app::service::AppService;
use tankmon::config::SystemConfig;
use tankmon::drivers::buzzer::BuzzerDriver;
use tankmon::drivers::lcd::Lcd1602;
use tankmon::drivers::led_bar::LedBar;
use tankmon::drivers::{hw_init, watchdog::Watchdog};
use tankmon::pins;
use tankmon::sensors::temperature::TemperatureSensor;
use tankmon::sensors::ultrasonic::UltrasonicSensor;
use tankmon::sensors::SensorHub;

/// Stalled-loop reset threshold. A full loop is well under 250 ms.
const WATCHDOG_TIMEOUT_MS: u32 = 5_000;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  TankMon v{}                         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    hw_init::init_peripherals().context("HAL init failed")?;
    let mut watchdog = Watchdog::new(WATCHDOG_TIMEOUT_MS);

    // ── 3. Load config (volatile: always the boot defaults) ───
    let store = VolatileConfigStore::new(SystemConfig::default());
    let config = store
        .load()
        .map_err(tankmon::error::Error::from)
        .context("config rejected")?;
    info!("Config loaded: {:?}", config.tank);

    // ── 4. LCD on I²C0 (GPIO1 = SDA, GPIO2 = SCL, see pins.rs) ─
    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio1,
        peripherals.pins.gpio2,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let mut lcd = Lcd1602::new(i2c, Ets, pins::LCD_I2C_ADDR);
    if let Err(e) = lcd.init() {
        // Keep monitoring without a display; the buzzer and LEDs still work.
        warn!("{}; continuing without LCD", e);
    }

    // ── 5. Construct adapters ─────────────────────────────────
    let sensor_hub = SensorHub::new(
        UltrasonicSensor::new(
            pins::ULTRASONIC_TRIG_GPIO,
            pins::ULTRASONIC_ECHO_GPIO,
            config.echo_timeout_us,
            Ets,
        ),
        TemperatureSensor::new(pins::TEMP_ADC_GPIO),
        pins::BUTTON_A_GPIO,
        pins::BUTTON_B_GPIO,
    );

    let mut hw = HardwareAdapter::new(
        sensor_hub,
        lcd,
        LedBar::new(&pins::LED_BAR_GPIOS),
        BuzzerDriver::new(),
    );
    hw.all_off();
    hw.set_backlight(false);

    let mut log_sink = LogEventSink::new();
    let clock = LoopClock::new();

    // ── 6. Construct app service ──────────────────────────────
    let mut app = AppService::new(config.clone());
    app.start(&mut log_sink);

    info!("System ready. Hold A for {} ms to power on.", config.long_press_ms);

    // ── 7. Control loop ───────────────────────────────────────
    loop {
        let now_ms = clock.now_ms();

        hw.advance(now_ms);
        app.tick(now_ms, &mut hw, &mut log_sink);
        app.commit_if_pending(&store, &mut log_sink);

        // Feed watchdog on every iteration.
        watchdog.feed();

        FreeRtos::delay_ms(config.control_loop_interval_ms);
    }
}
