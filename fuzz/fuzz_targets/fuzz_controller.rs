//! Fuzz target: `AppService` control loop
//!
//! Each 4-byte chunk of input is one 50 ms loop pass:
//! - byte 0: button levels (bit 0 = A, bit 1 = B) and time skew (bits 2..7)
//! - byte 1: echo distance in cm (0 = timeout)
//! - byte 2: temperature in °C, offset by -40 (0xFF = probe missing)
//! - byte 3: bit 0 runs a settings commit after the pass
//!
//! Verifies:
//! - No panics under arbitrary input
//! - The menu cursor is only exposed while the menu is open
//! - Fill percent never exceeds 100 and the bar never exceeds its LEDs
//!
//! cargo fuzz run fuzz_controller

#![no_main]

use libfuzzer_sys::fuzz_target;
use tankmon::adapters::config_store::VolatileConfigStore;
use tankmon::app::events::AppEvent;
use tankmon::app::ports::{ButtonLevels, EventSink, IndicatorPort, SensorPort};
use tankmon::app::service::AppService;
use tankmon::config::SystemConfig;
use tankmon::display::{format_lines, DisplayFrame};
use tankmon::drivers::buzzer::AlertPattern;
use tankmon::error::SensorError;
use tankmon::fsm::StateId;

struct FuzzHw {
    echo_us: Option<u32>,
    temperature_c: f32,
    buttons: ButtonLevels,
    bar: u8,
}

impl SensorPort for FuzzHw {
    fn echo_duration_us(&mut self) -> Result<u32, SensorError> {
        self.echo_us.ok_or(SensorError::EchoTimeout)
    }

    fn read_temperature_c(&mut self) -> f32 {
        self.temperature_c
    }

    fn read_buttons(&mut self) -> ButtonLevels {
        self.buttons
    }
}

impl IndicatorPort for FuzzHw {
    fn render(&mut self, frame: &DisplayFrame) {
        let [top, bottom] = format_lines(frame);
        assert!(top.len() <= 16 && bottom.len() <= 16);
    }

    fn set_bar_level(&mut self, count: u8) {
        self.bar = count;
    }

    fn sound(&mut self, _pattern: AlertPattern) {}

    fn set_backlight(&mut self, _on: bool) {}

    fn all_off(&mut self) {
        self.bar = 0;
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = SystemConfig::default();
    let led_count = config.led_count;
    let store = VolatileConfigStore::new(config.clone());
    let mut app = AppService::new(config);
    let mut sink = NullSink;
    let mut hw = FuzzHw {
        echo_us: None,
        temperature_c: 20.0,
        buttons: ButtonLevels::default(),
        bar: 0,
    };
    app.start(&mut sink);

    let mut now: u32 = 0;
    for chunk in data.chunks_exact(4) {
        hw.buttons = ButtonLevels {
            a: chunk[0] & 0x01 != 0,
            b: chunk[0] & 0x02 != 0,
        };
        hw.echo_us = match chunk[1] {
            0 => None,
            cm => Some((f32::from(cm) * 2.0 / 0.034) as u32),
        };
        hw.temperature_c = match chunk[2] {
            0xFF => -127.0,
            t => f32::from(t) - 40.0,
        };

        now = now.wrapping_add(50 + u32::from(chunk[0] >> 2) * 50);
        app.tick(now, &mut hw, &mut sink);
        if chunk[3] & 0x01 != 0 {
            app.commit_if_pending(&store, &mut sink);
        }

        assert_eq!(app.menu().is_some(), app.state() == StateId::Menu);
        assert!(app.reading().percent <= 100);
        assert!(hw.bar <= led_count);
        if app.state() == StateId::Off {
            assert_eq!(hw.bar, 0);
        }
    }
});
