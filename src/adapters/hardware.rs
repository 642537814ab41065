//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and every output driver, exposing them
//! through [`SensorPort`] and [`IndicatorPort`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::{ButtonLevels, IndicatorPort, SensorPort};
use crate::display::{format_lines, DisplayFrame};
use crate::drivers::buzzer::{AlertPattern, BuzzerDriver};
use crate::drivers::lcd::{Lcd1602, LcdError};
use crate::drivers::led_bar::LedBar;
use crate::error::SensorError;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
///
/// `D` is the busy-wait delay used by the ultrasonic driver, `I`/`DL`
/// the LCD's I²C bus and delay.
pub struct HardwareAdapter<D: DelayNs, I, DL> {
    sensor_hub: SensorHub<D>,
    lcd: Lcd1602<I, DL>,
    bar: LedBar,
    buzzer: BuzzerDriver,
    now_ms: u32,
    lcd_faulted: bool,
}

impl<D: DelayNs, I: I2c, DL: DelayNs> HardwareAdapter<D, I, DL> {
    pub fn new(sensor_hub: SensorHub<D>, lcd: Lcd1602<I, DL>, bar: LedBar, buzzer: BuzzerDriver) -> Self {
        Self {
            sensor_hub,
            lcd,
            bar,
            buzzer,
            now_ms: 0,
            lcd_faulted: false,
        }
    }

    /// Advance the adapter's clock and the buzzer sequencer. Call once
    /// per loop before handing the adapter to the service.
    pub fn advance(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
        self.buzzer.tick(now_ms);
    }

    pub fn lcd(&self) -> &Lcd1602<I, DL> {
        &self.lcd
    }

    pub fn bar(&self) -> &LedBar {
        &self.bar
    }

    pub fn buzzer(&self) -> &BuzzerDriver {
        &self.buzzer
    }

    /// Log the first LCD failure and the recovery, not every tick.
    fn track_lcd(&mut self, result: Result<(), LcdError>) {
        match result {
            Err(e) if !self.lcd_faulted => {
                warn!("{}", e);
                self.lcd_faulted = true;
            }
            Ok(()) if self.lcd_faulted => {
                info!("LCD responding again");
                self.lcd_faulted = false;
            }
            _ => {}
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: DelayNs, I: I2c, DL: DelayNs> SensorPort for HardwareAdapter<D, I, DL> {
    fn echo_duration_us(&mut self) -> Result<u32, SensorError> {
        self.sensor_hub.echo_duration_us()
    }

    fn read_temperature_c(&mut self) -> f32 {
        self.sensor_hub.temperature_c()
    }

    fn read_buttons(&mut self) -> ButtonLevels {
        self.sensor_hub.buttons()
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<D: DelayNs, I: I2c, DL: DelayNs> IndicatorPort for HardwareAdapter<D, I, DL> {
    fn render(&mut self, frame: &DisplayFrame) {
        let [top, bottom] = format_lines(frame);
        let result = self
            .lcd
            .write_line(0, &top)
            .and_then(|()| self.lcd.write_line(1, &bottom));
        self.track_lcd(result);
    }

    fn set_bar_level(&mut self, count: u8) {
        self.bar.set_level(count);
    }

    fn sound(&mut self, pattern: AlertPattern) {
        self.buzzer.play(pattern, self.now_ms);
    }

    fn set_backlight(&mut self, on: bool) {
        let result = self.lcd.set_backlight(on);
        self.track_lcd(result);
    }

    fn all_off(&mut self) {
        self.buzzer.stop();
        self.bar.off();
    }
}
