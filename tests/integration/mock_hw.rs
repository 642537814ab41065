//! Mock hardware adapters for integration tests.
//!
//! Implements [`SensorPort`] and [`IndicatorPort`] with scripted inputs
//! and call recording, plus a recording event sink, a config store that
//! can be told to fail, and a [`Rig`] that drives an [`AppService`] on a
//! virtual 50 ms clock.

use std::cell::RefCell;

use tankmon::app::events::AppEvent;
use tankmon::app::ports::{
    ButtonLevels, ConfigError, ConfigPort, EventSink, IndicatorPort, SensorPort,
};
use tankmon::app::service::AppService;
use tankmon::config::{SystemConfig, TankConfig};
use tankmon::display::DisplayFrame;
use tankmon::drivers::buzzer::AlertPattern;
use tankmon::error::SensorError;
use tankmon::fsm::StateId;

/// Echo HIGH time that converts back to `cm`.
pub fn us_for(cm: f32) -> u32 {
    (cm * 2.0 / 0.034).round() as u32
}

// ── Recorded calls ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    Render(DisplayFrame),
    BarLevel(u8),
    Sound { pattern: AlertPattern, at_ms: u32 },
    Backlight(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Echo returned by every ping; `None` times out.
    pub echo_us: Option<u32>,
    pub temperature_c: f32,
    pub buttons: ButtonLevels,
    /// Virtual time, stamped onto recorded sounds.
    pub now_ms: u32,
    pub pings: usize,
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            echo_us: Some(us_for(50.0)),
            temperature_c: 22.0,
            buttons: ButtonLevels::default(),
            now_ms: 0,
            pings: 0,
            calls: Vec::new(),
        }
    }

    pub fn set_distance_cm(&mut self, cm: f32) {
        self.echo_us = Some(us_for(cm));
    }

    /// Every alert sounded so far, with its timestamp.
    pub fn sounds(&self) -> Vec<(AlertPattern, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Sound { pattern, at_ms } => Some((*pattern, *at_ms)),
                _ => None,
            })
            .collect()
    }

    pub fn last_frame(&self) -> Option<&DisplayFrame> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Render(f) => Some(f),
            _ => None,
        })
    }

    pub fn last_bar(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::BarLevel(n) => Some(*n),
            _ => None,
        })
    }

    pub fn last_backlight(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Backlight(on) => Some(*on),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&HwCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn echo_duration_us(&mut self) -> Result<u32, SensorError> {
        self.pings += 1;
        self.echo_us.ok_or(SensorError::EchoTimeout)
    }

    fn read_temperature_c(&mut self) -> f32 {
        self.temperature_c
    }

    fn read_buttons(&mut self) -> ButtonLevels {
        self.buttons
    }
}

impl IndicatorPort for MockHardware {
    fn render(&mut self, frame: &DisplayFrame) {
        self.calls.push(HwCall::Render(*frame));
    }

    fn set_bar_level(&mut self, count: u8) {
        self.calls.push(HwCall::BarLevel(count));
    }

    fn sound(&mut self, pattern: AlertPattern) {
        self.calls.push(HwCall::Sound {
            pattern,
            at_ms: self.now_ms,
        });
    }

    fn set_backlight(&mut self, on: bool) {
        self.calls.push(HwCall::Backlight(on));
    }

    fn all_off(&mut self) {
        self.calls.push(HwCall::AllOff);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn committed(&self) -> Vec<TankConfig> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ConfigCommitted(t) => Some(*t),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockConfigStore ───────────────────────────────────────────

#[derive(Default)]
pub struct MockConfigStore {
    pub fail: bool,
    pub saved: RefCell<Vec<SystemConfig>>,
}

impl ConfigPort for MockConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Ok(SystemConfig::default())
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        if self.fail {
            return Err(ConfigError::IoError);
        }
        config.validate()?;
        self.saved.borrow_mut().push(config.clone());
        Ok(())
    }
}

// ── Rig ───────────────────────────────────────────────────────

/// Loop step used by every scenario.
pub const STEP_MS: u32 = 50;

/// An [`AppService`] wired to mocks and a virtual clock.
pub struct Rig {
    pub app: AppService,
    pub hw: MockHardware,
    pub sink: RecordingSink,
    pub store: MockConfigStore,
    pub now: u32,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: SystemConfig) -> Self {
        let mut sink = RecordingSink::default();
        let mut app = AppService::new(config);
        app.start(&mut sink);
        Self {
            app,
            hw: MockHardware::new(),
            sink,
            store: MockConfigStore::default(),
            now: 0,
        }
    }

    /// Tank settings with a 5 cm full bound and 50 cm empty bound.
    pub fn small_tank() -> SystemConfig {
        let mut config = SystemConfig::default();
        config.tank.min_distance_cm = 5.0;
        config.tank.max_distance = 50.0;
        config
    }

    /// Hold the given button levels for `ms`, one loop pass per step.
    pub fn run(&mut self, a: bool, b: bool, ms: u32) {
        let end = self.now + ms;
        while self.now < end {
            self.hw.buttons = ButtonLevels { a, b };
            self.hw.now_ms = self.now;
            self.app.tick(self.now, &mut self.hw, &mut self.sink);
            self.app.commit_if_pending(&self.store, &mut self.sink);
            self.now += STEP_MS;
        }
    }

    pub fn idle(&mut self, ms: u32) {
        self.run(false, false, ms);
    }

    /// Short press and release of one button, clear of the debounce window.
    pub fn tap_a(&mut self) {
        self.run(true, false, 350);
        self.idle(350);
    }

    pub fn tap_b(&mut self) {
        self.run(false, true, 350);
        self.idle(350);
    }

    /// Hold A past the long-press threshold and let go.
    pub fn power_on(&mut self) {
        self.run(true, false, 5_100);
        self.idle(400);
        assert_eq!(self.app.state(), StateId::Monitoring);
    }
}
