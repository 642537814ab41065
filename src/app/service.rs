//! Application service — the hexagonal core.
//!
//! [`AppService`] owns every piece of mutable device state: the FSM and
//! its context, both button drivers, the distance sampler and filter,
//! the alarm policy, and the last level reading. It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters
//! and a virtual clock.
//!
//! ```text
//!  SensorPort ───▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                  │          AppService          │
//! IndicatorPort ◀──│ Buttons · FSM · Level · Alarm│ ◀── ConfigPort
//!                  └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::alarm::{AlarmKind, AlarmPolicy};
use crate::config::{SystemConfig, TankConfig};
use crate::display::DisplayFrame;
use crate::drivers::button::{ButtonDriver, ButtonTiming};
use crate::drivers::buzzer::AlertPattern;
use crate::fsm::context::{ButtonInput, FsmContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::level::fill::{compute_fill_percent, lit_leds, volume_liters};
use crate::level::sampler::{DistanceFilter, DistanceSampler};
use crate::level::{units, LevelReading};
use crate::menu::MenuState;
use crate::sensors::temperature::DISCONNECTED_C;

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ConfigError, ConfigPort, EventSink, IndicatorPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    config: SystemConfig,
    fsm: Fsm,
    ctx: FsmContext,
    button_a: ButtonDriver,
    button_b: ButtonDriver,
    sampler: DistanceSampler,
    filter: DistanceFilter,
    alarm: AlarmPolicy,
    reading: LevelReading,
    temperature_c: f32,
    backlight: bool,
    last_telemetry_ms: Option<u32>,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let timing = ButtonTiming::from(&config);
        let empty_cm = config.tank.max_distance_cm();
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Off),
            ctx: FsmContext::new(&config),
            button_a: ButtonDriver::new("A", timing),
            button_b: ButtonDriver::new("B", timing),
            sampler: DistanceSampler::new(&config),
            filter: DistanceFilter::new(&config, empty_cm),
            alarm: AlarmPolicy::new(&config),
            reading: LevelReading {
                distance_cm: empty_cm,
                percent: 0,
                volume_liters: 0.0,
                locked: false,
            },
            temperature_c: DISCONNECTED_C,
            backlight: true,
            last_telemetry_ms: None,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the FSM in its default initial state (Off).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full loop iteration at `now_ms`:
    /// buttons → FSM → (monitoring only) sample, filter, fill, alarm → render.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`IndicatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        // 1. Buttons → gestures
        let levels = hw.read_buttons();
        self.ctx.buttons = ButtonInput {
            a: self.button_a.tick(levels.a, now_ms),
            b: self.button_b.tick(levels.b, now_ms),
            a_held: self.button_a.is_held(),
            b_held: self.button_b.is_held(),
        };
        self.ctx.now_ms = now_ms;

        // 2. FSM tick (pure state logic), then report what it changed
        let prev_state = self.fsm.current_state();
        let prev_menu = self.ctx.menu;
        let prev_tank = self.ctx.tank;
        let prev_buzzer = self.ctx.buzzer_active;

        self.fsm.tick(&mut self.ctx);

        self.report_fsm_changes(prev_state, prev_menu, prev_tank, prev_buzzer, hw, sink);

        // 3. State-specific work
        match self.fsm.current_state() {
            StateId::Off => {}
            StateId::Monitoring => self.monitor(now_ms, hw, sink),
            StateId::Menu => hw.render(&DisplayFrame::Menu {
                field: self.ctx.menu.selected,
                editing: self.ctx.menu.editing,
                tank: self.ctx.tank,
            }),
        }

        // 4. Serial telemetry
        if self.fsm.current_state().is_on() {
            let due = self
                .last_telemetry_ms
                .is_none_or(|t| now_ms.wrapping_sub(t) >= self.config.telemetry_interval_ms);
            if due {
                self.last_telemetry_ms = Some(now_ms);
                sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
            }
        }
    }

    /// Save the tank settings if the menu asked for it. Returns `true`
    /// when a commit was attempted and succeeded.
    pub fn commit_if_pending(
        &mut self,
        store: &impl ConfigPort,
        sink: &mut impl EventSink,
    ) -> bool {
        if !self.ctx.commit_pending {
            return false;
        }
        self.ctx.commit_pending = false;

        let mut candidate = self.config.clone();
        candidate.tank = self.ctx.tank;
        match store.save(&candidate) {
            Ok(()) => {
                self.config = candidate;
                info!("Tank settings committed: {:?}", self.ctx.tank);
                sink.emit(&AppEvent::ConfigCommitted(self.ctx.tank));
                true
            }
            // Menu edits only floor at zero, so a value the store refuses
            // is an ordinary outcome. The live settings stay in effect.
            Err(ConfigError::ValidationFailed(reason)) => {
                info!("Tank settings kept live, not committed: {}", reason);
                false
            }
            Err(e) => {
                warn!("Tank settings commit failed: {}", e);
                false
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (serial console, tests).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::SetBuzzerActive(active) => {
                if self.ctx.buzzer_active != active {
                    self.ctx.buzzer_active = active;
                    sink.emit(&AppEvent::BuzzerActiveChanged(active));
                }
            }
            AppCommand::SetBacklight(on) => {
                self.backlight = on;
                if self.fsm.current_state().is_on() {
                    hw.set_backlight(on);
                }
                info!("Backlight {}", if on { "on" } else { "off" });
            }
            AppCommand::UpdateTank(tank) => {
                self.ctx.tank = tank;
                self.ctx.request_commit();
                sink.emit(&AppEvent::TankEdited(tank));
                info!("Tank settings updated at runtime");
            }
            AppCommand::ForceState(target) => {
                let prev = self.fsm.current_state();
                self.fsm.force_transition(target, &mut self.ctx);
                if prev != target {
                    self.apply_state_entry(target, hw);
                    sink.emit(&AppEvent::StateChanged {
                        from: prev,
                        to: target,
                    });
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current state.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            state: self.fsm.current_state(),
            distance_cm: self.reading.distance_cm,
            percent: self.reading.percent,
            volume_liters: self.reading.volume_liters,
            temperature_c: self.temperature_c,
            locked: self.reading.locked,
            lit_leds: lit_leds(self.reading.percent, self.config.led_count),
            buzzer_active: self.ctx.buzzer_active,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Menu cursor, only while the menu is open.
    pub fn menu(&self) -> Option<&MenuState> {
        (self.fsm.current_state() == StateId::Menu).then_some(&self.ctx.menu)
    }

    /// Live tank settings (including uncommitted menu edits).
    pub fn tank(&self) -> &TankConfig {
        &self.ctx.tank
    }

    /// Last derived level data.
    pub fn reading(&self) -> &LevelReading {
        &self.reading
    }

    pub fn buzzer_active(&self) -> bool {
        self.ctx.buzzer_active
    }

    pub fn commit_pending(&self) -> bool {
        self.ctx.commit_pending
    }

    /// Clone of the last committed configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.config.clone()
    }

    // ── Internal ──────────────────────────────────────────────

    fn report_fsm_changes(
        &mut self,
        prev_state: StateId,
        prev_menu: MenuState,
        prev_tank: TankConfig,
        prev_buzzer: bool,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        let state = self.fsm.current_state();
        if state != prev_state {
            self.apply_state_entry(state, hw);
            sink.emit(&AppEvent::StateChanged {
                from: prev_state,
                to: state,
            });
        }

        let menu_moved = prev_state != StateId::Menu || prev_menu.selected != self.ctx.menu.selected;
        if state == StateId::Menu && menu_moved {
            sink.emit(&AppEvent::MenuFieldSelected(self.ctx.menu.selected));
        }

        if self.ctx.tank != prev_tank {
            sink.emit(&AppEvent::TankEdited(self.ctx.tank));
        }

        if self.ctx.buzzer_active != prev_buzzer {
            sink.emit(&AppEvent::BuzzerActiveChanged(self.ctx.buzzer_active));
        }
    }

    /// Indicator side effects of entering `state`.
    fn apply_state_entry(&mut self, state: StateId, hw: &mut impl IndicatorPort) {
        match state {
            StateId::Off => {
                hw.all_off();
                hw.render(&DisplayFrame::Off);
                hw.set_backlight(false);
                self.last_telemetry_ms = None;
            }
            StateId::Monitoring | StateId::Menu => hw.set_backlight(self.backlight),
        }
    }

    /// Sample → filter → fill → alarm → render.
    fn monitor(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        let tank = self.ctx.tank;
        let min_cm = tank.min_distance_cm;
        let max_cm = tank.max_distance_cm();

        let raw = self.sampler.measure(|| hw.echo_duration_us());
        if let Err(e) = raw {
            debug!("level: {e}, holding {:.1}cm", self.filter.filtered_cm());
        }
        let distance_cm = self.filter.update(raw, min_cm);
        let percent = compute_fill_percent(distance_cm, min_cm, max_cm);
        self.reading = LevelReading {
            distance_cm,
            percent,
            volume_liters: volume_liters(percent, tank.capacity_liters),
            locked: self.filter.is_locked(),
        };

        self.temperature_c = hw.read_temperature_c();

        if let Some(kind) = self
            .alarm
            .evaluate(percent, self.temperature_c, self.ctx.buzzer_active, now_ms)
        {
            hw.sound(alert_pattern(kind));
            sink.emit(&AppEvent::AlarmFired(kind));
        }

        hw.set_bar_level(lit_leds(percent, self.config.led_count));
        hw.render(&self.status_frame());
    }

    fn status_frame(&self) -> DisplayFrame {
        let tank = &self.ctx.tank;
        let distance = if tank.display_meters {
            units::cm_to_meters(self.reading.distance_cm)
        } else {
            self.reading.distance_cm
        };
        let volume = if tank.display_gallons {
            units::liters_to_gallons(self.reading.volume_liters)
        } else {
            self.reading.volume_liters
        };
        DisplayFrame::Status {
            percent: self.reading.percent,
            temperature_c: self.temperature_c,
            distance,
            volume,
            gallons: tank.display_gallons,
            meters: tank.display_meters,
            muted: !self.ctx.buzzer_active,
        }
    }
}

fn alert_pattern(kind: AlarmKind) -> AlertPattern {
    match kind {
        AlarmKind::OverTemperature => AlertPattern::TemperatureBeep,
        AlarmKind::FillLow | AlarmKind::FillHigh => AlertPattern::FillChirp,
    }
}
