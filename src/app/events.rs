//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test recorder, etc.).

use crate::alarm::AlarmKind;
use crate::config::TankConfig;
use crate::fsm::StateId;
use crate::menu::MenuField;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Periodic telemetry snapshot (the serial diagnostic stream).
    Telemetry(TelemetryData),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// The menu cursor moved (or the menu just opened).
    MenuFieldSelected(MenuField),

    /// The live tank settings changed (menu edit or command).
    TankEdited(TankConfig),

    /// Tank settings were handed to the config store successfully.
    ConfigCommitted(TankConfig),

    /// The buzzer was muted (`false`) or unmuted (`true`).
    BuzzerActiveChanged(bool),

    /// An audible alert was started.
    AlarmFired(AlarmKind),

    /// The application service has started (carries initial state).
    Started(StateId),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryData {
    pub state: StateId,
    pub distance_cm: f32,
    pub percent: u8,
    pub volume_liters: f32,
    pub temperature_c: f32,
    pub locked: bool,
    pub lit_leds: u8,
    pub buzzer_active: bool,
}
