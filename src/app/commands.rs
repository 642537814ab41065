//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (serial
//! console, tests) that the [`AppService`](super::service::AppService)
//! interprets and acts upon.

use crate::config::TankConfig;
use crate::fsm::StateId;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Mute (`false`) or unmute (`true`) the alarm buzzer.
    SetBuzzerActive(bool),

    /// Switch the LCD backlight while powered on.
    SetBacklight(bool),

    /// Replace the tank settings and queue a commit.
    UpdateTank(TankConfig),

    /// Force the FSM into a specific state (debug / testing only).
    ForceState(StateId),
}
