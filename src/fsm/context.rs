//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to.  It contains this tick's button gestures, timing, the
//! editable tank settings, the menu cursor, and the mute flag.  Think of
//! it as the "blackboard" in a blackboard architecture: the service
//! fills in the inputs, runs the FSM, then diffs the outputs.

use crate::config::{SystemConfig, TankConfig};
use crate::drivers::button::ButtonEvent;
use crate::menu::MenuState;

// ---------------------------------------------------------------------------
// Button snapshot (written by the service before each FSM tick)
// ---------------------------------------------------------------------------

/// Classified gestures for this tick plus the debounced levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonInput {
    pub a: Option<ButtonEvent>,
    pub b: Option<ButtonEvent>,
    /// Button A is currently down (debounced).
    pub a_held: bool,
    /// Button B is currently down (debounced).
    pub b_held: bool,
}

impl ButtonInput {
    pub fn any(&self) -> bool {
        self.a.is_some() || self.b.is_some()
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Current loop timestamp (ms, wrapping).
    pub now_ms: u32,

    // -- Inputs --
    pub buttons: ButtonInput,

    // -- Device state --
    /// Live tank settings; edited in place by the menu.
    pub tank: TankConfig,
    /// Menu cursor. Only meaningful in `StateId::Menu`; `editing` is
    /// cleared whenever the menu is left.
    pub menu: MenuState,
    /// `false` = user muted the buzzer.
    pub buzzer_active: bool,
    /// Set when the menu asks for the tank settings to be saved.
    /// Cleared by the service once the save has been attempted.
    pub commit_pending: bool,

    // -- Configuration --
    pub menu_idle_ms: u32,
}

impl FsmContext {
    /// Create a new context with the given configuration.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            now_ms: 0,
            buttons: ButtonInput::default(),
            tank: config.tank,
            menu: MenuState::open(0),
            buzzer_active: true,
            commit_pending: false,
            menu_idle_ms: config.menu_idle_ms,
        }
    }

    pub fn request_commit(&mut self) {
        self.commit_pending = true;
    }
}
