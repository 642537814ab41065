//! On-device tank configuration menu.
//!
//! Holds which field is selected, whether it is being edited, and when
//! the user last touched a button. The field edit rules live here too;
//! the FSM decides *when* to apply them.
//!
//! | Field         | Up / Down                                  |
//! |---------------|--------------------------------------------|
//! | `VolumeUnit`  | flip liters ↔ gallons                      |
//! | `LengthUnit`  | flip cm ↔ m, rescaling `max_distance`      |
//! | `Capacity`    | ±1 L, floor 0                              |
//! | `MaxDistance` | ±5 cm (or ±1 m), floor 0                   |

use log::debug;

use crate::config::TankConfig;

const MAX_DISTANCE_STEP_CM: f32 = 5.0;
const MAX_DISTANCE_STEP_M: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuField {
    VolumeUnit,
    LengthUnit,
    Capacity,
    MaxDistance,
}

impl MenuField {
    pub const ALL: [MenuField; 4] = [
        Self::VolumeUnit,
        Self::LengthUnit,
        Self::Capacity,
        Self::MaxDistance,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Next field, wrapping after the last.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VolumeUnit => "Vol unit",
            Self::LengthUnit => "Len unit",
            Self::Capacity => "Capacity",
            Self::MaxDistance => "Max dist",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

/// Navigation state while the menu is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuState {
    pub selected: MenuField,
    pub editing: bool,
    pub last_interaction_ms: u32,
    /// An A+B chord ended editing; ignore taps until both buttons are up.
    pub chord_latched: bool,
    /// Settings as they were before the step made by the press that is
    /// still down. Cleared once that press repeats or is released.
    pub undo: Option<TankConfig>,
}

impl MenuState {
    /// Fresh menu on the first field, not editing.
    pub fn open(now_ms: u32) -> Self {
        Self {
            selected: MenuField::VolumeUnit,
            editing: false,
            last_interaction_ms: now_ms,
            chord_latched: false,
            undo: None,
        }
    }

    pub fn touch(&mut self, now_ms: u32) {
        self.last_interaction_ms = now_ms;
    }

    pub fn idle_for(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_interaction_ms)
    }

    pub fn advance(&mut self) {
        self.selected = self.selected.next();
    }
}

/// Apply one up/down step to `field` of `tank`.
pub fn apply_step(tank: &mut TankConfig, field: MenuField, step: Step) {
    match field {
        MenuField::VolumeUnit => tank.display_gallons = !tank.display_gallons,
        MenuField::LengthUnit => tank.toggle_meters(),
        MenuField::Capacity => {
            tank.capacity_liters = match step {
                Step::Up => tank.capacity_liters.saturating_add(1),
                Step::Down => tank.capacity_liters.saturating_sub(1),
            };
        }
        MenuField::MaxDistance => {
            let delta = if tank.display_meters {
                MAX_DISTANCE_STEP_M
            } else {
                MAX_DISTANCE_STEP_CM
            };
            tank.max_distance = match step {
                Step::Up => tank.max_distance + delta,
                Step::Down => (tank.max_distance - delta).max(0.0),
            };
        }
    }
    debug!("menu: {:?} {:?} -> {:?}", field, step, tank);
}
