//! Concrete state handler functions and table builder.
//!
//! Each state is defined by three plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.  This is the classic embedded C FSM pattern
//! expressed in safe Rust.
//!
//! ```text
//!  OFF ──[A long]──▶ MONITORING ──[A tap]──▶ MENU
//!   ▲                 │   ▲                   │
//!   │                 │   └──[idle 10 s]──────┤
//!   └────[B long]─────┘                       │
//!   └────[B long, not editing]────────────────┘
//!
//!  MONITORING: B tap toggles mute.
//!  MENU, browsing: A tap = next field, B tap = start editing.
//!  MENU, editing:  A press/repeat = up, B press/repeat = down,
//!                  B long = stop editing and commit,
//!                  A+B chord = stop editing and commit; the chord's
//!                  first press is taken back if it has not repeated.
//! ```
//!
//! Leaving MENU (idle timeout or power-off) always clears `editing` and
//! requests a commit of the tank settings.

use super::context::FsmContext;
use super::{StateDescriptor, StateId};
use crate::drivers::button::ButtonEvent;
use crate::menu::{self, MenuState, Step};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Off
        StateDescriptor {
            id: StateId::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
            on_update: off_update,
        },
        // Index 1 — Monitoring
        StateDescriptor {
            id: StateId::Monitoring,
            name: "Monitoring",
            on_enter: Some(monitoring_enter),
            on_exit: None,
            on_update: monitoring_update,
        },
        // Index 2 — Menu
        StateDescriptor {
            id: StateId::Menu,
            name: "Menu",
            on_enter: Some(menu_enter),
            on_exit: Some(menu_exit),
            on_update: menu_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF state
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(_ctx: &mut FsmContext) {
    info!("OFF: indicators dark, hold A to power on");
}

fn off_update(ctx: &mut FsmContext) -> Option<StateId> {
    (ctx.buttons.a == Some(ButtonEvent::LongPress)).then_some(StateId::Monitoring)
}

// ═══════════════════════════════════════════════════════════════════════════
//  MONITORING state — sampling, alarms, status display
// ═══════════════════════════════════════════════════════════════════════════

fn monitoring_enter(ctx: &mut FsmContext) {
    info!(
        "MONITORING: buzzer {}",
        if ctx.buzzer_active { "active" } else { "muted" }
    );
}

fn monitoring_update(ctx: &mut FsmContext) -> Option<StateId> {
    if ctx.buttons.b == Some(ButtonEvent::LongPress) {
        return Some(StateId::Off);
    }

    if ctx.buttons.a == Some(ButtonEvent::Tap) {
        return Some(StateId::Menu);
    }

    if ctx.buttons.b == Some(ButtonEvent::Tap) {
        ctx.buzzer_active = !ctx.buzzer_active;
        info!(
            "MONITORING: buzzer {}",
            if ctx.buzzer_active { "unmuted" } else { "muted" }
        );
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  MENU state — field navigation and value editing
// ═══════════════════════════════════════════════════════════════════════════

fn menu_enter(ctx: &mut FsmContext) {
    ctx.menu = MenuState::open(ctx.now_ms);
    info!("MENU: opened on {:?}", ctx.menu.selected);
}

fn menu_exit(ctx: &mut FsmContext) {
    ctx.menu.editing = false;
    ctx.menu.chord_latched = false;
    ctx.menu.undo = None;
    ctx.request_commit();
    info!("MENU: closed, committing {:?}", ctx.tank);
}

fn menu_update(ctx: &mut FsmContext) -> Option<StateId> {
    let buttons = ctx.buttons;

    if buttons.any() {
        ctx.menu.touch(ctx.now_ms);
    } else if ctx.menu.idle_for(ctx.now_ms) >= ctx.menu_idle_ms {
        info!("MENU: idle for {}ms", ctx.menu_idle_ms);
        return Some(StateId::Monitoring);
    }

    if ctx.menu.editing {
        menu_edit(ctx);
    } else {
        if buttons.b == Some(ButtonEvent::LongPress) {
            return Some(StateId::Off);
        }
        if !ctx.menu.chord_latched {
            menu_browse(ctx);
        }
    }

    if ctx.menu.chord_latched && !buttons.a_held && !buttons.b_held {
        ctx.menu.chord_latched = false;
    }

    None
}

fn menu_browse(ctx: &mut FsmContext) {
    if ctx.buttons.a == Some(ButtonEvent::Tap) {
        ctx.menu.advance();
        info!("MENU: field {:?}", ctx.menu.selected);
    } else if ctx.buttons.b == Some(ButtonEvent::Tap) {
        ctx.menu.editing = true;
        ctx.menu.undo = None;
        info!("MENU: editing {:?}", ctx.menu.selected);
    }
}

fn menu_edit(ctx: &mut FsmContext) {
    let buttons = ctx.buttons;
    let chord = (buttons.a == Some(ButtonEvent::Press) && buttons.b_held)
        || (buttons.b == Some(ButtonEvent::Press) && buttons.a_held);
    if chord {
        // The first button's press stepped before the chord was known.
        if let Some(before) = ctx.menu.undo.take() {
            ctx.tank = before;
        }
        ctx.menu.chord_latched = true;
        finish_editing(ctx);
        return;
    }

    // Holding B toggles editing off; the long press itself is not a step.
    if buttons.b == Some(ButtonEvent::LongPress) {
        finish_editing(ctx);
        return;
    }

    if matches!(buttons.a, Some(ButtonEvent::Tap)) || matches!(buttons.b, Some(ButtonEvent::Tap)) {
        ctx.menu.undo = None;
    }

    let (event, step) = if is_step(buttons.a) {
        (buttons.a, Step::Up)
    } else if is_step(buttons.b) {
        (buttons.b, Step::Down)
    } else {
        return;
    };
    let before = ctx.tank;
    menu::apply_step(&mut ctx.tank, ctx.menu.selected, step);
    ctx.menu.undo = (event == Some(ButtonEvent::Press)).then_some(before);
}

fn finish_editing(ctx: &mut FsmContext) {
    ctx.menu.editing = false;
    ctx.menu.undo = None;
    ctx.request_commit();
    info!("MENU: editing done, committing {:?}", ctx.tank);
}

/// Gestures that count as one increment/decrement while editing. An A
/// long press is just another auto-repeat tick here.
fn is_step(event: Option<ButtonEvent>) -> bool {
    matches!(
        event,
        Some(ButtonEvent::Press | ButtonEvent::Repeat | ButtonEvent::LongPress)
    )
}
