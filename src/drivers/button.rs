//! Polled, debounced button driver with tap, long-press, and auto-repeat.
//!
//! ## Hardware
//!
//! Active-high momentary switch with external pull-down. The main loop
//! samples the raw level once per tick and feeds it to [`ButtonDriver::tick`];
//! there is no ISR and no blocking wait for release.
//!
//! ## Gesture detection
//!
//! | Gesture    | Condition                                   | Event       |
//! |------------|---------------------------------------------|-------------|
//! | Press      | Accepted down edge                          | `Press`     |
//! | Repeat     | Still held, every `repeat_ms` after a step  | `Repeat`    |
//! | Long press | Held >= `long_press_ms` (fires once)        | `LongPress` |
//! | Tap        | Released before the long press fired        | `Tap`       |
//!
//! A press that reached the long-press threshold never produces a `Tap`
//! on release. Debounce is a lockout: a level change is only accepted
//! `debounce_ms` after the previous accepted edge. `Repeat` and
//! `LongPress` follow the raw level, so a release still waiting out the
//! lockout produces neither.

use crate::config::SystemConfig;

/// Button events emitted after gesture classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Press,
    Repeat,
    LongPress,
    Tap,
}

/// Thresholds shared by both buttons.
#[derive(Debug, Clone, Copy)]
pub struct ButtonTiming {
    pub debounce_ms: u32,
    pub long_press_ms: u32,
    pub repeat_ms: u32,
}

impl From<&SystemConfig> for ButtonTiming {
    fn from(c: &SystemConfig) -> Self {
        Self {
            debounce_ms: c.debounce_ms,
            long_press_ms: c.long_press_ms,
            repeat_ms: c.repeat_ms,
        }
    }
}

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Released,
    Held {
        since_ms: u32,
        last_step_ms: u32,
        long_fired: bool,
    },
}

pub struct ButtonDriver {
    name: &'static str,
    timing: ButtonTiming,
    state: GestureState,
    last_edge_ms: Option<u32>,
}

impl ButtonDriver {
    pub fn new(name: &'static str, timing: ButtonTiming) -> Self {
        Self {
            name,
            timing,
            state: GestureState::Released,
            last_edge_ms: None,
        }
    }

    /// Call from the main loop at each control tick with the raw level.
    /// Returns a classified gesture event, if any.
    pub fn tick(&mut self, pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        if pressed != self.is_held() && self.edge_allowed(now_ms) {
            self.last_edge_ms = Some(now_ms);
            return self.accept_edge(pressed, now_ms);
        }

        // Released inside the lockout: the press is still tracked, but it
        // must not step or long-press.
        if !pressed {
            return None;
        }

        let GestureState::Held {
            since_ms,
            last_step_ms,
            long_fired,
        } = &mut self.state
        else {
            return None;
        };

        if !*long_fired && now_ms.wrapping_sub(*since_ms) >= self.timing.long_press_ms {
            *long_fired = true;
            *last_step_ms = now_ms;
            log::debug!("button {}: long press", self.name);
            return Some(ButtonEvent::LongPress);
        }

        if now_ms.wrapping_sub(*last_step_ms) >= self.timing.repeat_ms {
            *last_step_ms = now_ms;
            return Some(ButtonEvent::Repeat);
        }

        None
    }

    /// Debounced level: `true` while a press is being tracked.
    pub fn is_held(&self) -> bool {
        matches!(self.state, GestureState::Held { .. })
    }

    /// Drop any in-progress gesture (e.g. on power-off).
    pub fn reset(&mut self) {
        self.state = GestureState::Released;
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // ── Internal ──────────────────────────────────────────────────

    fn edge_allowed(&self, now_ms: u32) -> bool {
        self.last_edge_ms
            .is_none_or(|t| now_ms.wrapping_sub(t) >= self.timing.debounce_ms)
    }

    fn accept_edge(&mut self, pressed: bool, now_ms: u32) -> Option<ButtonEvent> {
        if pressed {
            self.state = GestureState::Held {
                since_ms: now_ms,
                last_step_ms: now_ms,
                long_fired: false,
            };
            return Some(ButtonEvent::Press);
        }

        let prev = core::mem::replace(&mut self.state, GestureState::Released);
        match prev {
            GestureState::Held {
                long_fired: false, ..
            } => Some(ButtonEvent::Tap),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button() -> ButtonDriver {
        ButtonDriver::new("A", ButtonTiming::from(&SystemConfig::default()))
    }

    /// Hold the button from `from` to `to` (exclusive) at 50 ms ticks and
    /// collect every event.
    fn hold(btn: &mut ButtonDriver, from: u32, to: u32) -> Vec<(u32, ButtonEvent)> {
        (from..to)
            .step_by(50)
            .filter_map(|t| btn.tick(true, t).map(|e| (t, e)))
            .collect()
    }

    #[test]
    fn no_events_without_press() {
        let mut btn = button();
        assert_eq!(btn.tick(false, 100), None);
        assert_eq!(btn.tick(false, 200), None);
    }

    #[test]
    fn short_tap() {
        let mut btn = button();
        assert_eq!(btn.tick(true, 0), Some(ButtonEvent::Press));
        assert_eq!(btn.tick(true, 100), None);
        assert_eq!(btn.tick(false, 400), Some(ButtonEvent::Tap));
        assert!(!btn.is_held());
    }

    #[test]
    fn release_inside_debounce_is_deferred() {
        let mut btn = button();
        btn.tick(true, 0);
        // Bounce: released 100 ms in, still inside the 300 ms lockout.
        assert_eq!(btn.tick(false, 100), None);
        assert!(btn.is_held());
        assert_eq!(btn.tick(false, 300), Some(ButtonEvent::Tap));
    }

    #[test]
    fn quick_release_inside_lockout_never_repeats() {
        let mut btn = button();
        assert_eq!(btn.tick(true, 0), Some(ButtonEvent::Press));
        for t in (50..300).step_by(50) {
            assert_eq!(btn.tick(false, t), None, "t={t}");
        }
        assert_eq!(btn.tick(false, 300), Some(ButtonEvent::Tap));
        assert_eq!(btn.tick(false, 5_000), None);
    }

    #[test]
    fn long_press_fires_once_and_suppresses_tap() {
        let mut btn = button();
        let events = hold(&mut btn, 0, 5_150);
        let longs: Vec<_> = events
            .iter()
            .filter(|(_, e)| *e == ButtonEvent::LongPress)
            .collect();
        assert_eq!(longs, [&(5_000, ButtonEvent::LongPress)]);
        assert_eq!(btn.tick(false, 5_200), None, "no tap after a long press");
    }

    #[test]
    fn hold_under_threshold_is_a_tap() {
        let mut btn = button();
        let events = hold(&mut btn, 0, 4_950);
        assert!(!events.iter().any(|(_, e)| *e == ButtonEvent::LongPress));
        assert_eq!(btn.tick(false, 4_950), Some(ButtonEvent::Tap));
    }

    #[test]
    fn auto_repeat_every_interval() {
        let mut btn = button();
        let events = hold(&mut btn, 0, 1_050);
        let steps: Vec<u32> = events
            .iter()
            .filter(|(_, e)| matches!(e, ButtonEvent::Press | ButtonEvent::Repeat))
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(steps, [0, 200, 400, 600, 800, 1_000]);
    }
}
