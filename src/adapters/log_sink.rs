//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! The `TELEM` lines are the device's serial diagnostic stream.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} | dist={:.1}cm{} | fill={}% ({} LEDs) | \
                     vol={:.1}L | T={:.1}\u{00b0}C | buzzer={}",
                    t.state,
                    t.distance_cm,
                    if t.locked { " [locked]" } else { "" },
                    t.percent,
                    t.lit_leds,
                    t.volume_liters,
                    t.temperature_c,
                    if t.buzzer_active { "on" } else { "muted" },
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::MenuFieldSelected(field) => {
                info!("MENU  | field {:?}", field);
            }
            AppEvent::TankEdited(tank) => {
                info!(
                    "MENU  | capacity={}L max={:.2}{} units={}/{}",
                    tank.capacity_liters,
                    tank.max_distance,
                    if tank.display_meters { "m" } else { "cm" },
                    if tank.display_gallons { "gal" } else { "L" },
                    if tank.display_meters { "m" } else { "cm" },
                );
            }
            AppEvent::ConfigCommitted(tank) => {
                info!("CONFIG| committed {:?}", tank);
            }
            AppEvent::BuzzerActiveChanged(active) => {
                info!("BUZZER| {}", if *active { "active" } else { "muted" });
            }
            AppEvent::AlarmFired(kind) => {
                warn!("ALARM | {}", kind);
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
