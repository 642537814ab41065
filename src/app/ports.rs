//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, indicators, event sinks, config storage)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.
//!
//! All port errors are typed — callers must handle every variant explicitly.

use crate::config::SystemConfig;
use crate::display::DisplayFrame;
use crate::drivers::buzzer::AlertPattern;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw (undebounced) button levels; `true` = pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonLevels {
    pub a: bool,
    pub b: bool,
}

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Fire one ultrasonic ping and return the echo HIGH time.
    /// [`SensorError::EchoTimeout`] when nothing comes back in time.
    fn echo_duration_us(&mut self) -> Result<u32, SensorError>;

    /// Probe temperature in °C, or -127.0 when the probe is missing.
    fn read_temperature_c(&mut self) -> f32;

    fn read_buttons(&mut self) -> ButtonLevels;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the LCD, LED bar,
/// and buzzer. Nothing flows back.
pub trait IndicatorPort {
    /// Show `frame` on the LCD.
    fn render(&mut self, frame: &DisplayFrame);

    /// Light the bottom `count` LEDs of the bar graph.
    fn set_bar_level(&mut self, count: u8);

    /// Start an alert sound (fire-and-forget).
    fn sound(&mut self, pattern: AlertPattern);

    fn set_backlight(&mut self, on: bool);

    /// Dark LEDs, silent buzzer. The LCD is blanked by rendering
    /// [`DisplayFrame::Off`].
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log,
/// test recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting and
/// reject invalid ranges with [`ConfigError::ValidationFailed`].
pub trait ConfigPort {
    /// Load configuration from storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
