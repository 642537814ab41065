//! Alarm policy.
//!
//! Runs **every monitoring tick after fill estimation** and decides
//! whether the buzzer sounds this cycle.
//!
//! ## Trigger conditions
//!
//! | Condition                      | Alert                          |
//! |--------------------------------|--------------------------------|
//! | `temperature >= temp_alarm_c`  | [`AlarmKind::OverTemperature`] |
//! | `percent <= fill_low_percent`  | [`AlarmKind::FillLow`]         |
//! | `percent >= fill_high_percent` | [`AlarmKind::FillHigh`]        |
//!
//! Temperature wins when both fire. An alert is emitted at most once
//! per `alarm_interval_ms`; the interval timer only advances when an
//! alert actually fires, so a quiet period never delays the next one.
//! Muting (`buzzer_active == false`) suppresses everything without
//! touching the timer.
//!
//! A disconnected probe reports -127.0 °C and is compared as-is: it
//! can never trip the over-temperature alert.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::sensors::temperature::DISCONNECTED_C;

/// Which breach an alert reports; selects the buzzer pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    OverTemperature,
    FillLow,
    FillHigh,
}

impl core::fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OverTemperature => write!(f, "over temperature"),
            Self::FillLow => write!(f, "fill critical low"),
            Self::FillHigh => write!(f, "fill critical high"),
        }
    }
}

/// Rate-limited alarm decision.
pub struct AlarmPolicy {
    temp_alarm_c: f32,
    fill_low_percent: u8,
    fill_high_percent: u8,
    interval_ms: u32,
    /// Timestamp of the last emitted alert.
    last_fired_ms: Option<u32>,
    /// Last tick saw the disconnected-probe sentinel.
    probe_missing: bool,
}

impl AlarmPolicy {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            temp_alarm_c: config.temp_alarm_c,
            fill_low_percent: config.fill_low_percent,
            fill_high_percent: config.fill_high_percent,
            interval_ms: config.alarm_interval_ms,
            last_fired_ms: None,
            probe_missing: false,
        }
    }

    /// Pure trigger test, no rate limiting.
    pub fn condition(&self, percent: u8, temperature_c: f32) -> Option<AlarmKind> {
        if temperature_c >= self.temp_alarm_c {
            Some(AlarmKind::OverTemperature)
        } else if percent <= self.fill_low_percent {
            Some(AlarmKind::FillLow)
        } else if percent >= self.fill_high_percent {
            Some(AlarmKind::FillHigh)
        } else {
            None
        }
    }

    /// Evaluate one tick. Returns the alert to sound, if any.
    pub fn evaluate(
        &mut self,
        percent: u8,
        temperature_c: f32,
        buzzer_active: bool,
        now_ms: u32,
    ) -> Option<AlarmKind> {
        self.track_probe(temperature_c);

        if !buzzer_active {
            return None;
        }
        let kind = self.condition(percent, temperature_c)?;

        let due = self
            .last_fired_ms
            .is_none_or(|last| now_ms.wrapping_sub(last) >= self.interval_ms);
        if !due {
            return None;
        }

        self.last_fired_ms = Some(now_ms);
        info!("ALARM: {kind} (fill={percent}%, T={temperature_c:.1}C)");
        Some(kind)
    }

    /// Convenience for callers that only need the yes/no decision.
    pub fn should_alarm(
        &mut self,
        percent: u8,
        temperature_c: f32,
        buzzer_active: bool,
        now_ms: u32,
    ) -> bool {
        self.evaluate(percent, temperature_c, buzzer_active, now_ms)
            .is_some()
    }

    /// Timestamp of the last emitted alert.
    pub fn last_fired_ms(&self) -> Option<u32> {
        self.last_fired_ms
    }

    // ── Internal ──────────────────────────────────────────────────

    fn track_probe(&mut self, temperature_c: f32) {
        let missing = temperature_c <= DISCONNECTED_C;
        if missing && !self.probe_missing {
            warn!("ALARM: temperature probe disconnected, over-temperature alert cannot fire");
        } else if !missing && self.probe_missing {
            info!("ALARM: temperature probe reconnected");
        }
        self.probe_missing = missing;
    }
}
