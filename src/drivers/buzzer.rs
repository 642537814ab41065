//! Non-blocking buzzer note sequencer.
//!
//! An [`AlertPattern`] is a short list of notes. [`BuzzerDriver::play`]
//! starts one and [`BuzzerDriver::tick`], called every control cycle,
//! retunes the LEDC channel as the pattern's time offset crosses note
//! boundaries. Nothing here blocks the control loop.
//!
//! | Pattern          | Notes                                 | Length |
//! |------------------|---------------------------------------|--------|
//! | `FillChirp`      | C4 E4 G4 C5 ascending                 | 450 ms |
//! | `TemperatureBeep`| 2 kHz, rest, 2 kHz                    | 320 ms |
//!
//! Both finish well inside the alarm rate-limit interval, so a new alert
//! never cuts an old one short in steady state.

use crate::drivers::hw_init;

/// One step of a pattern. `freq_hz == 0` is a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub freq_hz: u32,
    pub duration_ms: u32,
}

const fn note(freq_hz: u32, duration_ms: u32) -> Note {
    Note { freq_hz, duration_ms }
}

const FILL_CHIRP: [Note; 4] = [note(262, 100), note(330, 100), note(392, 100), note(523, 150)];
const TEMPERATURE_BEEP: [Note; 3] = [note(2_000, 120), note(0, 80), note(2_000, 120)];

/// Alert sound selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPattern {
    FillChirp,
    TemperatureBeep,
}

impl AlertPattern {
    pub fn notes(self) -> &'static [Note] {
        match self {
            Self::FillChirp => &FILL_CHIRP,
            Self::TemperatureBeep => &TEMPERATURE_BEEP,
        }
    }

    pub fn duration_ms(self) -> u32 {
        self.notes().iter().map(|n| n.duration_ms).sum()
    }

    /// Note sounding `offset_ms` into the pattern, `None` once finished.
    fn note_at(self, offset_ms: u32) -> Option<Note> {
        let mut end = 0u32;
        self.notes().iter().copied().find(|n| {
            end += n.duration_ms;
            offset_ms < end
        })
    }
}

pub struct BuzzerDriver {
    playing: Option<(AlertPattern, u32)>,
    current_freq: u32,
}

impl Default for BuzzerDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl BuzzerDriver {
    pub fn new() -> Self {
        Self {
            playing: None,
            current_freq: 0,
        }
    }

    /// Start `pattern` at `now_ms`, replacing anything still playing.
    pub fn play(&mut self, pattern: AlertPattern, now_ms: u32) {
        self.playing = Some((pattern, now_ms));
        self.tick(now_ms);
    }

    /// Advance the sequencer. Call once per control cycle.
    pub fn tick(&mut self, now_ms: u32) {
        let freq = match self.playing {
            Some((pattern, start)) => match pattern.note_at(now_ms.wrapping_sub(start)) {
                Some(n) => n.freq_hz,
                None => {
                    self.playing = None;
                    0
                }
            },
            None => 0,
        };
        self.output(freq);
    }

    /// Silence immediately.
    pub fn stop(&mut self) {
        self.playing = None;
        self.output(0);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    /// Frequency currently driven on the pin (0 = silent).
    pub fn current_freq(&self) -> u32 {
        self.current_freq
    }

    fn output(&mut self, freq_hz: u32) {
        if freq_hz != self.current_freq {
            hw_init::buzzer_tone(freq_hz);
            self.current_freq = freq_hz;
        }
    }
}
