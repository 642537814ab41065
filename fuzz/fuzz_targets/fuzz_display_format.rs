//! Fuzz target: LCD frame formatting
//!
//! Builds status and menu frames from arbitrary bytes (including NaN,
//! infinities, and huge values) and verifies:
//! - No panics
//! - Both lines always fit the 16-column display
//!
//! cargo fuzz run fuzz_display_format

#![no_main]

use libfuzzer_sys::fuzz_target;
use tankmon::config::TankConfig;
use tankmon::display::{format_lines, DisplayFrame};
use tankmon::menu::MenuField;

fn f32_at(data: &[u8], at: usize) -> f32 {
    let mut b = [0u8; 4];
    for (i, slot) in b.iter_mut().enumerate() {
        *slot = data.get(at + i).copied().unwrap_or(0);
    }
    f32::from_le_bytes(b)
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let flags = data[0];

    let status = DisplayFrame::Status {
        percent: data[1],
        temperature_c: f32_at(data, 2),
        distance: f32_at(data, 6),
        volume: f32_at(data, 10),
        gallons: flags & 0x01 != 0,
        meters: flags & 0x02 != 0,
        muted: flags & 0x04 != 0,
    };

    let menu = DisplayFrame::Menu {
        field: MenuField::ALL[usize::from(flags >> 4) % MenuField::ALL.len()],
        editing: flags & 0x08 != 0,
        tank: TankConfig {
            min_distance_cm: f32_at(data, 14),
            max_distance: f32_at(data, 6),
            capacity_liters: u32::from_le_bytes([
                data[1],
                data.get(2).copied().unwrap_or(0),
                data.get(3).copied().unwrap_or(0),
                data.get(4).copied().unwrap_or(0),
            ]),
            display_gallons: flags & 0x01 != 0,
            display_meters: flags & 0x02 != 0,
        },
    };

    for frame in [status, menu, DisplayFrame::Off] {
        let [top, bottom] = format_lines(&frame);
        assert!(top.len() <= 16);
        assert!(bottom.len() <= 16);
    }
});
