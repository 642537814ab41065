//! What the LCD shows, and how it is laid out on 2x16 characters.
//!
//! The core builds a [`DisplayFrame`] each tick; the display adapter
//! turns it into text with [`format_lines`]. Distance and volume in a
//! `Status` frame are already in the active display units.

use core::fmt::Write;

use heapless::String;

use crate::config::TankConfig;
use crate::drivers::lcd::LCD_COLS;
use crate::menu::MenuField;
use crate::sensors::temperature::DISCONNECTED_C;

pub type LcdLine = String<LCD_COLS>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayFrame {
    Status {
        percent: u8,
        temperature_c: f32,
        distance: f32,
        volume: f32,
        gallons: bool,
        meters: bool,
        muted: bool,
    },
    Menu {
        field: MenuField,
        editing: bool,
        tank: TankConfig,
    },
    Off,
}

/// Render a frame into two LCD lines. Overlong text is cut at 16 chars.
pub fn format_lines(frame: &DisplayFrame) -> [LcdLine; 2] {
    let mut top = Truncating::default();
    let mut bottom = Truncating::default();

    // Writes into `Truncating` never fail.
    match *frame {
        DisplayFrame::Status {
            percent,
            temperature_c,
            distance,
            volume,
            gallons,
            meters,
            muted,
        } => {
            let _ = write!(top, "{:>3}% ", percent);
            if temperature_c <= DISCONNECTED_C {
                let _ = write!(top, " --.-C");
            } else {
                let _ = write!(top, "{:>5.1}C", temperature_c);
            }
            if muted {
                let _ = write!(top, " MUTE");
            }

            if meters {
                let _ = write!(bottom, "{:.2}m ", distance);
            } else {
                let _ = write!(bottom, "{:.1}cm ", distance);
            }
            let _ = write!(bottom, "{:.1}{}", volume, if gallons { "gal" } else { "L" });
        }
        DisplayFrame::Menu {
            field,
            editing,
            tank,
        } => {
            let marker = if editing { '*' } else { '>' };
            let _ = write!(
                top,
                "{}{:<10}{}/{}",
                marker,
                field.label(),
                field.index() + 1,
                MenuField::ALL.len()
            );
            let _ = match field {
                MenuField::VolumeUnit => {
                    write!(bottom, "{}", if tank.display_gallons { "Gallons" } else { "Liters" })
                }
                MenuField::LengthUnit => {
                    write!(bottom, "{}", if tank.display_meters { "Meters" } else { "Centimeters" })
                }
                MenuField::Capacity => write!(bottom, "{} L", tank.capacity_liters),
                MenuField::MaxDistance if tank.display_meters => {
                    write!(bottom, "{:.2} m", tank.max_distance)
                }
                MenuField::MaxDistance => write!(bottom, "{:.0} cm", tank.max_distance),
            };
        }
        DisplayFrame::Off => {}
    }

    [top.0, bottom.0]
}

/// `fmt::Write` sink that silently drops whatever does not fit.
#[derive(Default)]
struct Truncating(LcdLine);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
