//! HD44780 16x2 character LCD behind a PCF8574 I²C backpack.
//!
//! The expander's 8 output bits map to the LCD as:
//!
//! | Bit | Signal    |
//! |-----|-----------|
//! | 7-4 | D7-D4     |
//! | 3   | Backlight |
//! | 2   | EN        |
//! | 1   | RW (0)    |
//! | 0   | RS        |
//!
//! Every byte goes out as two 4-bit nibbles, each latched by an EN pulse.
//! Generic over `embedded_hal` I²C and delay so the host tests can
//! record the bus traffic.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub const LCD_COLS: usize = 16;

const BIT_RS: u8 = 0x01;
const BIT_EN: u8 = 0x04;
const BIT_BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;
const ROW_OFFSETS: [u8; 2] = [0x00, 0x40];

/// LCD bus error, carrying the underlying I²C error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcdError(pub embedded_hal::i2c::ErrorKind);

impl core::fmt::Display for LcdError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "LCD I2C write failed ({:?})", self.0)
    }
}

pub struct Lcd1602<I, D> {
    i2c: I,
    delay: D,
    addr: u8,
    backlight: bool,
    /// What is currently on the glass; skips redundant redraws.
    shown: [[u8; LCD_COLS]; 2],
}

impl<I: I2c, D: DelayNs> Lcd1602<I, D> {
    pub fn new(i2c: I, delay: D, addr: u8) -> Self {
        Self {
            i2c,
            delay,
            addr,
            backlight: true,
            shown: [[b' '; LCD_COLS]; 2],
        }
    }

    /// Run the HD44780 4-bit init sequence and clear the screen.
    pub fn init(&mut self) -> Result<(), LcdError> {
        self.delay.delay_ms(50);
        // Three 0x3 nibbles force 8-bit mode from any state, then 0x2
        // switches to 4-bit.
        for _ in 0..3 {
            self.pulse(0x30)?;
            self.delay.delay_us(4_500);
        }
        self.pulse(0x20)?;
        self.delay.delay_us(150);

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_ENTRY_MODE_INC)?;
        self.clear()?;
        log::info!("LCD1602 at 0x{:02X} initialised", self.addr);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), LcdError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        self.shown = [[b' '; LCD_COLS]; 2];
        Ok(())
    }

    /// Write `text` to `row`, padded with spaces to the full width.
    /// Non-ASCII characters show as `?`.
    pub fn write_line(&mut self, row: usize, text: &str) -> Result<(), LcdError> {
        let row = row.min(1);
        let mut cells = [b' '; LCD_COLS];
        for (cell, ch) in cells.iter_mut().zip(text.chars()) {
            *cell = if ch.is_ascii() { ch as u8 } else { b'?' };
        }
        if cells == self.shown[row] {
            return Ok(());
        }

        self.command(CMD_SET_DDRAM | ROW_OFFSETS[row])?;
        for &c in &cells {
            self.write_byte(c, true)?;
        }
        self.shown[row] = cells;
        Ok(())
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), LcdError> {
        self.backlight = on;
        // A bare expander write updates the backlight bit.
        self.expander_write(0)
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Current contents of `row` as ASCII.
    pub fn line(&self, row: usize) -> &str {
        core::str::from_utf8(&self.shown[row.min(1)]).unwrap_or("")
    }

    // ── Internal ──────────────────────────────────────────────────

    fn command(&mut self, cmd: u8) -> Result<(), LcdError> {
        self.write_byte(cmd, false)
    }

    fn write_byte(&mut self, byte: u8, data: bool) -> Result<(), LcdError> {
        let rs = if data { BIT_RS } else { 0 };
        self.pulse((byte & 0xF0) | rs)?;
        self.pulse(((byte << 4) & 0xF0) | rs)?;
        self.delay.delay_us(50);
        Ok(())
    }

    /// Latch one nibble (already in bits 7-4) with an EN pulse.
    fn pulse(&mut self, bits: u8) -> Result<(), LcdError> {
        self.expander_write(bits | BIT_EN)?;
        self.delay.delay_us(1);
        self.expander_write(bits & !BIT_EN)?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), LcdError> {
        let bl = if self.backlight { BIT_BACKLIGHT } else { 0 };
        self.i2c
            .write(self.addr, &[bits | bl])
            .map_err(|e| LcdError(embedded_hal::i2c::Error::kind(&e)))
    }
}
