//! Fill-level LED bar graph.
//!
//! Ten discrete LEDs, bottom first, each on its own GPIO.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIOs via hw_init.
//! On host/test: tracks the lit count in-memory only.

use crate::drivers::hw_init;

pub struct LedBar {
    gpios: &'static [i32],
    lit: u8,
}

impl LedBar {
    pub fn new(gpios: &'static [i32]) -> Self {
        Self { gpios, lit: 0 }
    }

    /// Light the bottom `count` LEDs, darken the rest.
    pub fn set_level(&mut self, count: u8) {
        let count = count.min(self.len());
        if count == self.lit {
            return;
        }
        for (i, &gpio) in self.gpios.iter().enumerate() {
            hw_init::gpio_write(gpio, i < usize::from(count));
        }
        self.lit = count;
    }

    pub fn off(&mut self) {
        self.set_level(0);
    }

    pub fn lit(&self) -> u8 {
        self.lit
    }

    pub fn len(&self) -> u8 {
        self.gpios.len().min(usize::from(u8::MAX)) as u8
    }

    pub fn is_empty(&self) -> bool {
        self.gpios.is_empty()
    }
}
