//! Output drivers, button gesture detection, and hardware initialisation.

pub mod button;
pub mod buzzer;
pub mod hw_init;
pub mod lcd;
pub mod led_bar;
pub mod watchdog;
