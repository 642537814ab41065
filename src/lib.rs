//! TankMon firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod fsm;
pub mod level;
pub mod menu;
pub mod pins;

// Hardware-facing modules; the ESP-IDF implementations are guarded by
// cfg attributes inside and fall back to host simulation.
pub mod adapters;
pub mod drivers;
pub mod sensors;
