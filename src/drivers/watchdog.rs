//! Task Watchdog Timer (TWDT) driver.
//!
//! Subscribes the control-loop task to the ESP-IDF TWDT so a stalled
//! loop resets the device. The loop calls [`Watchdog::feed`] once per
//! pass. On the host there is nothing to subscribe to; feeds are only
//! counted.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::{
    esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure, esp_task_wdt_reset, ESP_OK,
};

pub struct Watchdog {
    timeout_ms: u32,
    subscribed: bool,
    feeds: u64,
}

impl Watchdog {
    /// Configure the TWDT for `timeout_ms` (panic on trigger) and add
    /// the calling task. A failed subscription is logged; the loop then
    /// runs unguarded.
    pub fn new(timeout_ms: u32) -> Self {
        let subscribed = subscribe(timeout_ms);
        if subscribed {
            log::info!("Watchdog: subscribed ({}ms timeout)", timeout_ms);
        }
        Self {
            timeout_ms,
            subscribed,
            feeds: 0,
        }
    }

    pub fn feed(&mut self) {
        if self.subscribed {
            reset();
        }
        self.feeds = self.feeds.wrapping_add(1);
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Feeds since construction.
    pub fn feeds(&self) -> u64 {
        self.feeds
    }
}

#[cfg(target_os = "espidf")]
fn subscribe(timeout_ms: u32) -> bool {
    let cfg = esp_task_wdt_config_t {
        timeout_ms,
        idle_core_mask: 0,
        trigger_panic: true,
    };
    // SAFETY: plain ESP-IDF calls with a valid config; a null handle
    // means "the calling task".
    unsafe {
        let ret = esp_task_wdt_reconfigure(&cfg);
        if ret != ESP_OK as i32 {
            log::warn!("Watchdog: reconfigure returned {} (already configured?)", ret);
        }
        let ret = esp_task_wdt_add(core::ptr::null_mut());
        if ret != ESP_OK as i32 {
            log::warn!("Watchdog: subscribe failed ({})", ret);
            return false;
        }
    }
    true
}

#[cfg(not(target_os = "espidf"))]
fn subscribe(timeout_ms: u32) -> bool {
    log::debug!("Watchdog(sim): {}ms, not armed", timeout_ms);
    false
}

#[cfg(target_os = "espidf")]
fn reset() {
    // SAFETY: only reached after a successful esp_task_wdt_add.
    unsafe {
        esp_task_wdt_reset();
    }
}

#[cfg(not(target_os = "espidf"))]
fn reset() {}
