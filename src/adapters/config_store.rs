//! Volatile configuration store.
//!
//! Implements [`ConfigPort`] without any backing storage: `load` hands
//! back the boot configuration and `save` validates, logs, and drops the
//! data. Tank settings therefore reset on every power cycle.

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SystemConfig;

pub struct VolatileConfigStore {
    boot: SystemConfig,
}

impl Default for VolatileConfigStore {
    fn default() -> Self {
        Self::new(SystemConfig::default())
    }
}

impl VolatileConfigStore {
    pub fn new(boot: SystemConfig) -> Self {
        Self { boot }
    }
}

impl ConfigPort for VolatileConfigStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        self.boot.validate()?;
        Ok(self.boot.clone())
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        info!(
            "config: accepted (not persisted) capacity={}L max={:.2}",
            config.tank.capacity_liters, config.tank.max_distance
        );
        Ok(())
    }
}
