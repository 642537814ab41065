//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `hardware`     | SensorPort         | HC-SR04, LM35 ADC, buttons   |
//! |                | IndicatorPort      | LCD1602 I²C, LED bar, buzzer |
//! | `log_sink`     | EventSink          | Serial log output            |
//! | `config_store` | ConfigPort         | In-memory (not persisted)    |
//! | `time`         | (loop clock)       | esp_timer / host Instant     |

pub mod config_store;
pub mod hardware;
pub mod log_sink;
pub mod time;
