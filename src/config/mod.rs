//! Application configuration.

mod settings;

pub use settings::{AppConfig, FetchConfig, TimingConfig};
