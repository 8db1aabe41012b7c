//! # Core Module
//!
//! Shared configuration types used by the bootstrap and the coordinator.

pub mod config;

pub use config::{
    Config,
    ConfigError,
    StartupConfig,
    StartupMode,
    WindowConfig,
};
