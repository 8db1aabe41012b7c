//! Foundation module - Core utilities and types
//!
//! This module provides the low-level pieces the startup protocol is built on:
//! - One-shot barrier used for both startup handshakes
//! - Tick pacing
//! - Logging utilities

pub mod barrier;
pub mod time;
pub mod logging;

pub use barrier::Barrier;
pub use time::TickTimer;
