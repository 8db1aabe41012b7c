//! # Window Handoff
//!
//! Runs application logic on its own thread while the windowing library stays
//! on the primary thread, where many platforms require it to live.
//!
//! ## Features
//!
//! - **Immediate mode**: the window exists before application logic starts
//! - **Deferred mode**: application logic runs windowless until it asks for a window
//! - **Handshake**: a show request returns only once the window is up
//! - **Backends**: headless virtual window, GLFW behind the `glfw` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use window_handoff::prelude::*;
//!
//! fn main() {
//!     window_handoff::foundation::logging::init();
//!
//!     let config = StartupConfig::deferred();
//!     let coordinator = window_handoff::presetup(
//!         &config,
//!         HeadlessPlatform::new(),
//!         Arc::new(IgnoreEvents),
//!     )
//!     .expect("presetup runs once");
//!
//!     let result = coordinator.start_application_thread(|handle| {
//!         // ... windowless work ...
//!         handle.request_show();
//!         assert!(handle.is_windowing_up());
//!     });
//!     match result {
//!         Ok(never) => match never {},
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod foundation;
pub mod config;
pub mod core;
pub mod platform;
pub mod bootstrap;

mod coordinator;

pub use bootstrap::{BootstrapError, Capabilities};
pub use coordinator::{
    exit_on_fatal, global_handle, is_windowing_up, presetup, request_show, Coordinator,
    CoordinatorError, CoordinatorState, FatalHandler, ShowHandle, APPLICATION_THREAD_NAME,
};

/// Common imports for users of the coordinator
pub mod prelude {
    pub use crate::{
        Coordinator, CoordinatorError, CoordinatorState, ShowHandle,
        core::config::{StartupConfig, StartupMode, WindowConfig},
        platform::{
            EventHandler, EventKind, HeadlessPlatform, IgnoreEvents, Platform, WindowEvent,
        },
    };
}
