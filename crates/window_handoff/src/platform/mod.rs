//! Windowing platform abstraction
//!
//! The windowing library is an external collaborator that may only be touched
//! from the primary thread. This module defines the contract the bootstrap and
//! the event loop need from it, and nothing more:
//!
//! ```text
//! ┌─────────────────────────────────┐
//! │  Coordinator (primary thread)   │
//! └─────────────┬───────────────────┘
//!               │ owns
//!      ┌────────▼────────┐
//!      │ Platform trait  │ ← this module
//!      └────────┬────────┘
//!               │ implemented by
//!   ┌───────────▼───────────┐
//!   │ HeadlessPlatform      │ ← virtual window, always available
//!   │ GlfwPlatform          │ ← `glfw` feature
//!   └───────────────────────┘
//! ```
//!
//! A platform value is owned by the coordinator and never handed to the
//! application thread, so implementations do not need to be `Send`.

pub mod headless;
#[cfg(feature = "glfw")]
pub mod glfw_backend;

pub use headless::HeadlessPlatform;
#[cfg(feature = "glfw")]
pub use glfw_backend::GlfwPlatform;

use bitflags::bitflags;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::config::WindowConfig;

/// Name of the optional extension that enables the framebuffer-object path
pub const FRAMEBUFFER_OBJECT_EXTENSION: &str = "GL_EXT_framebuffer_object";

/// Tick period used by platforms that deliver ticks from a timer
pub const TIMER_TICK_INTERVAL: Duration = Duration::from_millis(8);

bitflags! {
    /// Framebuffer properties requested from the platform
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DisplayMode: u32 {
        /// True-color framebuffer
        const RGB = 1 << 0;
        /// Double buffering
        const DOUBLE = 1 << 1;
        /// Depth buffer
        const DEPTH = 1 << 2;
        /// Multisampled framebuffer
        const MULTISAMPLE = 1 << 3;
    }
}

impl DisplayMode {
    /// The mode requested for a window configuration
    pub fn for_window(window: &WindowConfig) -> Self {
        let mut mode = Self::RGB | Self::DOUBLE | Self::DEPTH;
        if window.multisample {
            mode |= Self::MULTISAMPLE;
        }
        mode
    }
}

/// How the platform delivers the periodic tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// A platform timer firing at a fixed period
    Timer(Duration),
    /// An idle callback invoked whenever no other event is pending
    Idle,
}

impl TickSource {
    /// Timer on the Windows family, idle callback elsewhere
    pub fn for_current_platform() -> Self {
        if cfg!(windows) {
            Self::Timer(TIMER_TICK_INTERVAL)
        } else {
            Self::Idle
        }
    }
}

/// Kinds of events a callback can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Window contents need repainting
    Display,
    /// Periodic tick
    Tick,
    /// Character key pressed
    Keyboard,
    /// Character key released
    KeyboardUp,
    /// Non-character key pressed (arrows, function keys, ...)
    Special,
    /// Non-character key released
    SpecialUp,
    /// Mouse button pressed or released
    Mouse,
    /// Pointer moved with a button held
    Motion,
    /// Pointer moved with no button held
    PassiveMotion,
    /// Window resized
    Reshape,
    /// Mouse wheel turned
    MouseWheel,
}

impl EventKind {
    /// Every kind, in registration order
    pub const ALL: [Self; 11] = [
        Self::Display,
        Self::Tick,
        Self::Keyboard,
        Self::KeyboardUp,
        Self::Special,
        Self::SpecialUp,
        Self::Mouse,
        Self::Motion,
        Self::PassiveMotion,
        Self::Reshape,
        Self::MouseWheel,
    ];
}

/// Mouse button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Pressed
    Down,
    /// Released
    Up,
}

/// An event delivered by the platform's event loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    /// Window contents need repainting
    Display,
    /// Periodic tick
    Tick,
    /// Character key pressed at pointer position
    Keyboard {
        /// Key character
        key: u8,
        /// Pointer X
        x: i32,
        /// Pointer Y
        y: i32,
    },
    /// Character key released
    KeyboardUp {
        /// Key character
        key: u8,
        /// Pointer X
        x: i32,
        /// Pointer Y
        y: i32,
    },
    /// Non-character key pressed
    Special {
        /// Platform key code
        key: i32,
        /// Pointer X
        x: i32,
        /// Pointer Y
        y: i32,
    },
    /// Non-character key released
    SpecialUp {
        /// Platform key code
        key: i32,
        /// Pointer X
        x: i32,
        /// Pointer Y
        y: i32,
    },
    /// Mouse button transition
    Mouse {
        /// Platform button index
        button: i32,
        /// Pressed or released
        state: ButtonState,
        /// Pointer X
        x: i32,
        /// Pointer Y
        y: i32,
    },
    /// Pointer moved with a button held
    Motion {
        /// Pointer X
        x: i32,
        /// Pointer Y
        y: i32,
    },
    /// Pointer moved with no button held
    PassiveMotion {
        /// Pointer X
        x: i32,
        /// Pointer Y
        y: i32,
    },
    /// Window resized
    Reshape {
        /// New client width
        width: u32,
        /// New client height
        height: u32,
    },
    /// Mouse wheel turned
    MouseWheel {
        /// Wheel index
        wheel: i32,
        /// +1 away from the user, -1 towards
        direction: i32,
        /// Pointer X
        x: i32,
        /// Pointer Y
        y: i32,
    },
}

impl WindowEvent {
    /// The registration kind this event is routed by
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Display => EventKind::Display,
            Self::Tick => EventKind::Tick,
            Self::Keyboard { .. } => EventKind::Keyboard,
            Self::KeyboardUp { .. } => EventKind::KeyboardUp,
            Self::Special { .. } => EventKind::Special,
            Self::SpecialUp { .. } => EventKind::SpecialUp,
            Self::Mouse { .. } => EventKind::Mouse,
            Self::Motion { .. } => EventKind::Motion,
            Self::PassiveMotion { .. } => EventKind::PassiveMotion,
            Self::Reshape { .. } => EventKind::Reshape,
            Self::MouseWheel { .. } => EventKind::MouseWheel,
        }
    }
}

/// Callback target invoked by the event loop
///
/// Handlers run on the primary thread. They usually fill in state (key
/// tables, window size, ...) that application logic reads from its own thread,
/// hence `Send + Sync`.
pub trait EventHandler: Send + Sync {
    /// Handle one event
    fn handle(&self, event: &WindowEvent);
}

impl<F> EventHandler for F
where
    F: Fn(&WindowEvent) + Send + Sync,
{
    fn handle(&self, event: &WindowEvent) {
        self(event);
    }
}

/// Handler that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreEvents;

impl EventHandler for IgnoreEvents {
    fn handle(&self, _event: &WindowEvent) {}
}

/// Errors reported by a platform implementation
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The windowing library could not be initialized
    #[error("Platform initialization failed: {0}")]
    InitializationFailed(String),

    /// Window creation failed
    #[error("Window creation failed: {0}")]
    WindowCreationFailed(String),

    /// The platform refused a callback registration
    #[error("Cannot register {kind:?} callback: {reason}")]
    RegistrationFailed {
        /// Event kind being registered
        kind: EventKind,
        /// Platform-provided reason
        reason: String,
    },

    /// Loading GPU extension entry points failed
    #[error("Extension probe failed: {0}")]
    ExtensionProbeFailed(String),

    /// An operation was called out of order
    #[error("Platform not ready: {0}")]
    NotReady(&'static str),
}

/// Contract with the windowing library
///
/// Every method is called from the primary thread only. The bootstrap calls
/// them in this order: [`init`](Platform::init),
/// [`set_display_mode`](Platform::set_display_mode),
/// [`display_mode_possible`](Platform::display_mode_possible),
/// [`create_window`](Platform::create_window),
/// [`probe_extensions`](Platform::probe_extensions),
/// [`register_callback`](Platform::register_callback) per kind, and finally
/// the coordinator calls [`run_event_loop`](Platform::run_event_loop).
pub trait Platform {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Initialize the windowing library
    fn init(&mut self) -> Result<(), PlatformError>;

    /// Request framebuffer properties and the initial window size
    fn set_display_mode(&mut self, mode: DisplayMode, width: u32, height: u32);

    /// Whether the requested display mode can be satisfied
    fn display_mode_possible(&self) -> bool;

    /// Create the one window
    fn create_window(&mut self, title: &str) -> Result<(), PlatformError>;

    /// Load GPU extension entry points; failure is not fatal
    fn probe_extensions(&mut self) -> Result<(), PlatformError>;

    /// Whether a named GPU extension is available
    fn extension_supported(&self, name: &str) -> bool;

    /// Show a warning-style message to the user
    fn alert(&mut self, message: &str);

    /// Whether this platform can deliver events of `kind`
    fn supports_event(&self, kind: EventKind) -> bool {
        let _ = kind;
        true
    }

    /// How ticks are delivered on this platform
    fn tick_source(&self) -> TickSource {
        TickSource::for_current_platform()
    }

    /// Route events of `kind` to `handler`
    fn register_callback(
        &mut self,
        kind: EventKind,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), PlatformError>;

    /// Enter the blocking event loop; never returns
    fn run_event_loop(&mut self) -> !;
}
