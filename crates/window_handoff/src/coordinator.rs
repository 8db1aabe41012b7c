//! Primary/application thread coordinator
//!
//! The windowing library may only be driven from the primary thread, while
//! application logic must start running right away. The coordinator decides
//! once, from [`StartupConfig::defer_start`], which of two paths to take:
//!
//! ```text
//! immediate: presetup ── bootstrap ── spawn app ── event loop
//!
//! deferred:  spawn app ── wait(start) ·········· bootstrap ── signal(request) ── event loop
//!                 │                     ▲                          │
//!                 └─ app ... request_show: signal(start), wait(request) ◄┘
//! ```
//!
//! In deferred mode an application that never calls
//! [`ShowHandle::request_show`] runs headless: the primary thread stays parked
//! and no window is ever created.

use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::thread;

use thiserror::Error;

use crate::bootstrap::{initialize_windowing, BootstrapError, Capabilities};
use crate::core::config::{StartupConfig, StartupMode, WindowConfig};
use crate::foundation::Barrier;
use crate::platform::{EventHandler, Platform};

/// Name given to the spawned application thread
pub const APPLICATION_THREAD_NAME: &str = "application";

/// Called with a bootstrap failure; must not return
pub type FatalHandler = fn(&BootstrapError) -> !;

/// Default [`FatalHandler`]: log and terminate the process
pub fn exit_on_fatal(error: &BootstrapError) -> ! {
    log::error!("Windowing bootstrap failed: {error}");
    eprintln!("fatal: {error}");
    std::process::exit(1);
}

/// Coordinator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CoordinatorState {
    /// Nothing has happened yet
    NotStarted = 0,
    /// Immediate mode: the primary thread is bootstrapping before the app starts
    BootstrappingImmediate = 1,
    /// Deferred mode: the primary thread is parked until a show request
    WaitingForShowRequest = 2,
    /// Deferred mode: a show request woke the primary thread, bootstrap in progress
    BootstrappingDeferred = 3,
    /// The event loop owns the primary thread for good
    EventLoopRunning = 4,
}

impl CoordinatorState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::BootstrappingImmediate,
            2 => Self::WaitingForShowRequest,
            3 => Self::BootstrappingDeferred,
            4 => Self::EventLoopRunning,
            _ => Self::NotStarted,
        }
    }
}

/// Coordinator API errors
#[derive(Error, Debug)]
pub enum CoordinatorError {
    /// The process-wide coordinator was already set up
    #[error("Coordinator already initialized for this process")]
    AlreadyInitialized,

    /// The application thread could not be spawned
    #[error("Failed to spawn application thread: {0}")]
    SpawnFailed(#[from] std::io::Error),
}

/// State shared between the primary and application threads
///
/// `windowing_started` and `pending_initializer` are the only cross-thread
/// mutable state of the protocol.
struct Shared {
    mode: StartupMode,
    windowing_started: AtomicBool,
    state: AtomicU8,
    start_barrier: Barrier,
    pending_initializer: Mutex<Option<Arc<Barrier>>>,
    capabilities: OnceLock<Capabilities>,
    bootstrap_count: AtomicUsize,
}

impl Shared {
    fn new(mode: StartupMode) -> Self {
        Self {
            mode,
            windowing_started: AtomicBool::new(false),
            state: AtomicU8::new(CoordinatorState::NotStarted as u8),
            start_barrier: Barrier::new(),
            pending_initializer: Mutex::new(None),
            capabilities: OnceLock::new(),
            bootstrap_count: AtomicUsize::new(0),
        }
    }

    fn set_state(&self, state: CoordinatorState) {
        log::debug!("Coordinator -> {state:?}");
        self.state.store(state as u8, Ordering::Release);
    }

    fn pending(&self) -> MutexGuard<'_, Option<Arc<Barrier>>> {
        self.pending_initializer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish readiness, then release a waiting show request if there is one
    fn mark_started(&self, capabilities: Capabilities) {
        let _ = self.capabilities.set(capabilities);
        self.windowing_started.store(true, Ordering::Release);

        if let Some(initializer) = self.pending().take() {
            initializer.signal();
        }
    }
}

/// Thread-safe handle to the coordinator, given to the application thread
///
/// This is the application's only way to influence the windowing side: it can
/// ask for the window to be shown and check whether it exists.
#[derive(Clone)]
pub struct ShowHandle {
    shared: Arc<Shared>,
}

impl ShowHandle {
    /// Ask the primary thread to create the window and wait until it exists
    ///
    /// The first call performs the handshake with the parked primary thread;
    /// once the window exists every call returns immediately. Must not be
    /// called from the primary thread itself.
    pub fn request_show(&self) {
        if self.is_windowing_up() {
            return;
        }

        let initializer = {
            let mut pending = self.shared.pending();
            // Bootstrap may have finished while we waited for the lock.
            if self.is_windowing_up() {
                return;
            }
            Arc::clone(pending.get_or_insert_with(|| Arc::new(Barrier::new())))
        };

        log::info!("Window requested, waking primary thread");
        self.shared.start_barrier.signal();
        initializer.wait();
        log::debug!("Window request completed");
    }

    /// Whether the window has been created; never blocks
    pub fn is_windowing_up(&self) -> bool {
        self.shared.windowing_started.load(Ordering::Acquire)
    }

    /// Startup mode the coordinator was configured with
    pub fn mode(&self) -> StartupMode {
        self.shared.mode
    }

    /// Current coordinator state
    pub fn state(&self) -> CoordinatorState {
        CoordinatorState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    /// Capabilities found by bootstrap, once the window exists
    pub fn capabilities(&self) -> Option<Capabilities> {
        self.shared.capabilities.get().copied()
    }

    /// How many times bootstrap has run (0 or 1)
    pub fn bootstrap_count(&self) -> usize {
        self.shared.bootstrap_count.load(Ordering::Acquire)
    }
}

impl fmt::Debug for ShowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShowHandle")
            .field("mode", &self.mode())
            .field("state", &self.state())
            .field("windowing_up", &self.is_windowing_up())
            .finish()
    }
}

/// Primary-thread side of the coordinator
///
/// Owns the platform. It is created by [`Coordinator::presetup`] on the
/// primary thread and consumed by [`Coordinator::start_application_thread`],
/// which never hands the platform to another thread.
pub struct Coordinator<P: Platform> {
    shared: Arc<Shared>,
    platform: P,
    window: WindowConfig,
    events: Arc<dyn EventHandler>,
    on_fatal: FatalHandler,
}

impl<P: Platform> Coordinator<P> {
    /// Read the startup mode and, in immediate mode, bootstrap right away
    ///
    /// Must run on the primary thread before any other thread is spawned.
    /// A bootstrap failure terminates the process.
    pub fn presetup(config: &StartupConfig, platform: P, events: Arc<dyn EventHandler>) -> Self {
        Self::presetup_with_fatal_handler(config, platform, events, exit_on_fatal)
    }

    /// Like [`presetup`](Self::presetup) with a custom fatal failure handler
    pub fn presetup_with_fatal_handler(
        config: &StartupConfig,
        platform: P,
        events: Arc<dyn EventHandler>,
        on_fatal: FatalHandler,
    ) -> Self {
        let mut coordinator = Self::new(config, platform, events, on_fatal);
        coordinator.presetup_bootstrap();
        coordinator
    }

    fn new(
        config: &StartupConfig,
        platform: P,
        events: Arc<dyn EventHandler>,
        on_fatal: FatalHandler,
    ) -> Self {
        let mode = config.mode();
        log::info!("Startup mode: {mode:?}");
        Self {
            shared: Arc::new(Shared::new(mode)),
            platform,
            window: config.window.clone(),
            events,
            on_fatal,
        }
    }

    fn presetup_bootstrap(&mut self) {
        if self.shared.mode == StartupMode::Immediate {
            self.shared.set_state(CoordinatorState::BootstrappingImmediate);
            self.bootstrap();
        }
    }

    /// Handle for querying readiness and requesting the window
    pub fn handle(&self) -> ShowHandle {
        ShowHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Startup mode read by `presetup`
    pub fn mode(&self) -> StartupMode {
        self.shared.mode
    }

    /// Spawn the application thread and give the primary thread to the windowing side
    ///
    /// `app` runs once on a new thread and receives a [`ShowHandle`]. This
    /// call only returns if the thread cannot be spawned; otherwise the
    /// primary thread ends up in the event loop (or parked forever in
    /// deferred mode without a show request).
    pub fn start_application_thread<F>(mut self, app: F) -> Result<Infallible, CoordinatorError>
    where
        F: FnOnce(ShowHandle) + Send + 'static,
    {
        let handle = self.handle();
        thread::Builder::new()
            .name(APPLICATION_THREAD_NAME.to_string())
            .spawn(move || app(handle))?;
        log::debug!("Application thread started");

        if !self.shared.windowing_started.load(Ordering::Acquire) {
            self.shared.set_state(CoordinatorState::WaitingForShowRequest);
            self.shared.start_barrier.wait();

            self.shared.set_state(CoordinatorState::BootstrappingDeferred);
            self.bootstrap();
        }

        self.shared.set_state(CoordinatorState::EventLoopRunning);
        log::info!("Entering event loop");
        self.platform.run_event_loop()
    }

    fn bootstrap(&mut self) {
        if self.shared.windowing_started.load(Ordering::Acquire) {
            return;
        }
        self.shared.bootstrap_count.fetch_add(1, Ordering::AcqRel);

        match initialize_windowing(&mut self.platform, &self.window, &self.events) {
            Ok(capabilities) => {
                self.shared.mark_started(capabilities);
                log::info!("Windowing is up");
            }
            Err(e) => (self.on_fatal)(&e),
        }
    }
}

static GLOBAL_HANDLE: OnceLock<ShowHandle> = OnceLock::new();

/// Process-wide [`Coordinator::presetup`]
///
/// Installs the coordinator behind [`request_show`] and [`is_windowing_up`].
/// Only one coordinator may be installed per process.
pub fn presetup<P: Platform>(
    config: &StartupConfig,
    platform: P,
    events: Arc<dyn EventHandler>,
) -> Result<Coordinator<P>, CoordinatorError> {
    let mut coordinator = Coordinator::new(config, platform, events, exit_on_fatal);
    GLOBAL_HANDLE
        .set(coordinator.handle())
        .map_err(|_| CoordinatorError::AlreadyInitialized)?;
    coordinator.presetup_bootstrap();
    Ok(coordinator)
}

/// Process-wide [`ShowHandle::request_show`]
///
/// Returns immediately, with a warning, if [`presetup`] was never called.
pub fn request_show() {
    match GLOBAL_HANDLE.get() {
        Some(handle) => handle.request_show(),
        None => log::warn!("request_show called before presetup; ignoring"),
    }
}

/// Process-wide [`ShowHandle::is_windowing_up`]
pub fn is_windowing_up() -> bool {
    GLOBAL_HANDLE.get().is_some_and(ShowHandle::is_windowing_up)
}

/// Handle to the process-wide coordinator, if installed
pub fn global_handle() -> Option<ShowHandle> {
    GLOBAL_HANDLE.get().cloned()
}
