//! Shared test support: a platform that records every call it receives

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

use window_handoff::platform::{
    DisplayMode, EventHandler, EventKind, Platform, PlatformError, WindowEvent,
};
use window_handoff::prelude::*;
use window_handoff::BootstrapError;

/// Everything the recording platform saw, readable from the test thread
#[derive(Default)]
pub struct PlatformLog {
    pub init_calls: AtomicUsize,
    pub window_creations: AtomicUsize,
    pub registrations: Mutex<Vec<EventKind>>,
    pub alerts: Mutex<Vec<String>>,
    pub event_loop_entered: AtomicBool,
    pub ready_at_event_loop: Mutex<Option<bool>>,
    pub call_threads: Mutex<Vec<ThreadId>>,
    pub readiness_probe: OnceLock<ShowHandle>,
}

impl PlatformLog {
    pub fn window_creations(&self) -> usize {
        self.window_creations.load(Ordering::SeqCst)
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn event_loop_entered(&self) -> bool {
        self.event_loop_entered.load(Ordering::SeqCst)
    }

    pub fn registrations(&self) -> Vec<EventKind> {
        self.registrations.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn call_threads(&self) -> Vec<ThreadId> {
        self.call_threads.lock().unwrap().clone()
    }

    fn record_call(&self) {
        self.call_threads.lock().unwrap().push(thread::current().id());
    }
}

/// Mock platform
pub struct RecordingPlatform {
    log: Arc<PlatformLog>,
    mode_possible: bool,
    probe_fails: bool,
    wheel_supported: bool,
    framebuffer_objects: bool,
    handlers: HashMap<EventKind, Arc<dyn EventHandler>>,
}

impl RecordingPlatform {
    pub fn new() -> (Self, Arc<PlatformLog>) {
        let log = Arc::new(PlatformLog::default());
        let platform = Self {
            log: Arc::clone(&log),
            mode_possible: true,
            probe_fails: false,
            wheel_supported: true,
            framebuffer_objects: true,
            handlers: HashMap::new(),
        };
        (platform, log)
    }

    pub fn with_impossible_mode(mut self) -> Self {
        self.mode_possible = false;
        self
    }

    pub fn with_failing_probe(mut self) -> Self {
        self.probe_fails = true;
        self
    }

    pub fn without_wheel(mut self) -> Self {
        self.wheel_supported = false;
        self
    }
}

impl Platform for RecordingPlatform {
    fn name(&self) -> &str {
        "recording"
    }

    fn init(&mut self) -> Result<(), PlatformError> {
        self.log.record_call();
        self.log.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set_display_mode(&mut self, _mode: DisplayMode, _width: u32, _height: u32) {
        self.log.record_call();
    }

    fn display_mode_possible(&self) -> bool {
        self.log.record_call();
        self.mode_possible
    }

    fn create_window(&mut self, _title: &str) -> Result<(), PlatformError> {
        self.log.record_call();
        self.log.window_creations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn probe_extensions(&mut self) -> Result<(), PlatformError> {
        self.log.record_call();
        if self.probe_fails {
            Err(PlatformError::ExtensionProbeFailed("no extension loader".to_string()))
        } else {
            Ok(())
        }
    }

    fn extension_supported(&self, _name: &str) -> bool {
        self.log.record_call();
        self.framebuffer_objects
    }

    fn alert(&mut self, message: &str) {
        self.log.record_call();
        self.log.alerts.lock().unwrap().push(message.to_string());
    }

    fn supports_event(&self, kind: EventKind) -> bool {
        kind != EventKind::MouseWheel || self.wheel_supported
    }

    fn register_callback(
        &mut self,
        kind: EventKind,
        handler: Arc<dyn EventHandler>,
    ) -> Result<(), PlatformError> {
        self.log.record_call();
        self.log.registrations.lock().unwrap().push(kind);
        self.handlers.insert(kind, handler);
        Ok(())
    }

    fn run_event_loop(&mut self) -> ! {
        self.log.record_call();
        let ready = self.log.readiness_probe.get().map(ShowHandle::is_windowing_up);
        *self.log.ready_at_event_loop.lock().unwrap() = ready;
        self.log.event_loop_entered.store(true, Ordering::SeqCst);

        if let Some(handler) = self.handlers.get(&EventKind::Display) {
            handler.handle(&WindowEvent::Display);
        }
        loop {
            thread::park();
        }
    }
}

/// Fatal handler for tests: unwind the primary thread instead of exiting
pub fn panic_on_fatal(error: &BootstrapError) -> ! {
    panic!("fatal bootstrap error: {error}");
}

/// Run presetup and start_application_thread on a fresh "primary" thread
///
/// Returns the primary thread's join handle and a receiver that yields the
/// coordinator's handle right after presetup.
pub fn spawn_primary<F>(
    config: StartupConfig,
    platform: RecordingPlatform,
    events: Arc<dyn EventHandler>,
    app: F,
) -> (JoinHandle<()>, Receiver<ShowHandle>)
where
    F: FnOnce(ShowHandle) + Send + 'static,
{
    let (handle_tx, handle_rx) = mpsc::channel();
    let log = Arc::clone(&platform.log);
    let primary = thread::Builder::new()
        .name("primary".to_string())
        .spawn(move || {
            let coordinator =
                Coordinator::presetup_with_fatal_handler(&config, platform, events, panic_on_fatal);
            let handle = coordinator.handle();
            let _ = log.readiness_probe.set(handle.clone());
            handle_tx.send(handle).unwrap();
            match coordinator.start_application_thread(app) {
                Ok(never) => match never {},
                Err(e) => panic!("{e}"),
            }
        })
        .unwrap();
    (primary, handle_rx)
}

/// Poll `condition` until it holds or `timeout` passes
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

/// Event handler that counts events per kind
#[derive(Default)]
pub struct CountingEvents {
    counts: Mutex<HashMap<EventKind, usize>>,
}

impl CountingEvents {
    pub fn count(&self, kind: EventKind) -> usize {
        self.counts.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }
}

impl EventHandler for CountingEvents {
    fn handle(&self, event: &WindowEvent) {
        *self.counts.lock().unwrap().entry(event.kind()).or_default() += 1;
    }
}
