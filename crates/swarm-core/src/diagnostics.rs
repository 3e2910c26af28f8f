//! Diagnostic events and the sinks that print or record them.
//!
//! Launches and lock operations describe what happened as an [`Event`].
//! Events only reach the sink while diagnostics are enabled through
//! [`Runtime::activate_logs`](crate::Runtime::activate_logs).

use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Prefix printed in front of every console line
pub const PREFIX: &str = "[SWARM]";

/// Something worth reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Diagnostics were switched on for the first time
    Banner,
    /// A mutex was locked
    EnterCritical(String),
    /// A mutex is about to be unlocked
    LeaveCritical(String),
    /// A semaphore permit was acquired
    EnterSemaphore(String),
    /// A semaphore permit is about to be released
    LeaveSemaphore(String),
    /// A launch drained every completion signal
    Done(String),
    /// A unit of a launch reported failure
    Failed(String),
}

impl Event {
    /// Console color for this event
    pub fn color(&self) -> Color {
        match self {
            Event::Banner => Color::Cyan,
            Event::EnterCritical(_)
            | Event::LeaveCritical(_)
            | Event::EnterSemaphore(_)
            | Event::LeaveSemaphore(_) => Color::Yellow,
            Event::Done(_) => Color::Green,
            Event::Failed(_) => Color::Red,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Banner => write!(f, "{} v{}", PREFIX, env!("CARGO_PKG_VERSION")),
            Event::EnterCritical(key) => write!(f, "{} IN CRITICAL SECTION : {}", PREFIX, key),
            Event::LeaveCritical(key) => write!(f, "{} OUT CRITICAL SECTION : {}", PREFIX, key),
            Event::EnterSemaphore(key) => write!(f, "{} IN SEM SECTION : {}", PREFIX, key),
            Event::LeaveSemaphore(key) => write!(f, "{} OUT SEM SECTION : {}", PREFIX, key),
            Event::Done(label) => write!(f, "{} SYNCHRO DONE : {}", PREFIX, label),
            Event::Failed(label) => write!(f, "{} ERROR : {}", PREFIX, label),
        }
    }
}

/// Destination for diagnostic events
pub trait DiagnosticSink: Send + Sync {
    /// Handle one event
    fn emit(&self, event: &Event);
}

/// Writes colored lines to stdout.
pub struct ConsoleSink {
    stdout: Mutex<StandardStream>,
}

impl ConsoleSink {
    /// Create a console sink. `NO_COLOR` in the environment wins over `choice`.
    pub fn new(choice: ColorChoice) -> Self {
        let choice = if std::env::var_os("NO_COLOR").is_some() {
            ColorChoice::Never
        } else {
            choice
        };
        Self {
            stdout: Mutex::new(StandardStream::stdout(choice)),
        }
    }
}

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, event: &Event) {
        let mut stdout = self.stdout.lock();
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(event.color()));
        // A closed or broken stdout must not take a worker down with it.
        let _ = stdout.set_color(&spec);
        let _ = writeln!(stdout, "{}", event);
        if *event == Event::Banner {
            let _ = writeln!(stdout);
        }
        let _ = stdout.reset();
        let _ = stdout.flush();
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Number of recorded events equal to `event`
    pub fn count(&self, event: &Event) -> usize {
        self.events.lock().iter().filter(|e| *e == event).count()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, event: &Event) {
        self.events.lock().push(event.clone());
    }
}

/// On/off switch in front of a sink
pub(crate) struct Diagnostics {
    enabled: AtomicBool,
    banner_shown: AtomicBool,
    sink: Arc<dyn DiagnosticSink>,
}

impl Diagnostics {
    pub(crate) fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            banner_shown: AtomicBool::new(false),
            sink,
        }
    }

    /// Enable or disable emission. The banner goes out once per sink.
    pub(crate) fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        if enabled && !self.banner_shown.swap(true, Ordering::AcqRel) {
            self.sink.emit(&Event::Banner);
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub(crate) fn emit(&self, event: Event) {
        if self.is_enabled() {
            self.sink.emit(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording() -> (Arc<MemorySink>, Diagnostics) {
        let sink = Arc::new(MemorySink::new());
        let diagnostics = Diagnostics::new(sink.clone());
        (sink, diagnostics)
    }

    #[test]
    fn test_disabled_by_default() {
        let (sink, diagnostics) = recording();

        assert!(!diagnostics.is_enabled());
        diagnostics.emit(Event::Done("pool".to_string()));
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_banner_emitted_once() {
        let (sink, diagnostics) = recording();

        diagnostics.set_enabled(true);
        diagnostics.set_enabled(false);
        diagnostics.set_enabled(true);

        assert_eq!(sink.count(&Event::Banner), 1);
        assert!(diagnostics.is_enabled());
    }

    #[test]
    fn test_events_follow_switch() {
        let (sink, diagnostics) = recording();

        diagnostics.set_enabled(true);
        diagnostics.emit(Event::Failed("pool".to_string()));
        diagnostics.set_enabled(false);
        diagnostics.emit(Event::Failed("pool".to_string()));

        assert_eq!(
            sink.events(),
            vec![Event::Banner, Event::Failed("pool".to_string())]
        );
    }

    #[test]
    fn test_event_lines() {
        assert_eq!(
            Event::Done("WorkerPool".to_string()).to_string(),
            "[SWARM] SYNCHRO DONE : WorkerPool"
        );
        assert_eq!(
            Event::Failed("Promise Then".to_string()).to_string(),
            "[SWARM] ERROR : Promise Then"
        );
        assert_eq!(
            Event::EnterCritical("m".to_string()).to_string(),
            "[SWARM] IN CRITICAL SECTION : m"
        );
        assert!(Event::Banner.to_string().starts_with("[SWARM] v"));
    }

    #[test]
    fn test_event_colors() {
        assert_eq!(Event::Banner.color(), Color::Cyan);
        assert_eq!(Event::LeaveSemaphore("s".to_string()).color(), Color::Yellow);
        assert_eq!(Event::Done("x".to_string()).color(), Color::Green);
        assert_eq!(Event::Failed("x".to_string()).color(), Color::Red);
    }

    #[test]
    fn test_memory_sink_clear() {
        let sink = MemorySink::new();
        sink.emit(&Event::Banner);
        assert_eq!(sink.events().len(), 1);

        sink.clear();
        assert!(sink.events().is_empty());
    }
}
