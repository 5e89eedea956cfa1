//! In-memory log sink for asserting on emitted events in tests

use std::io;
use std::sync::{Arc, Mutex};
use tracing::Subscriber;
use tracing::subscriber::DefaultGuard;

#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub(crate) fn text(&self) -> String {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub(crate) fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    pub(crate) fn count(&self, needle: &str) -> usize {
        self.text().matches(needle).count()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn subscriber(logs: &CapturedLogs) -> impl Subscriber + Send + Sync + 'static {
    let writer = logs.clone();
    tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish()
}

/// Run `f` with a plain-text subscriber installed on this thread and return what it logged
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
    let logs = CapturedLogs::default();
    let result = tracing::subscriber::with_default(subscriber(&logs), f);
    (result, logs)
}

/// Capture on this thread until the guard drops; pair with a current-thread runtime
pub(crate) fn capture_thread_logs() -> (DefaultGuard, CapturedLogs) {
    let logs = CapturedLogs::default();
    let guard = tracing::subscriber::set_default(subscriber(&logs));
    (guard, logs)
}
