/// Run Reporting Module
///
/// The host runtime observes the engine through one narrow sink: a method
/// for failure messages and a method for one-line trace messages emitted on
/// success. The engine only produces the message strings; delivery,
/// formatting, and any recovery policy belong to the host behind the sink.
use std::sync::Mutex;
use tracing::{error, info};

pub trait RunReporter {
    /// Delivers a failure message.
    fn report_error(&self, message: &str);

    /// Delivers a one-line trace message for a successful operation.
    fn trace(&self, message: &str);
}

/// Forwards every message to the active tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl RunReporter for TracingReporter {
    fn report_error(&self, message: &str) {
        error!(target: "simql::run", "{}", message);
    }

    fn trace(&self, message: &str) {
        info!(target: "simql::run", "{}", message);
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl RunReporter for NullReporter {
    fn report_error(&self, _message: &str) {}

    fn trace(&self, _message: &str) {}
}

/// Buffers messages in memory for hosts that collect diagnostics and
/// deliver them out-of-band.
#[derive(Debug, Default)]
pub struct BufferedReporter {
    errors: Mutex<Vec<String>>,
    traces: Mutex<Vec<String>>,
}

impl BufferedReporter {
    pub fn new() -> Self {
        BufferedReporter::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn traces(&self) -> Vec<String> {
        self.traces.lock().unwrap().clone()
    }
}

impl RunReporter for BufferedReporter {
    fn report_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn trace(&self, message: &str) {
        self.traces.lock().unwrap().push(message.to_string());
    }
}
