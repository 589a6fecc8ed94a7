//! Timing of the phases of a command.

use std::time::{Duration, Instant};

use log::trace;

/// Records how long each named phase of a command took.
#[derive(Debug, Clone, Default)]
pub struct TimingSession {
    entries: Vec<(String, Duration)>,
}

impl TimingSession {
    /// Runs `f`, recording how long it took under the given label.
    pub fn time<L, F, T>(&mut self, label: L, f: F) -> T
    where
        L: AsRef<str>,
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let result = f();
        self.record(label, start.elapsed());
        result
    }

    /// Records an already measured duration.
    pub fn record<L: AsRef<str>>(&mut self, label: L, elapsed: Duration) {
        let label = label.as_ref();
        trace!("{} took {:?}", label, elapsed);
        self.entries.push((label.to_string(), elapsed));
    }

    pub fn entries(&self) -> &[(String, Duration)] {
        &self.entries
    }

    pub fn total(&self) -> Duration {
        self.entries.iter().map(|(_, d)| *d).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
