use std::time::{Duration, Instant};
use tracing::info;

/// Wall-clock timer that logs when it starts and when it is dropped.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self { label, start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!("⏱  Finished: {} (took {:.2?})", self.label, self.elapsed());
    }
}

/// Turn a free-text search term into a URL path segment.
/// "automazione industriale" → "automazione-industriale"
pub fn path_segment(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("-")
}
