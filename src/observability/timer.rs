//! Operation timing with a slow-operation warning

use std::fmt;
use std::time::{Duration, Instant};

use super::events::Event;

/// Operations slower than this are logged as `SLOW_OPERATION`
pub const DEFAULT_SLOW_OPERATION: Duration = Duration::from_millis(1000);

/// Times one model operation.
///
/// ```ignore
/// let timer = OperationTimer::start("apps", "find", threshold);
/// // ... run the query ...
/// timer.finish(Some(&filter));
/// ```
pub struct OperationTimer<'a> {
    collection: &'a str,
    op: &'static str,
    threshold: Duration,
    start: Instant,
}

impl<'a> OperationTimer<'a> {
    pub fn start(collection: &'a str, op: &'static str, threshold: Duration) -> Self {
        Self {
            collection,
            op,
            threshold,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stops the timer. Logs a warning and returns `true` when the operation
    /// took longer than the threshold.
    pub fn finish(self, query: Option<&dyn fmt::Display>) -> bool {
        let elapsed = self.elapsed();
        if elapsed <= self.threshold {
            return false;
        }

        let duration_ms = elapsed.as_millis() as u64;
        let query = query.map(|q| q.to_string()).unwrap_or_default();
        tracing::warn!(
            event = %Event::SlowOperation,
            collection = self.collection,
            op = self.op,
            query = %query,
            duration_ms,
            "Slow operation {}ms",
            duration_ms
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_operation_not_reported() {
        let timer = OperationTimer::start("apps", "find", Duration::from_secs(3600));
        assert!(!timer.finish(None));
    }

    #[test]
    fn test_slow_operation_reported() {
        let timer = OperationTimer::start("apps", "find", Duration::ZERO);
        std::thread::sleep(Duration::from_millis(2));
        assert!(timer.finish(Some(&"{\"teamId\":\"t1\"}")));
    }

    #[test]
    fn test_elapsed_grows() {
        let timer = OperationTimer::start("apps", "count", DEFAULT_SLOW_OPERATION);
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed() >= Duration::from_millis(5));
    }
}
