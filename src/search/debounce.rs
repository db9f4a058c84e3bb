use std::time::Duration;

use tokio::time::Instant;

// Deadlines past this horizon are clamped to it.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Single-slot pending register. A new value replaces whatever is pending
/// and restarts the quiet period; a poll past the deadline consumes it.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Clone, Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn push(&mut self, value: T, now: Instant) {
        if self.pending.is_some() {
            log::trace!("debounce: superseding pending value");
        }
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay.min(FAR_FUTURE),
        });
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending.as_ref() {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Takes the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn burst_collapses_to_last_value() {
        let base = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        for (ms, value) in [(0, "b"), (50, "bo"), (100, "bob"), (150, "bob ")] {
            d.push(value, at(base, ms));
            assert_eq!(d.poll(at(base, ms)), None);
        }
        assert_eq!(d.deadline(), Some(at(base, 450)));
        assert_eq!(d.poll(at(base, 449)), None);
        assert_eq!(d.poll(at(base, 450)), Some("bob "));
        assert_eq!(d.poll(at(base, 900)), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn cancel_and_flush_empty_the_slot() {
        let base = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.push(1, base);
        d.cancel();
        assert_eq!(d.poll(at(base, 1000)), None);
        d.push(2, base);
        assert_eq!(d.flush(), Some(2));
        assert_eq!(d.flush(), None);
    }

    #[test]
    fn huge_delay_is_clamped() {
        let base = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(u64::MAX));
        d.push("x", base);
        assert_eq!(d.deadline(), Some(base + FAR_FUTURE));
        assert_eq!(d.poll(at(base, 1_000)), None);
    }

    #[test]
    fn zero_delay_fires_immediately() {
        let base = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.push("x", base);
        assert_eq!(d.poll(base), Some("x"));
    }
}
