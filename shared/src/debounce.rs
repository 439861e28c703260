use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Generation-counting debouncer. The caller owns the timer; the debouncer
/// only decides whether a fired timer or a late response still matters.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Supersedes every earlier ticket.
    pub fn schedule(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_schedule_supersedes() {
        let d = Debouncer::new(Duration::from_millis(500));
        let first = d.schedule();
        assert!(d.is_current(first));

        let second = d.schedule();
        assert!(!d.is_current(first));
        assert!(d.is_current(second));
    }

    #[test]
    fn clones_share_generation() {
        let d = Debouncer::new(Duration::from_millis(10));
        let handle = d.clone();
        let t = d.schedule();
        handle.schedule();
        assert!(!d.is_current(t));
        assert_eq!(handle.delay(), Duration::from_millis(10));
    }
}
