//! Cancelable, restartable timer for coalescing bursts of input.
//!
//! Each [`Debouncer::schedule`] call aborts the pending timer and starts a new
//! one. When a timer fires it sends an event tagged with its generation; the
//! receiver checks [`Debouncer::complete`] so a timer that raced a newer
//! schedule is ignored.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            handle: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the timer. After `delay` with no further calls, `make_event`
    /// is invoked with this schedule's generation and the result is sent.
    pub fn schedule<T, F>(&mut self, tx: &mpsc::Sender<T>, make_event: F)
    where
        T: Send + 'static,
        F: FnOnce(u64) -> T + Send + 'static,
    {
        self.cancel();
        let generation = self.generation;
        let delay = self.delay;
        let tx = tx.clone();

        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(make_event(generation)).await;
        }));
    }

    /// Abort any pending timer. Its event, if already queued, becomes stale.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Called by the receiver when an event arrives. Returns `true` if the
    /// event belongs to the latest schedule (and marks the timer finished).
    pub fn complete(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.handle = None;
        true
    }

    /// True while a timer is scheduled and has not been completed.
    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.schedule(&tx, |g| g);
        assert!(debouncer.is_pending());

        tokio::time::advance(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::advance(Duration::from_millis(2)).await;
        let generation = rx.recv().await.unwrap();
        assert!(debouncer.complete(generation));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_to_one_event() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        for _ in 0..5 {
            debouncer.schedule(&tx, |g| g);
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        tokio::time::advance(Duration::from_millis(300)).await;

        let generation = rx.recv().await.unwrap();
        assert!(debouncer.complete(generation));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_event() {
        let (tx, mut rx) = mpsc::channel::<u64>(8);
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.schedule(&tx, |g| g);
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        tokio::time::advance(Duration::from_secs(1)).await;
        drop(tx);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_stale_generation_rejected() {
        let mut debouncer = Debouncer::default();
        let stale = debouncer.generation;
        debouncer.cancel();
        assert!(!debouncer.complete(stale));
        assert_eq!(debouncer.delay(), DEFAULT_SEARCH_DEBOUNCE);
    }
}
