use crate::domain::ExtractionResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc::UnboundedSender, Notify};

/// Cooperative stop flag shared between whoever runs a scrape and whoever
/// wants it to end early. Cloning shares the same flag.
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

#[derive(Default)]
struct StopInner {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Sleep for `duration` unless stopped first. Returns `false` when the
    /// sleep was cut short.
    pub async fn sleep(&self, duration: Duration) -> bool {
        // Register interest before reading the flag so a stop that lands in
        // between is not lost.
        let notified = self.inner.notify.notified();
        if self.is_stopped() {
            return false;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => !self.is_stopped(),
            _ = notified => false,
        }
    }
}

/// Progress notifications emitted while a scrape runs.
#[derive(Debug, Clone)]
pub enum ScrapeEvent {
    PageListed {
        offset: usize,
        entries: usize,
    },
    ItemFinished {
        index: usize,
        title: String,
        result: ExtractionResult,
    },
}

/// Optional hooks a caller hands to a scrape.
#[derive(Clone, Default)]
pub struct RunControl {
    pub stop: StopSignal,
    pub events: Option<UnboundedSender<ScrapeEvent>>,
}

impl RunControl {
    pub fn new(stop: StopSignal) -> Self {
        Self { stop, events: None }
    }

    pub fn with_events(mut self, events: UnboundedSender<ScrapeEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub(crate) fn emit(&self, event: ScrapeEvent) {
        if let Some(events) = &self.events {
            // Nobody listening any more is fine.
            let _ = events.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleep_runs_to_completion_when_not_stopped() {
        let signal = StopSignal::new();
        assert!(signal.sleep(Duration::from_secs(5)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cuts_a_sleep_short() {
        let signal = StopSignal::new();
        let sleeper = signal.clone();
        let handle = tokio::spawn(async move { sleeper.sleep(Duration::from_secs(3600)).await });

        tokio::task::yield_now().await;
        signal.stop();

        assert!(!handle.await.unwrap());
        assert!(signal.is_stopped());
    }

    #[tokio::test]
    async fn already_stopped_returns_immediately() {
        let signal = StopSignal::new();
        signal.stop();
        assert!(!signal.sleep(Duration::from_secs(3600)).await);
    }
}
