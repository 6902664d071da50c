use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

/// Collapses bursts of triggers into a single action run: the first trigger
/// starts a quiet-period timer, every further trigger resets it, and the
/// action runs once when the period elapses with no new trigger. A new burst
/// after the action fires schedules another run.
///
/// `trigger` is cheap and synchronous; the action runs on a background task
/// and sees whatever state is current when the timer fires, not when the
/// triggers happened.
#[derive(Clone)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    pub fn new<F, Fut>(quiet: Duration, action: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        tokio::spawn(async move {
            loop {
                // Park until something triggers us.
                if rx.recv().await.is_none() {
                    return;
                }
                // Quiet period: every further trigger resets the timer.
                loop {
                    match timeout(quiet, rx.recv()).await {
                        Ok(Some(())) => continue,
                        Ok(None) => return,
                        Err(_) => break,
                    }
                }
                action().await;
            }
        });
        Self { tx }
    }

    /// Schedules (or reschedules) an action run after the quiet period.
    pub fn trigger(&self) {
        // The task only goes away when every sender is dropped, so this
        // cannot fail while the handle exists.
        let _ = self.tx.send(());
    }
}
