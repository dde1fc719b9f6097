//! Quiescence-window debouncing for search input
//!
//! Values pushed into a [`Debouncer`] are forwarded only once no newer value
//! has arrived for the whole window. A value equal to the last one forwarded
//! is dropped.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// Window used for search-as-you-type
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(150);

/// Sending half of a debounced channel
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Spawn the debouncing task; settled values arrive on the receiver
    pub fn spawn(window: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, mut input) = mpsc::unbounded_channel::<T>();
        let (output, settled) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            let mut last_sent: Option<T> = None;

            while let Some(mut pending) = input.recv().await {
                loop {
                    match timeout(window, input.recv()).await {
                        Ok(Some(newer)) => pending = newer,
                        // Input closed: flush what we have, then stop
                        Ok(None) => {
                            if last_sent.as_ref() != Some(&pending) {
                                let _ = output.send(pending);
                            }
                            return;
                        }
                        Err(_) => break,
                    }
                }

                if last_sent.as_ref() != Some(&pending) {
                    if output.send(pending.clone()).is_err() {
                        return;
                    }
                    last_sent = Some(pending);
                }
            }
        });

        (Self { tx }, settled)
    }

    /// Queue a value; returns false once the debouncing task has stopped
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}
