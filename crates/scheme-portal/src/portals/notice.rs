use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Transient message shown by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
    pub generation: u64,
}

/// Holds at most one notice and dismisses it after a fixed delay.
///
/// Posting a new notice cancels the pending dismissal of the previous one and
/// dropping the board cancels whatever is pending. Without a tokio runtime the
/// notice stays until it is superseded or dismissed.
#[derive(Debug)]
pub struct NoticeBoard {
    ttl: Duration,
    slot: Arc<Mutex<Option<Notice>>>,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl NoticeBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Arc::new(Mutex::new(None)),
            generation: 0,
            pending: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn post(&mut self, message: impl Into<String>) -> u64 {
        self.cancel_pending();
        self.generation += 1;
        let generation = self.generation;

        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(Notice {
            message: message.into(),
            generation,
        });

        match Handle::try_current() {
            Ok(handle) => {
                let slot = Arc::clone(&self.slot);
                let ttl = self.ttl;
                self.pending = Some(handle.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    let mut current = slot.lock().unwrap_or_else(PoisonError::into_inner);
                    if current.as_ref().map(|notice| notice.generation) == Some(generation) {
                        *current = None;
                        debug!(generation, "notice expired");
                    }
                }));
            }
            Err(_) => debug!(generation, "no runtime available, notice will not auto-dismiss"),
        }

        generation
    }

    pub fn current(&self) -> Option<Notice> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn dismiss(&mut self) {
        self.cancel_pending();
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for NoticeBoard {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
