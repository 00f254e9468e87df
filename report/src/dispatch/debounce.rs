// Keyed debouncer: rapid edits to the same key collapse into one run.
// Superseding cancels the pending timer only, never work that already
// started running.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Default)]
pub struct Debouncer {
    pending: HashMap<String, JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `work` after `delay`, superseding any pending run for the key.
    /// Only the waiting stage is abortable: once the delay elapses the work
    /// detaches and runs to completion even if superseded, so a stale
    /// response can still land after a newer edit.
    pub fn schedule<F>(&mut self, key: &str, delay: Duration, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.pending.remove(key) {
            handle.abort();
        }
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(work);
        });
        self.pending.insert(key.to_string(), handle);
    }

    /// Drop any pending run for the key and start `work` immediately.
    pub fn fire_now<F>(&mut self, key: &str, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.pending.remove(key) {
            handle.abort();
        }
        tokio::spawn(work);
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_rapid_schedules_coalesce() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();
        for _ in 0..3 {
            let count = Arc::clone(&count);
            debouncer.schedule("threshold", Duration::from_millis(20), async move {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();
        for key in ["a", "b"] {
            let count = Arc::clone(&count);
            debouncer.schedule(key, Duration::from_millis(10), async move {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fire_now_supersedes_pending() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();
        {
            let count = Arc::clone(&count);
            debouncer.schedule("k", Duration::from_millis(20), async move {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let count = Arc::clone(&count);
            debouncer.fire_now("k", async move {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
