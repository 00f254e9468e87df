// Pending-request gauge backing the busy indicator: visible while at
// least one slow evaluation is in flight.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct ProgressGauge {
    pending: AtomicUsize,
}

impl ProgressGauge {
    pub fn new() -> Arc<ProgressGauge> {
        Arc::new(ProgressGauge::default())
    }

    /// Mark a request started; the gauge stays busy until the returned
    /// guard drops.
    pub fn begin(&self) -> BusyGuard<'_> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        BusyGuard { gauge: self }
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.pending() > 0
    }
}

pub struct BusyGuard<'a> {
    gauge: &'a ProgressGauge,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.gauge.pending.fetch_sub(1, Ordering::SeqCst);
    }
}
