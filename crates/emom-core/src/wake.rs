//! Keep-awake requests held while a workout is in progress.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Best-effort request to keep the screen (or machine) awake.
///
/// Failure to acquire never affects the timer; the runner logs it and
/// carries on.
pub trait ScreenWake {
    fn acquire(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn release(&mut self);
}

/// No keep-awake support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWake;

impl ScreenWake for NoWake {
    fn acquire(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }

    fn release(&mut self) {}
}

/// Counts holds; clones share the counter.
#[derive(Debug, Default, Clone)]
pub struct CountingWake {
    held: Arc<AtomicUsize>,
}

impl CountingWake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> usize {
        self.held.load(Ordering::SeqCst)
    }
}

impl ScreenWake for CountingWake {
    fn acquire(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.held.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn release(&mut self) {
        let _ = self
            .held
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

impl<T: ScreenWake + ?Sized> ScreenWake for Box<T> {
    fn acquire(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).acquire()
    }

    fn release(&mut self) {
        (**self).release();
    }
}
