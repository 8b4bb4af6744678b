//! Cancellation for long-running loops.

use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

/// A cancellation token. Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct Context {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    cv: Condvar,
}

impl Inner {
    // A panic while holding the lock cannot leave a bool half-written.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.cancelled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the context, waking every waiter.
    pub fn cancel(&self) {
        *self.inner.lock() = true;
        self.inner.cv.notify_all();
    }

    /// Returns true iff the context has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.inner.lock()
    }

    /// Wait until the duration expires, or the context is cancelled.
    /// Returns true if the context has been cancelled.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let g = self.inner.lock();
        let (v, _) = self
            .inner
            .cv
            .wait_timeout_while(g, duration, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn times_out_when_not_cancelled() {
        let ctx = Context::new();
        assert!(!ctx.wait_timeout(Duration::from_millis(5)));
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn cancel_wakes_waiters() {
        let ctx = Context::new();
        let waiter = {
            let ctx = ctx.clone();
            std::thread::spawn(move || ctx.wait_timeout(Duration::from_secs(30)))
        };
        let start = Instant::now();
        ctx.cancel();
        assert!(waiter.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(30));
        assert!(ctx.is_cancelled());
    }
}
