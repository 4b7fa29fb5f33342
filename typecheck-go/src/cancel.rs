use crate::error::Error;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Cooperative cancellation signal shared between a session and its caller.
///
/// Cloning is cheap; all clones observe the same signal. Caches are not
/// rolled back on cancellation, so a later session can reuse partial work.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
  cancelled: Arc<AtomicBool>,
}

impl CancelToken {
  pub fn new() -> CancelToken {
    CancelToken::default()
  }

  /// Request cancellation of ongoing work.
  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::Relaxed);
  }

  /// Clear a pending cancellation request so new work can proceed.
  pub fn clear(&self) {
    self.cancelled.store(false, Ordering::Relaxed);
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Relaxed)
  }

  /// Fail promptly if the signal has been raised.
  pub fn check(&self) -> Result<(), Error> {
    if self.is_cancelled() {
      Err(Error::Cancelled)
    } else {
      Ok(())
    }
  }
}
