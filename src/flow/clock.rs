//! Clock abstraction so scheduled work can be driven by hand in tests.

use std::sync::Arc;
use std::time::Instant;

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by the monotonic system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    use super::Clock;

    /// A clock that only moves when told to. Clones share the same time.
    #[derive(Debug, Clone)]
    pub struct ManualClock(Arc<Mutex<Instant>>);

    impl ManualClock {
        pub fn new() -> Self {
            Self(Arc::new(Mutex::new(Instant::now())))
        }

        pub fn advance(&self, by: Duration) {
            if let Ok(mut now) = self.0.lock() {
                *now += by;
            }
        }

        pub fn advance_ms(&self, ms: u64) {
            self.advance(Duration::from_millis(ms));
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            match self.0.lock() {
                Ok(now) => *now,
                Err(poisoned) => *poisoned.into_inner(),
            }
        }
    }
}
