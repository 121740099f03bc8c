// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// Lets one log event through per interval and counts the ones it holds back.
///
/// Each [`Client`](crate::Client) owns one limiter for dropped measurements and one for failed publishes, so a
/// saturated queue logs once a second with the number of drops since the previous line instead of once per `add`.
#[derive(Debug)]
pub(crate) struct LogLimiter {
    started: Instant,
    interval_secs: u64,
    // seconds since `started` before which events are suppressed
    next_log: AtomicU64,
    suppressed: AtomicU64,
}

impl LogLimiter {
    pub(crate) fn new(interval: Duration) -> Self {
        assert!(
            interval >= Duration::from_secs(1),
            "only second-level granularity supported for rate limiting"
        );
        Self {
            started: Instant::now(),
            interval_secs: interval.as_secs(),
            next_log: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
        }
    }

    /// Returns `Some(suppressed)` if this event should be logged, where `suppressed` is the number of events held back
    /// since the last one that was. Returns `None` and counts the event otherwise.
    pub(crate) fn admit(&self) -> Option<u64> {
        self.admit_at(self.started.elapsed().as_secs())
    }

    fn admit_at(&self, now_secs: u64) -> Option<u64> {
        let next = self.next_log.load(Ordering::Relaxed);
        if next <= now_secs
            && self
                .next_log
                .compare_exchange(
                    next,
                    now_secs.saturating_add(self.interval_secs),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                )
                .is_ok()
        {
            Some(self.suppressed.swap(0, Ordering::Relaxed))
        } else {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
            None
        }
    }
}
