// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crossbeam_utils::sync::{Parker, Unparker};
use metric_funnel_core::{Error, Publisher};

use crate::{ErrorSink, queue::IngestQueue, rate_limit::LogLimiter, stats::AtomicStats};

const LOG_INTERVAL: Duration = Duration::from_secs(1);

/// State shared between the [`Client`](crate::Client) and its harvest thread.
pub(crate) struct Shared {
    pub(crate) queue: IngestQueue,
    pub(crate) errors: ErrorSink,
    pub(crate) stats: AtomicStats,
    pub(crate) shutdown_signal: AtomicBool,
    // lets the client wake the harvest thread early on shutdown
    pub(crate) unparker: Unparker,
    pub(crate) drop_log: LogLimiter,
    pub(crate) publish_log: LogLimiter,
}

impl Shared {
    pub(crate) fn new(capacity: usize, errors: ErrorSink, unparker: Unparker) -> Self {
        Self {
            queue: IngestQueue::new(capacity),
            errors,
            stats: AtomicStats::default(),
            shutdown_signal: AtomicBool::new(false),
            unparker,
            drop_log: LogLimiter::new(LOG_INTERVAL),
            publish_log: LogLimiter::new(LOG_INTERVAL),
        }
    }

    /// Send `error` to the error sink without blocking. A full sink drops it.
    pub(crate) fn report(&self, error: Error) {
        self.errors.report(error);
    }
}

/// Outcome of a single harvest, mostly useful for tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HarvestResult {
    Idle,
    Published,
    Failed,
}

/// The background worker: drains the queue every `interval` and hands each batch to the publisher.
///
/// Two states, running and stopped. It stops after observing the shutdown signal, which causes exactly one more
/// harvest before the thread exits.
pub(crate) struct HarvestLoop<P> {
    pub(crate) name: String,
    pub(crate) shared: Arc<Shared>,
    pub(crate) publisher: P,
    pub(crate) interval: Duration,
    pub(crate) parker: Parker,
}

impl<P: Publisher> HarvestLoop<P> {
    pub(crate) fn run(mut self) {
        let span = tracing::span!(tracing::Level::TRACE, "metrics harvest loop", queue = ?self.name);
        let _enter = span.enter();

        // `None` when the interval is too large to represent: only shutdown wakes the thread then
        let mut next_harvest = Instant::now().checked_add(self.interval);
        loop {
            if self.shutdown_requested() {
                break;
            }
            match next_harvest {
                Some(deadline) => self.parker.park_deadline(deadline),
                None => self.parker.park(),
            }
            if self.shutdown_requested() {
                break;
            }

            // woken up early without a shutdown, go back to sleep
            let now = Instant::now();
            let Some(deadline) = next_harvest else {
                continue;
            };
            if now < deadline {
                continue;
            }

            self.harvest();
            // a slow publish may have made us miss ticks; skip them rather than harvesting back to back
            next_harvest = deadline
                .checked_add(self.interval)
                .filter(|&next| next > now)
                .or_else(|| now.checked_add(self.interval));
        }

        tracing::info!("caught shutdown signal, running final metrics harvest");
        self.shared.queue.wait_for_producers();
        self.harvest();
        tracing::info!("metrics harvest loop has shut down");
    }

    fn shutdown_requested(&self) -> bool {
        self.shared.shutdown_signal.load(Ordering::Acquire)
    }

    pub(crate) fn harvest(&mut self) -> HarvestResult {
        self.shared.stats.record_harvest();
        let batch = self.shared.queue.drain();
        if batch.is_empty() {
            return HarvestResult::Idle;
        }

        let (gauges, counters) = (batch.gauges().len(), batch.counters().len());
        tracing::debug!(gauges, counters, "publishing metrics batch");
        match self.publisher.publish(&batch) {
            Ok(()) => {
                self.shared.stats.record_published(batch.len());
                HarvestResult::Published
            }
            Err(err) => {
                self.shared.stats.record_publish_failure();
                if let Some(suppressed) = self.shared.publish_log.admit() {
                    tracing::error!(
                        %err,
                        gauges,
                        counters,
                        suppressed,
                        "couldn't publish metrics batch, it will be discarded"
                    );
                }
                self.shared.report(Error::Publish {
                    gauges,
                    counters,
                    source: err,
                });
                HarvestResult::Failed
            }
        }
    }
}
