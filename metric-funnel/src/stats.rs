// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time counters describing what a [`Client`](crate::Client) has done so far.
///
/// These are kept even when the error sink is saturated, so they are the reliable way to tell how many measurements
/// were lost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct HarvestStats {
    /// Harvest cycles run, including idle ones and the final harvest on shutdown.
    pub harvests: u64,
    /// Batches the publisher accepted.
    pub batches_published: u64,
    /// Measurements in the batches the publisher accepted.
    pub measurements_published: u64,
    /// Batches the publisher rejected. Their measurements are lost.
    pub publish_failures: u64,
    /// Measurements dropped because the queue was full or the client had shut down.
    pub measurements_dropped: u64,
}

#[derive(Debug, Default)]
pub(crate) struct AtomicStats {
    harvests: AtomicU64,
    batches_published: AtomicU64,
    measurements_published: AtomicU64,
    publish_failures: AtomicU64,
    measurements_dropped: AtomicU64,
}

impl AtomicStats {
    pub(crate) fn record_harvest(&self) {
        self.harvests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_published(&self, measurements: usize) {
        self.batches_published.fetch_add(1, Ordering::Relaxed);
        self.measurements_published
            .fetch_add(measurements as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.measurements_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> HarvestStats {
        HarvestStats {
            harvests: self.harvests.load(Ordering::Relaxed),
            batches_published: self.batches_published.load(Ordering::Relaxed),
            measurements_published: self.measurements_published.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            measurements_dropped: self.measurements_dropped.load(Ordering::Relaxed),
        }
    }
}
