// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! [`TestPublisher`] records every published [`Batch`] so tests can inspect what a harvest loop sent.
//!
//! This requires that the `test-util` feature be enabled.

use std::sync::{Arc, Mutex};

use crate::{Batch, Counter, Gauge, PublishError, Publisher};

/// In-memory publisher designed for testing.
///
/// [`Publisher`] is implemented for `Arc<Mutex<TestPublisher>>`, so a test keeps one clone of the `Arc` to inspect the
/// state while the harvest loop owns the other. Holding the lock stalls the harvest loop inside `publish`, which is
/// useful to simulate a slow collector.
#[derive(Debug, Default)]
pub struct TestPublisher {
    /// Every batch passed to `publish`, including the ones that were failed on purpose.
    pub batches: Vec<Batch>,
    /// Fail the next publish with this error.
    pub error: Option<PublishError>,
    /// Fail every publish with a transport error.
    pub fail_always: bool,
    /// Number of publishes that returned an error.
    pub failures: usize,
}

impl TestPublisher {
    /// Create a shared publisher, ready to be handed to a client.
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::default()
    }

    /// All published gauges, flattened across batches.
    pub fn gauges(&self) -> Vec<Gauge> {
        self.batches
            .iter()
            .flat_map(|b| b.gauges().iter().cloned())
            .collect()
    }

    /// All published counters, flattened across batches.
    pub fn counters(&self) -> Vec<Counter> {
        self.batches
            .iter()
            .flat_map(|b| b.counters().iter().cloned())
            .collect()
    }

    /// Total number of measurements across all batches.
    pub fn measurement_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }
}

impl Publisher for Arc<Mutex<TestPublisher>> {
    fn publish(&mut self, batch: &Batch) -> Result<(), PublishError> {
        let mut this = self.lock().unwrap();
        this.batches.push(batch.clone());
        let result = match this.error.take() {
            Some(err) => Err(err),
            None if this.fail_always => Err(PublishError::transport("collector unavailable")),
            None => Ok(()),
        };
        if result.is_err() {
            this.failures += 1;
        }
        result
    }
}
