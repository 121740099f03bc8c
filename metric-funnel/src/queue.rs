// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crossbeam_queue::ArrayQueue;
use crossbeam_utils::Backoff;
use metric_funnel_core::{Batch, Error, Measurement};

/// Bounded multi-producer, single-consumer queue of measurements.
///
/// Note we use `ArrayQueue::push` rather than `force_push`: when the queue is full the *new* measurement is rejected.
/// The capacity check and the insert are a single atomic operation, so concurrent producers can never push past
/// capacity.
///
/// Closing is two-sided. `close` makes every later `push` fail, and `wait_for_producers` waits out the pushes that
/// passed the closed check before it. After both, the queue can be drained one last time and nothing can follow.
pub(crate) struct IngestQueue {
    queue: ArrayQueue<Measurement>,
    closed: AtomicBool,
    // pushes between their closed check and their insert
    in_flight: AtomicUsize,
}

impl IngestQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(capacity),
            closed: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Insert without blocking. On failure the measurement is gone and the returned error says why.
    pub(crate) fn push(&self, measurement: Measurement) -> Result<(), Error> {
        let kind = measurement.kind();
        // SeqCst pairs with `close` and `wait_for_producers`: either this push sees the queue closed, or the closing
        // side sees it in flight and waits for it
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let result = if self.closed.load(Ordering::SeqCst) {
            Err(Error::Closed { kind })
        } else {
            self.queue
                .push(measurement)
                .map_err(|_| Error::QueueSaturated { kind })
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    /// Pop at most `capacity` measurements, stopping early once the queue is empty.
    ///
    /// The bound keeps a harvest finite while producers keep inserting as fast as we drain.
    pub(crate) fn drain(&self) -> Batch {
        let mut batch = Batch::new();
        for _ in 0..self.queue.capacity() {
            match self.queue.pop() {
                Some(measurement) => batch.push(measurement),
                None => break,
            }
        }
        batch
    }

    /// Reject all further pushes.
    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Spin until no push is between its closed check and its insert. Only meaningful after [`Self::close`].
    pub(crate) fn wait_for_producers(&self) {
        let backoff = Backoff::new();
        while self.in_flight.load(Ordering::SeqCst) != 0 {
            backoff.snooze();
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}
