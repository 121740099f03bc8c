// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::{
    io,
    sync::{Arc, Mutex, atomic::Ordering},
    thread,
    time::Duration,
};

use crossbeam_utils::sync::Parker;
use metric_funnel_core::{Counter, Gauge, Measurement, Publisher};

use crate::{
    ErrorSink, HarvestStats,
    harvest::{HarvestLoop, Shared},
};

/// Default number of measurements that can be queued between two harvests.
pub const DEFAULT_CAPACITY: usize = 600;

/// Default period between two harvests.
pub const DEFAULT_HARVEST_INTERVAL: Duration = Duration::from_secs(1);

/// Builder for [`Client`]
pub struct ClientBuilder {
    capacity: usize,
    harvest_interval: Duration,
    thread_name: String,
    queue_name: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            harvest_interval: DEFAULT_HARVEST_INTERVAL,
            thread_name: "metric-funnel-harvest".into(),
            queue_name: None,
        }
    }
}

impl ClientBuilder {
    /// Create a builder with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of measurements that can be queued before new ones start being dropped.
    ///
    /// Defaults to `600`. The queue is drained once per harvest, so this bounds how many measurements can be recorded
    /// per harvest interval. Every dropped measurement is reported to the error sink.
    pub fn capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must not be zero");
        self.capacity = capacity;
        self
    }

    /// Sets how often the queue is harvested and published.
    ///
    /// Defaults to every second. An interval too large to schedule (e.g. [`Duration::MAX`]) means the only harvest is
    /// the final one on shutdown.
    pub fn harvest_interval(mut self, harvest_interval: Duration) -> Self {
        assert!(
            harvest_interval > Duration::ZERO,
            "harvest_interval must not be zero"
        );
        self.harvest_interval = harvest_interval;
        self
    }

    /// Thread name assigned to the background harvest thread.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty());
        self.thread_name = name;
        self
    }

    /// Name used for the tracing span of the harvest thread. Defaults to the thread name.
    pub fn queue_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty());
        self.queue_name = Some(name);
        self
    }

    /// Start the harvest thread and return a live [`Client`] publishing to `publisher`.
    ///
    /// Errors raised in the background (dropped measurements, failed publishes) are sent to `errors`.
    ///
    /// Fails only if the harvest thread can't be spawned.
    pub fn build<P: Publisher + Send + 'static>(
        self,
        publisher: P,
        errors: impl Into<ErrorSink>,
    ) -> io::Result<Client> {
        let parker = Parker::new();
        let shared = Arc::new(Shared::new(
            self.capacity,
            errors.into(),
            parker.unparker().clone(),
        ));

        let harvest_loop = HarvestLoop {
            name: self.queue_name.unwrap_or_else(|| self.thread_name.clone()),
            shared: Arc::clone(&shared),
            publisher,
            interval: self.harvest_interval,
            parker,
        };
        let handle = thread::Builder::new()
            .name(self.thread_name)
            .spawn(move || harvest_loop.run())?;

        Ok(Client {
            shared,
            worker: Mutex::new(Some(handle)),
        })
    }
}

/// Non-blocking front end of the metrics funnel.
///
/// `add_*` calls put measurements on a bounded queue and return immediately. A background thread harvests the queue
/// every harvest interval and publishes it. See the [crate] documentation.
///
/// `Client` is `Sync`; share it between threads behind an [`Arc`] or a reference.
pub struct Client {
    shared: Arc<Shared>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Client {
    /// Create a client with the default [`ClientBuilder`] settings.
    pub fn new<P: Publisher + Send + 'static>(
        publisher: P,
        errors: impl Into<ErrorSink>,
    ) -> io::Result<Self> {
        ClientBuilder::new().build(publisher, errors)
    }

    /// Create a [`ClientBuilder`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Queue a gauge. If the queue is full the gauge is dropped and an error is sent to the error sink.
    pub fn add_gauge(&self, gauge: Gauge) {
        self.add(gauge)
    }

    /// Queue a counter. If the queue is full the counter is dropped and an error is sent to the error sink.
    pub fn add_counter(&self, counter: Counter) {
        self.add(counter)
    }

    /// Queue any measurement. Never blocks.
    ///
    /// After [`Client::shutdown`] the measurement is dropped and [`Error::Closed`](crate::Error::Closed) is sent to
    /// the error sink.
    pub fn add(&self, measurement: impl Into<Measurement>) {
        if let Err(err) = self.shared.queue.push(measurement.into()) {
            self.shared.stats.record_dropped();
            if let Some(suppressed) = self.shared.drop_log.admit() {
                // `suppressed` more drops happened since the previous line
                tracing::error!(
                    %err,
                    suppressed,
                    "metrics queue is full or closed, measurements will be missing"
                );
            }
            self.shared.report(err);
        }
    }

    /// Stop the client: close the queue, run one final harvest and wait for it to be published.
    ///
    /// The final harvest always runs, even when the queue is empty, and this returns only after it completed
    /// (including a failed publish). Calling it again is a no-op.
    pub fn shutdown(&self) {
        // concurrent callers wait on the lock until the first one has joined the harvest thread
        let mut worker = match self.worker.lock() {
            Ok(worker) => worker,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(handle) = worker.take() else {
            return;
        };

        self.shared.queue.close();
        self.shared.shutdown_signal.store(true, Ordering::Release);
        self.shared.unparker.unpark();
        tracing::info!("awaiting metrics harvest shutdown");
        if handle.join().is_err() {
            tracing::error!("metrics harvest thread panicked, remaining measurements are lost");
        } else {
            tracing::info!("metrics harvest shut down");
        }
    }

    /// True once [`Client::shutdown`] has been called.
    pub fn is_shut_down(&self) -> bool {
        self.shared.queue.is_closed()
    }

    /// Number of measurements the queue can hold.
    pub fn capacity(&self) -> usize {
        self.shared.queue.capacity()
    }

    /// Number of measurements currently waiting for the next harvest.
    pub fn queued(&self) -> usize {
        self.shared.queue.len()
    }

    /// Counters describing the client's activity so far.
    pub fn stats(&self) -> HarvestStats {
        self.shared.stats.snapshot()
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("capacity", &self.capacity())
            .field("queued", &self.queued())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.shutdown();
    }
}
