// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crate::{MeasurementKind, PublishError};

/// Errors reported asynchronously to the error sink.
///
/// None of these are ever returned to the code adding measurements: recording a metric must never fail or block the
/// host application. They only exist so that applications can observe metrics being lost.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The queue was full and the measurement was dropped.
    #[error("{kind} could not be added to the metrics queue")]
    QueueSaturated {
        /// The kind of the dropped measurement.
        kind: MeasurementKind,
    },
    /// The measurement was added after the client shut down and was dropped.
    #[error("{kind} was added after the metrics client shut down")]
    Closed {
        /// The kind of the dropped measurement.
        kind: MeasurementKind,
    },
    /// A harvested batch couldn't be published and was discarded.
    #[error("an error occurred publishing {gauges} gauges and {counters} counters: {source}")]
    Publish {
        /// Number of gauges in the discarded batch.
        gauges: usize,
        /// Number of counters in the discarded batch.
        counters: usize,
        /// What went wrong.
        #[source]
        source: PublishError,
    },
}
