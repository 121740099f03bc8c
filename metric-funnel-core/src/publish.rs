// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Contains the [`Publisher`] trait, the boundary between the harvest loop and the remote collector.

use crate::{Batch, ValidationError};

/// Errors a [`Publisher`] can report for a batch.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The batch contains measurements the collector would reject.
    #[error("invalid batch: {0}")]
    Validation(#[from] ValidationError),
    /// The request couldn't be delivered.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The collector answered with a non-success status.
    #[error("collector responded with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },
}

impl PublishError {
    /// Wrap any error as a [`PublishError::Transport`].
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }
}

/// Sends a harvested [`Batch`] to the remote collector.
///
/// The harvest loop only calls this with non-empty batches. Implementations must not retry: a failed batch is
/// reported and discarded by the caller, so that a collector outage never makes the loop fall behind.
///
/// The call may block the harvest thread for the duration of the network request. That delays the next harvest but
/// never the code adding measurements.
pub trait Publisher {
    /// Serialize and transmit `batch`.
    fn publish(&mut self, batch: &Batch) -> Result<(), PublishError>;
}

impl<P: Publisher + ?Sized> Publisher for Box<P> {
    fn publish(&mut self, batch: &Batch) -> Result<(), PublishError> {
        (**self).publish(batch)
    }
}
