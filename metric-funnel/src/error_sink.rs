// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::Error;

/// Lossy, non-blocking destination for [`Error`]s raised by a [`Client`](crate::Client).
///
/// Every error event results in exactly one `try_send`. If the channel is full or its receiver is gone, the error is
/// discarded silently. Applications that want to see every error should size the channel generously and drain it
/// promptly.
#[derive(Clone, Debug)]
pub struct ErrorSink {
    sender: Sender<Error>,
}

impl ErrorSink {
    /// Create a sink backed by a bounded channel of `capacity` errors, returning the receiving side with it.
    pub fn bounded(capacity: usize) -> (Self, Receiver<Error>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self { sender }, receiver)
    }

    /// Create a sink that discards every error.
    pub fn discard() -> Self {
        // a zero-capacity channel with no receiver rejects every try_send
        let (sender, _) = crossbeam_channel::bounded(0);
        Self { sender }
    }

    /// Report `error`. Never blocks.
    ///
    /// Returns whether the error was accepted by the channel.
    pub fn report(&self, error: Error) -> bool {
        match self.sender.try_send(error) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

impl From<Sender<Error>> for ErrorSink {
    fn from(sender: Sender<Error>) -> Self {
        Self { sender }
    }
}
