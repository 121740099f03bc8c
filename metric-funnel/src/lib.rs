// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use metric_funnel_core::{
    Aggregate, Batch, Counter, Error, Gauge, GaugeValue, Measurement, MeasurementKind, Number,
    PublishError, Publisher, Summary, ValidationError,
};

pub use crate::client::{Client, ClientBuilder, DEFAULT_CAPACITY, DEFAULT_HARVEST_INTERVAL};
pub use crate::error_sink::ErrorSink;
pub use crate::stats::HarvestStats;

mod client;
mod error_sink;
mod harvest;
mod queue;
mod rate_limit;
mod stats;

#[doc(hidden)]
pub use metric_funnel_core as core;

/// Re-export of [`metric_funnel_core::test_util`].
///
/// This requires that the `test-util` feature be enabled.
#[cfg(feature = "test-util")]
pub use metric_funnel_core::test_util;
