// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The two measurement shapes understood by the collector, [`Gauge`] and [`Counter`].
//!
//! Measurements are immutable once built. Names are not validated on construction: an invalid name is only reported
//! when the [`Batch`](crate::Batch) containing it is published.
//!
//! Each metric has a name that is unique to its class of metrics, e.g. a gauge name must be unique among gauges. Names
//! can be up to 255 characters long and use the characters `A-Za-z0-9.:-_`. The collector treats them case
//! insensitively.

use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{CowStr, Number};

/// Statistical summary of many samples, sent in place of a single gauge value.
///
/// `sum_squares` is the corrected sum of squares, `Σ(v²) − (Σv)²/n`, which the collector uses to derive the standard
/// deviation. See [`Aggregate`](crate::Aggregate).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    /// Number of samples.
    pub count: u64,
    /// Sum of all samples.
    pub sum: f64,
    /// Smallest sample, or 0 if there are none.
    pub min: f64,
    /// Largest sample, or 0 if there are none.
    pub max: f64,
    /// Sum of squared deviations from the mean.
    pub sum_squares: f64,
}

/// Payload of a [`Gauge`]: either one sample or a summary of many.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GaugeValue {
    /// A single point-in-time value.
    Sample(Number),
    /// A client-side aggregated summary.
    Summary(Summary),
}

/// A point-in-time (or aggregated) numeric measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct Gauge {
    name: CowStr,
    value: GaugeValue,
    source: Option<CowStr>,
    measure_time: Option<i64>,
}

impl Gauge {
    /// Create a gauge carrying a single sample.
    pub fn new(name: impl Into<CowStr>, value: impl Into<Number>) -> Self {
        Self {
            name: name.into(),
            value: GaugeValue::Sample(value.into()),
            source: None,
            measure_time: None,
        }
    }

    /// Create a gauge carrying an aggregated summary. Usually built through
    /// [`Aggregate::to_gauge`](crate::Aggregate::to_gauge).
    pub fn from_summary(name: impl Into<CowStr>, summary: Summary) -> Self {
        Self {
            name: name.into(),
            value: GaugeValue::Summary(summary),
            source: None,
            measure_time: None,
        }
    }

    /// Attach a source, subdividing the metric across members of a population (e.g. the hostname).
    pub fn with_source(mut self, source: impl Into<CowStr>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the epoch second at which the measurement occurred. Without it, the collector uses the receipt time.
    pub fn with_measure_time(mut self, epoch_seconds: i64) -> Self {
        self.measure_time = Some(epoch_seconds);
        self
    }

    /// Like [`Gauge::with_measure_time`] but from a [`SystemTime`], truncated to whole seconds.
    pub fn measured_at(self, time: SystemTime) -> Self {
        self.with_measure_time(epoch_seconds(time))
    }

    /// The metric name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload.
    pub fn value(&self) -> &GaugeValue {
        &self.value
    }

    /// The single sample, if this gauge isn't a summary.
    pub fn sample(&self) -> Option<Number> {
        match self.value {
            GaugeValue::Sample(v) => Some(v),
            GaugeValue::Summary(_) => None,
        }
    }

    /// The summary, if this gauge carries one.
    pub fn summary(&self) -> Option<&Summary> {
        match &self.value {
            GaugeValue::Sample(_) => None,
            GaugeValue::Summary(s) => Some(s),
        }
    }

    /// The source label, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The measure time in epoch seconds, if any.
    pub fn measure_time(&self) -> Option<i64> {
        self.measure_time
    }
}

/// A named numeric measurement without aggregation support.
#[derive(Clone, Debug, PartialEq)]
pub struct Counter {
    name: CowStr,
    value: Number,
    source: Option<CowStr>,
    measure_time: Option<i64>,
}

impl Counter {
    /// Create a counter measurement.
    pub fn new(name: impl Into<CowStr>, value: impl Into<Number>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            source: None,
            measure_time: None,
        }
    }

    /// See [`Gauge::with_source`].
    pub fn with_source(mut self, source: impl Into<CowStr>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// See [`Gauge::with_measure_time`].
    pub fn with_measure_time(mut self, epoch_seconds: i64) -> Self {
        self.measure_time = Some(epoch_seconds);
        self
    }

    /// See [`Gauge::measured_at`].
    pub fn measured_at(self, time: SystemTime) -> Self {
        self.with_measure_time(epoch_seconds(time))
    }

    /// The metric name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value.
    pub fn value(&self) -> Number {
        self.value
    }

    /// The source label, if any.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The measure time in epoch seconds, if any.
    pub fn measure_time(&self) -> Option<i64> {
        self.measure_time
    }
}

/// Which kind of measurement something is. Used in error reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    /// A [`Gauge`].
    Gauge,
    /// A [`Counter`].
    Counter,
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gauge => "gauge",
            Self::Counter => "counter",
        })
    }
}

/// Any measurement that can be queued for publishing.
#[derive(Clone, Debug, PartialEq)]
pub enum Measurement {
    /// A gauge.
    Gauge(Gauge),
    /// A counter.
    Counter(Counter),
}

impl Measurement {
    /// The kind of this measurement.
    pub fn kind(&self) -> MeasurementKind {
        match self {
            Self::Gauge(_) => MeasurementKind::Gauge,
            Self::Counter(_) => MeasurementKind::Counter,
        }
    }

    /// The metric name.
    pub fn name(&self) -> &str {
        match self {
            Self::Gauge(g) => g.name(),
            Self::Counter(c) => c.name(),
        }
    }

    /// The source label, if any.
    pub fn source(&self) -> Option<&str> {
        match self {
            Self::Gauge(g) => g.source(),
            Self::Counter(c) => c.source(),
        }
    }

    /// The measure time in epoch seconds, if any.
    pub fn measure_time(&self) -> Option<i64> {
        match self {
            Self::Gauge(g) => g.measure_time(),
            Self::Counter(c) => c.measure_time(),
        }
    }
}

impl From<Gauge> for Measurement {
    fn from(value: Gauge) -> Self {
        Self::Gauge(value)
    }
}

impl From<Counter> for Measurement {
    fn from(value: Counter) -> Self {
        Self::Counter(value)
    }
}

// times before the epoch are negative seconds
pub(crate) fn epoch_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}
