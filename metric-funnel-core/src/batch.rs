// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Contains [`Batch`], the set of measurements published by one harvest.

use crate::{Counter, Gauge, Measurement, ValidationError, validate_name};

/// Measurements drained from the queue by one harvest, partitioned by kind.
///
/// Within each kind, measurements keep the order in which they were dequeued. The interleaving between gauges and
/// counters is not kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Batch {
    gauges: Vec<Gauge>,
    counters: Vec<Counter>,
}

impl Batch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a measurement to the end of the sequence for its kind.
    pub fn push(&mut self, measurement: impl Into<Measurement>) {
        match measurement.into() {
            Measurement::Gauge(g) => self.gauges.push(g),
            Measurement::Counter(c) => self.counters.push(c),
        }
    }

    /// The gauges, in dequeue order.
    pub fn gauges(&self) -> &[Gauge] {
        &self.gauges
    }

    /// The counters, in dequeue order.
    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    /// Total number of measurements.
    pub fn len(&self) -> usize {
        self.gauges.len() + self.counters.len()
    }

    /// True if there are neither gauges nor counters. Empty batches are never published.
    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty() && self.counters.is_empty()
    }

    /// Check every measurement name against the collector's rules, reporting all failures at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut builder = ValidationError::builder();
        let names = self
            .gauges
            .iter()
            .map(Gauge::name)
            .chain(self.counters.iter().map(Counter::name));
        for name in names {
            if let Err(err) = validate_name(name) {
                builder.extend_mut(err.for_measurement(name));
            }
        }
        builder.build()
    }
}

impl<M: Into<Measurement>> FromIterator<M> for Batch {
    fn from_iter<T: IntoIterator<Item = M>>(iter: T) -> Self {
        let mut batch = Self::new();
        batch.extend(iter);
        batch
    }
}

impl<M: Into<Measurement>> Extend<M> for Batch {
    fn extend<T: IntoIterator<Item = M>>(&mut self, iter: T) {
        for measurement in iter {
            self.push(measurement);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    #[test]
    fn partitions_by_kind_preserving_order() {
        let batch: Batch = [
            Measurement::from(Gauge::new("g", 1)),
            Counter::new("c", 1).into(),
            Gauge::new("g", 2).into(),
            Counter::new("c", 2).into(),
            Gauge::new("g", 3).into(),
        ]
        .into_iter()
        .collect();

        let gauges: Vec<_> = batch.gauges().iter().filter_map(Gauge::sample).collect();
        let counters: Vec<_> = batch.counters().iter().map(Counter::value).collect();
        assert_eq!(gauges, [Number::Int(1), Number::Int(2), Number::Int(3)]);
        assert_eq!(counters, [Number::Int(1), Number::Int(2)]);
        assert_eq!(batch.len(), 5);
        assert!(!batch.is_empty());
    }

    #[test]
    fn empty() {
        assert!(Batch::new().is_empty());
        assert_eq!(Batch::new().len(), 0);
    }

    #[test]
    fn validate_reports_every_bad_name() {
        let mut batch = Batch::new();
        batch.push(Gauge::new("fine.name", 1));
        batch.push(Gauge::new("bad name", 1));
        batch.push(Counter::new("", 1));
        let err = batch.validate().unwrap_err();
        assert_eq!(err.reasons().len(), 2);
        assert!(err.to_string().contains("bad name"));

        batch = Batch::from_iter([Gauge::new("fine.name", 1)]);
        assert!(batch.validate().is_ok());
    }
}
