// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Client-side aggregation of gauge samples.
//!
//! Applications recording a large number of samples for the same metric should fold them into an [`Aggregate`] and
//! publish the single summary gauge it produces, instead of queueing every sample.

use std::time::SystemTime;

use crate::{
    CowStr, Gauge, Summary,
    measurement::epoch_seconds,
};

/// Streaming reducer of samples into `count`, `sum`, `min`, `max` and `sum_squares`.
///
/// Only running values are kept, so [`Aggregate::add`] is O(1) and memory doesn't grow with the number of samples.
///
/// All accumulation happens in `f64`. `sum_squares` is computed as `Σ(v²) − (Σv)²/n` from the running sums, which is
/// what the collector expects. That formula suffers from catastrophic cancellation for samples with a large magnitude
/// and a small variance; this is accepted, the collector applies the same formula.
///
/// ```
/// # use metric_funnel_core::Aggregate;
/// let mut agg = Aggregate::new("reticulated.splines").with_source("add-aggregate");
/// agg.add(12.0).add(6.0).add(5.0).add(4.0).add(5.0).add(10.0).add(3.0);
///
/// let gauge = agg.to_gauge();
/// let summary = gauge.summary().unwrap();
/// assert_eq!(summary.count, 7);
/// assert_eq!(summary.sum, 45.0);
/// assert!((summary.sum_squares - 65.714286).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    name: CowStr,
    source: Option<CowStr>,
    measure_time: Option<i64>,
    count: u64,
    sum: f64,
    sum_of_squares: f64,
    min: f64,
    max: f64,
}

impl Aggregate {
    /// Create an empty aggregate for the metric `name`.
    pub fn new(name: impl Into<CowStr>) -> Self {
        Self {
            name: name.into(),
            source: None,
            measure_time: None,
            count: 0,
            sum: 0.0,
            sum_of_squares: 0.0,
            min: 0.0,
            max: 0.0,
        }
    }

    /// Set the source carried over to the materialized gauge.
    pub fn with_source(mut self, source: impl Into<CowStr>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the measure time (epoch seconds) carried over to the materialized gauge.
    pub fn with_measure_time(mut self, epoch_seconds: i64) -> Self {
        self.measure_time = Some(epoch_seconds);
        self
    }

    /// Like [`Aggregate::with_measure_time`] but from a [`SystemTime`].
    pub fn measured_at(self, time: SystemTime) -> Self {
        self.with_measure_time(epoch_seconds(time))
    }

    /// Add one sample. Returns `self` to allow chaining.
    pub fn add(&mut self, value: f64) -> &mut Self {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            if value < self.min {
                self.min = value;
            }
            if value > self.max {
                self.max = value;
            }
        }
        self.count += 1;
        self.sum += value;
        self.sum_of_squares += value * value;
        self
    }

    /// The metric name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of samples added so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of all samples, 0 if there are none.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Smallest sample, 0 if there are none.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest sample, 0 if there are none.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Corrected sum of squares, `Σ(v²) − (Σv)²/n`, or 0 if there are no samples.
    pub fn sum_squares(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum_of_squares - (self.sum * self.sum) / self.count as f64
    }

    /// Snapshot of the current state.
    pub fn summary(&self) -> Summary {
        Summary {
            count: self.count,
            sum: self.sum,
            min: self.min,
            max: self.max,
            sum_squares: self.sum_squares(),
        }
    }

    /// Materialize the current state into a summary [`Gauge`].
    ///
    /// This doesn't reset the aggregate; later calls reflect every sample added since it was created.
    pub fn to_gauge(&self) -> Gauge {
        let mut gauge = Gauge::from_summary(self.name.clone(), self.summary());
        if let Some(source) = &self.source {
            gauge = gauge.with_source(source.clone());
        }
        if let Some(measure_time) = self.measure_time {
            gauge = gauge.with_measure_time(measure_time);
        }
        gauge
    }
}

impl Extend<f64> for Aggregate {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.add(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    use super::Aggregate;

    fn aggregate_of(values: &[f64]) -> Aggregate {
        let mut agg = Aggregate::new("test.metric");
        agg.extend(values.iter().copied());
        agg
    }

    #[test]
    fn sum_squares() {
        let mut agg = Aggregate::new("reticulated.splines");
        agg.add(12.0)
            .add(6.0)
            .add(5.0)
            .add(4.0)
            .add(5.0)
            .add(10.0)
            .add(3.0);
        assert_eq!(agg.count(), 7);
        assert_eq!(agg.sum(), 45.0);
        assert_eq!(agg.min(), 3.0);
        assert_eq!(agg.max(), 12.0);
        assert_approx_eq!(agg.sum_squares(), 65.714286, 1e-6);
    }

    #[test]
    fn empty_aggregate_reports_zero() {
        let agg = Aggregate::new("empty");
        assert_eq!(agg.count(), 0);
        assert_eq!(agg.sum(), 0.0);
        assert_eq!(agg.min(), 0.0);
        assert_eq!(agg.max(), 0.0);
        assert_eq!(agg.sum_squares(), 0.0);
    }

    #[rstest]
    #[case(vec![1.0])]
    #[case(vec![-3.5, 2.0])]
    #[case(vec![0.1, 0.2, 0.3, 0.4])]
    #[case(vec![100.0, -100.0, 50.0, 25.0, 0.0])]
    fn matches_two_pass_definition(#[case] values: Vec<f64>) {
        let agg = aggregate_of(&values);
        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let squares: f64 = values.iter().map(|v| v * v).sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        assert_eq!(agg.count(), values.len() as u64);
        assert_approx_eq!(agg.sum(), sum, 1e-9);
        assert_eq!(agg.min(), min);
        assert_eq!(agg.max(), max);
        assert_approx_eq!(agg.sum_squares(), squares - sum * sum / n, 1e-9);
    }

    #[test]
    fn single_negative_sample_sets_min_and_max() {
        let agg = aggregate_of(&[-4.0]);
        assert_eq!(agg.min(), -4.0);
        assert_eq!(agg.max(), -4.0);
        assert_eq!(agg.sum_squares(), 0.0);
    }

    #[test]
    fn to_gauge_is_idempotent() {
        let agg = aggregate_of(&[1.0, 2.0, 4.0]);
        assert_eq!(agg.to_gauge(), agg.to_gauge());
    }

    #[test]
    fn to_gauge_reflects_all_samples() {
        let mut agg = aggregate_of(&[1.0, 2.0]);
        let first = agg.to_gauge();
        agg.add(10.0);
        let second = agg.to_gauge();

        assert_eq!(first.summary().unwrap().count, 2);
        let summary = second.summary().unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.sum, 13.0);
        assert_eq!(summary.max, 10.0);
        assert_eq!(summary.min, 1.0);
    }

    #[test]
    fn to_gauge_carries_labels() {
        let mut agg = Aggregate::new("reticulated.splines")
            .with_source("add-aggregate")
            .with_measure_time(1_600_000_000);
        agg.add(1.0);
        let gauge = agg.to_gauge();
        assert_eq!(gauge.name(), "reticulated.splines");
        assert_eq!(gauge.source(), Some("add-aggregate"));
        assert_eq!(gauge.measure_time(), Some(1_600_000_000));
    }
}
