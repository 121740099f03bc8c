// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Serialization of batches into the collector's JSON payload:
//!
//! ```json
//! {
//!   "gauges": [{"name": "...", "value": 1, "source": "...", "measure_time": 1700000000}],
//!   "counters": [{"name": "...", "value": 2}]
//! }
//! ```
//!
//! Summary gauges replace `value` with `count`, `sum`, `min`, `max` and `sum_squares`. Absent fields and empty arrays
//! are omitted.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{Batch, Counter, Gauge, GaugeValue, Number};

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Int(v) => serializer.serialize_i64(v),
            Self::Float(v) => serializer.serialize_f64(v),
        }
    }
}

impl Serialize for Gauge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", self.name())?;
        match self.value() {
            GaugeValue::Sample(value) => map.serialize_entry("value", value)?,
            GaugeValue::Summary(summary) => {
                map.serialize_entry("count", &summary.count)?;
                map.serialize_entry("sum", &summary.sum)?;
                map.serialize_entry("min", &summary.min)?;
                map.serialize_entry("max", &summary.max)?;
                map.serialize_entry("sum_squares", &summary.sum_squares)?;
            }
        }
        if let Some(source) = self.source() {
            map.serialize_entry("source", source)?;
        }
        if let Some(measure_time) = self.measure_time() {
            map.serialize_entry("measure_time", &measure_time)?;
        }
        map.end()
    }
}

impl Serialize for Counter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", self.name())?;
        map.serialize_entry("value", &self.value())?;
        if let Some(source) = self.source() {
            map.serialize_entry("source", source)?;
        }
        if let Some(measure_time) = self.measure_time() {
            map.serialize_entry("measure_time", &measure_time)?;
        }
        map.end()
    }
}

impl Serialize for Batch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.gauges().is_empty() {
            map.serialize_entry("gauges", self.gauges())?;
        }
        if !self.counters().is_empty() {
            map.serialize_entry("counters", self.counters())?;
        }
        map.end()
    }
}
