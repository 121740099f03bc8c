// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use crate::aggregate::Aggregate;
pub use crate::batch::Batch;
pub use crate::error::Error;
pub use crate::measurement::{Counter, Gauge, GaugeValue, Measurement, MeasurementKind, Summary};
pub use crate::number::Number;
pub use crate::publish::{PublishError, Publisher};
pub use crate::validate::{MAX_NAME_LEN, ValidationError, ValidationErrorBuilder, validate_name};

pub(crate) type CowStr = std::borrow::Cow<'static, str>;

pub mod aggregate;
pub mod batch;
mod error;
pub mod measurement;
mod number;
pub mod publish;
mod validate;

#[cfg(feature = "serde")]
mod wire;

#[cfg(feature = "test-util")]
pub mod test_util;
