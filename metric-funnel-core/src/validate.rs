// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Longest metric name accepted by the collector.
pub const MAX_NAME_LEN: usize = 255;

/// Every reason a [`Batch`](crate::Batch) was rejected before being sent, e.g. names using characters the collector
/// doesn't accept.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidationError(Vec<String>);

impl ValidationError {
    /// Create a builder that collects the failures of several checks into a single [`ValidationError`].
    /// If no failures are added, [`ValidationErrorBuilder::build()`] returns [`Ok`].
    pub fn builder() -> ValidationErrorBuilder {
        ValidationErrorBuilder::default()
    }

    /// Prefix every failure with the name of the measurement it was found in.
    pub fn for_measurement(mut self, name: &str) -> Self {
        for err in self.0.iter_mut() {
            *err = format!("for `{name}`: {err}");
        }
        self
    }

    /// The individual failure reasons.
    pub fn reasons(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Debug for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.0).finish()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates failures while a batch is checked.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrorBuilder(Vec<String>);

impl ValidationErrorBuilder {
    /// Returns [`Ok`] if no validation failures were recorded, otherwise [`Err`] with all of them.
    pub fn build(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self.0))
        }
    }

    /// Record a failure.
    pub fn invalid_mut(&mut self, reason: impl Into<String>) -> &mut Self {
        self.0.push(reason.into());
        self
    }

    /// Add all of the failures recorded in `error`.
    pub fn extend_mut(&mut self, error: ValidationError) -> &mut Self {
        self.0.extend(error.0);
        self
    }
}

/// Check that `name` is a metric name the collector accepts: 1 to 255 characters from `A-Za-z0-9.:-_`.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let mut builder = ValidationError::builder();
    if name.is_empty() {
        builder.invalid_mut("metric name is empty");
    }
    if name.len() > MAX_NAME_LEN {
        builder.invalid_mut(format!(
            "metric name is {} characters long, the limit is {MAX_NAME_LEN}",
            name.len()
        ));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | ':' | '-' | '_')))
    {
        builder.invalid_mut(format!("metric name contains invalid character {c:?}"));
    }
    builder.build()
}
