// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use metric_funnel::{Client, ClientBuilder, DEFAULT_CAPACITY, ErrorSink};

use crate::{Credentials, HttpPublisher};

/// Everything needed to start a [`Client`] publishing to the hosted collector.
#[derive(Clone, Debug)]
pub struct Config {
    /// Credentials for the collector account.
    pub credentials: Credentials,
    /// Queue size. `None` or `Some(0)` use the default of 600.
    pub queue_capacity: Option<usize>,
    /// Collector endpoint. `None` uses [`DEFAULT_ENDPOINT`](crate::DEFAULT_ENDPOINT).
    pub endpoint: Option<String>,
    /// Harvest period. `None` uses one second.
    pub harvest_interval: Option<Duration>,
}

impl Config {
    /// Configuration with the given credentials and default everything else.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            queue_capacity: None,
            endpoint: None,
            harvest_interval: None,
        }
    }
}

/// Errors starting a client with [`connect`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConnectError {
    /// A credential environment variable is unset or empty.
    #[error("environment variable {var} is not set")]
    MissingCredential {
        /// The variable name.
        var: &'static str,
    },
    /// The endpoint isn't a valid URL.
    #[error("invalid collector endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    /// The HTTP client couldn't be built, e.g. because TLS failed to initialize.
    #[error("couldn't build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    /// The harvest thread couldn't be spawned.
    #[error("couldn't spawn harvest thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Start a [`Client`] that publishes every harvest to the collector described by `config`.
///
/// Background errors (dropped measurements, failed publishes) go to `errors`.
pub fn connect(config: Config, errors: impl Into<ErrorSink>) -> Result<Client, ConnectError> {
    let mut publisher = HttpPublisher::builder(config.credentials);
    if let Some(endpoint) = config.endpoint {
        publisher = publisher.endpoint(endpoint);
    }
    let publisher = publisher.build()?;

    let capacity = config
        .queue_capacity
        .filter(|&c| c > 0)
        .unwrap_or(DEFAULT_CAPACITY);
    let mut builder = ClientBuilder::new()
        .capacity(capacity)
        .thread_name("metric-funnel-http");
    if let Some(interval) = config.harvest_interval {
        builder = builder.harvest_interval(interval);
    }
    Ok(builder.build(publisher, errors)?)
}
