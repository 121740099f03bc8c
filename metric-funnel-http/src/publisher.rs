// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use metric_funnel_core::{Batch, PublishError, Publisher};
use reqwest::blocking::Client as HttpClient;
use url::Url;

use crate::{ConnectError, Credentials};

/// The hosted collector's metrics endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://metrics-api.librato.com/v1/metrics";

/// Builder for [`HttpPublisher`]
#[derive(Debug)]
pub struct HttpPublisherBuilder {
    credentials: Credentials,
    endpoint: String,
    timeout: Duration,
    user_agent: String,
}

impl HttpPublisherBuilder {
    /// Sets the URL batches are POSTed to. Defaults to [`DEFAULT_ENDPOINT`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the timeout of a whole publish request, including reading the response.
    ///
    /// Defaults to 10 seconds. A publish blocks the harvest thread, so a long timeout delays the next harvest during
    /// a collector outage and more measurements are dropped from the full queue.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        assert!(timeout > Duration::ZERO, "timeout must not be zero");
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the publisher.
    pub fn build(self) -> Result<HttpPublisher, ConnectError> {
        let endpoint = Url::parse(&self.endpoint)?;
        let client = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()?;
        Ok(HttpPublisher {
            client,
            endpoint,
            credentials: self.credentials,
        })
    }
}

/// [`Publisher`] sending each batch as a JSON document over HTTP(S), authenticated with basic auth.
///
/// Any 2xx response is a success. Other statuses become [`PublishError::Status`] and connection problems
/// [`PublishError::Transport`]. Nothing is retried.
#[derive(Debug)]
pub struct HttpPublisher {
    client: HttpClient,
    endpoint: Url,
    credentials: Credentials,
}

impl HttpPublisher {
    /// Create a [`HttpPublisherBuilder`] with the default endpoint and timeout.
    pub fn builder(credentials: Credentials) -> HttpPublisherBuilder {
        HttpPublisherBuilder {
            credentials,
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout: Duration::from_secs(10),
            user_agent: concat!("metric-funnel/", env!("CARGO_PKG_VERSION")).into(),
        }
    }

    /// The URL batches are POSTed to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Publisher for HttpPublisher {
    fn publish(&mut self, batch: &Batch) -> Result<(), PublishError> {
        // the collector rejects the whole request for one bad name, don't bother sending it
        batch.validate()?;

        if tracing::enabled!(tracing::Level::TRACE) {
            match serde_json::to_string(batch) {
                Ok(payload) => tracing::trace!(%payload, "publishing metrics payload"),
                Err(err) => tracing::trace!(%err, "couldn't render metrics payload"),
            }
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .basic_auth(&self.credentials.email, Some(&self.credentials.api_key))
            .json(batch)
            .send()
            .map_err(PublishError::transport)?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%status, measurements = batch.len(), "metrics batch accepted");
            return Ok(());
        }
        // the body usually says which measurement was rejected
        let body = response.text().unwrap_or_default();
        Err(PublishError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use metric_funnel_core::Gauge;

    use super::*;

    #[test]
    fn defaults() {
        let publisher = HttpPublisher::builder(Credentials::new("a", "b"))
            .build()
            .unwrap();
        assert_eq!(publisher.endpoint().as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn invalid_batch_is_rejected_before_sending() {
        // nothing listens on port 1, a request would fail with a transport error instead
        let mut publisher = HttpPublisher::builder(Credentials::new("a", "b"))
            .endpoint("http://127.0.0.1:1/v1/metrics")
            .build()
            .unwrap();
        let batch = Batch::from_iter([Gauge::new("not valid!", 1)]);
        assert!(matches!(
            publisher.publish(&batch),
            Err(PublishError::Validation(_))
        ));
    }
}
