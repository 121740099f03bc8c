// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use assert_json_diff::assert_json_eq;
use metric_funnel::{
    Aggregate, Batch, Counter, Error, ErrorSink, Gauge, PublishError, Publisher,
};
use metric_funnel_http::{Config, Credentials, HttpPublisher, connect};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{basic_auth, header, method, path},
};

fn credentials() -> Credentials {
    Credentials::new("ops@example.com", "secret-key")
}

// reqwest's blocking client must not be created or dropped on an async runtime thread
async fn blocking<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    tokio::task::spawn_blocking(f).await.unwrap()
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/v1/metrics", server.uri())
}

#[tokio::test]
async fn posts_batch_as_json_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/metrics"))
        .and(basic_auth("ops@example.com", "secret-key"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = endpoint(&server);
    blocking(move || {
        let mut publisher = HttpPublisher::builder(credentials())
            .endpoint(endpoint)
            .build()
            .unwrap();
        let mut batch = Batch::new();
        batch.push(Gauge::new("splines", 7).with_source("web-1"));
        batch.push(Counter::new("requests", 42).with_measure_time(1_700_000_000));
        publisher.publish(&batch).unwrap();
    })
    .await;

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_json_eq!(
        body,
        json!({
            "gauges": [{"name": "splines", "value": 7, "source": "web-1"}],
            "counters": [{"name": "requests", "value": 42, "measure_time": 1_700_000_000}],
        })
    );
}

#[tokio::test]
async fn aggregate_is_sent_as_summary_gauge() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let endpoint = endpoint(&server);
    blocking(move || {
        let mut publisher = HttpPublisher::builder(credentials())
            .endpoint(endpoint)
            .build()
            .unwrap();
        let mut agg = Aggregate::new("latency");
        agg.extend([1.0, 2.0, 3.0]);
        publisher
            .publish(&Batch::from_iter([agg.to_gauge()]))
            .unwrap();
    })
    .await;

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_json_eq!(
        body,
        json!({
            "gauges": [{
                "name": "latency",
                "count": 3,
                "sum": 6.0,
                "min": 1.0,
                "max": 3.0,
                "sum_squares": 2.0,
            }],
        })
    );
}

#[tokio::test]
async fn rejected_batch_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let endpoint = endpoint(&server);
    let result = blocking(move || {
        let mut publisher = HttpPublisher::builder(credentials())
            .endpoint(endpoint)
            .build()
            .unwrap();
        publisher.publish(&Batch::from_iter([Counter::new("requests", 1)]))
    })
    .await;

    match result {
        Err(PublishError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad credentials");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_names_are_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let endpoint = endpoint(&server);
    let result = blocking(move || {
        let mut publisher = HttpPublisher::builder(credentials())
            .endpoint(endpoint)
            .build()
            .unwrap();
        publisher.publish(&Batch::from_iter([
            Gauge::new("ok", 1),
            Gauge::new("has spaces", 2),
        ]))
    })
    .await;

    let Err(PublishError::Validation(err)) = result else {
        panic!("expected a validation error, got {result:?}");
    };
    assert_eq!(err.reasons().len(), 1);
}

#[tokio::test]
async fn unreachable_collector_is_a_transport_error() {
    // grab a free port, then close it so the connection is refused
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let result = blocking(move || {
        let mut publisher = HttpPublisher::builder(credentials())
            .endpoint(format!("http://127.0.0.1:{port}/v1/metrics"))
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        publisher.publish(&Batch::from_iter([Counter::new("requests", 1)]))
    })
    .await;
    assert!(matches!(result, Err(PublishError::Transport(_))));
}

#[tokio::test]
async fn connected_client_publishes_on_shutdown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/metrics"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::new(credentials());
    config.endpoint = Some(endpoint(&server));
    config.harvest_interval = Some(Duration::from_secs(3600));
    let (errors, receiver) = ErrorSink::bounded(8);
    let stats = blocking(move || {
        let client = connect(config, errors).unwrap();
        client.add_gauge(Gauge::new("splines", 1.5));
        client.add_counter(Counter::new("requests", 3));
        client.shutdown();
        client.stats()
    })
    .await;

    assert_eq!(stats.batches_published, 1);
    assert_eq!(stats.measurements_published, 2);
    assert!(receiver.is_empty());
}

#[tokio::test]
async fn collector_failure_reaches_error_sink() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut config = Config::new(credentials());
    config.endpoint = Some(endpoint(&server));
    config.harvest_interval = Some(Duration::from_secs(3600));
    let (errors, receiver) = ErrorSink::bounded(8);
    blocking(move || {
        let client = connect(config, errors).unwrap();
        client.add_counter(Counter::new("requests", 3));
        client.shutdown();
    })
    .await;

    assert!(matches!(
        receiver.try_recv(),
        Ok(Error::Publish {
            gauges: 0,
            counters: 1,
            source: PublishError::Status { status: 503, .. }
        })
    ));
}
