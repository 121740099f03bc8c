// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Publishes a few measurements to the hosted collector.
//!
//! ```text
//! LIBRATO_EMAIL=... LIBRATO_APIKEY=... RUST_LOG=metric_funnel=debug cargo run --example publish
//! ```

use std::time::Duration;

use metric_funnel::{Aggregate, Counter, ErrorSink, Gauge};
use metric_funnel_http::{Config, ConnectError, Credentials, connect};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), ConnectError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut config = Config::new(Credentials::from_env()?);
    config.harvest_interval = Some(Duration::from_secs(2));
    let (errors, receiver) = ErrorSink::bounded(64);
    let client = connect(config, errors)?;

    let mut latency = Aggregate::new("example.latency").with_source("publish-example");
    for i in 0..10u32 {
        client.add_counter(Counter::new("example.requests", i));
        client.add_gauge(Gauge::new("example.load", f64::from(i) / 10.0));
        latency.add(f64::from(i * 7 % 13));
        std::thread::sleep(Duration::from_millis(300));
    }
    client.add_gauge(latency.to_gauge());
    client.shutdown();

    for err in receiver.try_iter() {
        eprintln!("metrics error: {err}");
    }
    println!("{:?}", client.stats());
    Ok(())
}
