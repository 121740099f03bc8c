// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use crate::config::{Config, ConnectError, connect};
pub use crate::credentials::{API_KEY_VAR, Credentials, EMAIL_VAR};
pub use crate::publisher::{DEFAULT_ENDPOINT, HttpPublisher, HttpPublisherBuilder};

mod config;
mod credentials;
mod publisher;
