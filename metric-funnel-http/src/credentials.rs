// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::ConnectError;

/// Environment variable holding the account email, read by [`Credentials::from_env`].
pub const EMAIL_VAR: &str = "LIBRATO_EMAIL";
/// Environment variable holding the API key, read by [`Credentials::from_env`].
pub const API_KEY_VAR: &str = "LIBRATO_APIKEY";

/// Account email and API key used to authenticate with the collector.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub(crate) email: String,
    pub(crate) api_key: String,
}

impl Credentials {
    /// Create credentials from an account email and an API key.
    pub fn new(email: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            api_key: api_key.into(),
        }
    }

    /// Read the credentials from `LIBRATO_EMAIL` and `LIBRATO_APIKEY`.
    pub fn from_env() -> Result<Self, ConnectError> {
        Ok(Self::new(var(EMAIL_VAR)?, var(API_KEY_VAR)?))
    }

    /// The account email.
    pub fn email(&self) -> &str {
        &self.email
    }
}

fn var(name: &'static str) -> Result<String, ConnectError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConnectError::MissingCredential { var: name }),
    }
}

// never print the API key
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
