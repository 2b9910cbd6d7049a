// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::SpecStatus;
use thiserror::Error;

/// An error that occurs while serializing a [`Suite`](crate::Suite).
///
/// Returned by [`Suite::serialize`](crate::Suite::serialize) and
/// [`Suite::to_json_string`](crate::Suite::to_json_string).
#[derive(Debug, Error)]
#[error("error serializing JSON report")]
pub struct SerializeError {
    #[from]
    inner: serde_json::Error,
}

/// An error that occurs while parsing a [`SpecStatus`] from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized spec status: {input}\n(known values: {})",
    SpecStatus::variants().join(", ")
)]
pub struct SpecStatusParseError {
    input: String,
}

impl SpecStatusParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}
