// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a [`Suite`] subtree.

use crate::{Suite, errors::SerializeError};
use std::io;

pub(crate) fn serialize_suite(
    suite: &Suite,
    writer: impl io::Write,
) -> Result<(), SerializeError> {
    serde_json::to_writer(writer, suite)?;
    Ok(())
}
