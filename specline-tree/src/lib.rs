// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generate hierarchical JSON test reports in Rust.
//!
//! The root of a report is a [`Suite`]: a named collection of [`Spec`]s
//! (individual test cases) and nested suites. A fully built tree serializes
//! to compact JSON via [`Suite::serialize`] or [`Suite::to_json_string`].

mod errors;
mod report;
mod serialize;

pub use errors::*;
pub use report::*;
