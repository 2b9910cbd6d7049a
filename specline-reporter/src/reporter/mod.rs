// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregates suite lifecycle events into a result tree and serializes it.
//!
//! The main structure in this module is [`Reporter`].

mod consolidate;
mod events;
mod helpers;
mod imp;
mod registry;

pub use events::*;
pub use imp::{FOCUSED_SUITE_ID, Reporter, ReporterBuilder, RunStats};
