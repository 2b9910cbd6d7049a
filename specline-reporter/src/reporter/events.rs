// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle events produced by the host test framework.
//!
//! Events are consumed by a [`Reporter`](crate::reporter::Reporter). Payloads
//! are partial by design: each event supplies whatever attributes the
//! framework happened to include, and later events refine earlier ones.

use chrono::{DateTime, FixedOffset, Local};
use specline_tree::{SpecId, SpecStatus, SuiteId};

/// A suite lifecycle event.
#[derive(Clone, Debug)]
pub struct SuiteEvent {
    /// The time at which the event was generated, including the offset from
    /// UTC.
    pub timestamp: DateTime<FixedOffset>,

    /// The kind of event this is.
    pub kind: SuiteEventKind,
}

impl SuiteEvent {
    /// Creates a new event with the given timestamp.
    pub fn new(timestamp: impl Into<DateTime<FixedOffset>>, kind: SuiteEventKind) -> Self {
        Self {
            timestamp: timestamp.into(),
            kind,
        }
    }

    /// Creates a new event stamped with the current local time.
    pub fn now(kind: SuiteEventKind) -> Self {
        Self::new(Local::now().fixed_offset(), kind)
    }
}

/// The kind of suite event this is.
///
/// Forms part of [`SuiteEvent`].
#[derive(Clone, Debug)]
pub enum SuiteEventKind {
    /// The test run started.
    RunStarted {
        /// Summary information supplied by the framework, if any.
        summary: Option<RunSummary>,
    },

    /// A suite started.
    SuiteStarted(SuiteData),

    /// A spec started running.
    ///
    /// A spec can start with no suite open at all: a focused spec runs in
    /// isolation and its enclosing suite never starts. The reporter adopts
    /// such specs into a sentinel suite.
    SpecStarted(SpecData),

    /// A spec finished running.
    SpecFinished(SpecData),

    /// A suite finished.
    ///
    /// Frameworks skip the matching [`SuiteStarted`](Self::SuiteStarted) for
    /// suites that are disabled wholesale; the reporter absorbs that shape.
    SuiteFinished(SuiteData),

    /// The test run finished. Triggers report serialization.
    RunFinished,
}

/// Run-level summary attached to [`SuiteEventKind::RunStarted`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RunSummary {
    /// The number of specs the framework defined for this run.
    pub total_specs_defined: Option<usize>,
}

/// Partial suite attributes carried by a suite event.
#[derive(Clone, Debug)]
pub struct SuiteData {
    /// The identity of the suite.
    pub id: SuiteId,

    /// The suite description.
    pub description: Option<String>,

    /// The framework's fully-qualified suite name.
    pub full_name: Option<String>,

    /// The framework-reported suite status.
    pub status: Option<String>,
}

impl SuiteData {
    /// Creates a payload carrying only the identity.
    pub fn new(id: impl Into<SuiteId>) -> Self {
        Self {
            id: id.into(),
            description: None,
            full_name: None,
            status: None,
        }
    }
}

/// Partial spec attributes carried by a spec event.
#[derive(Clone, Debug)]
pub struct SpecData {
    /// The identity of the spec.
    pub id: SpecId,

    /// The spec description.
    pub description: Option<String>,

    /// The framework's fully-qualified spec name.
    pub full_name: Option<String>,

    /// The spec status. Typically present on completion events only.
    pub status: Option<SpecStatus>,
}

impl SpecData {
    /// Creates a payload carrying only the identity.
    pub fn new(id: impl Into<SpecId>) -> Self {
        Self {
            id: id.into(),
            description: None,
            full_name: None,
            status: None,
        }
    }
}
