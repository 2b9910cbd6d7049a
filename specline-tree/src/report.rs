// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{SerializeError, SpecStatusParseError},
    serialize::serialize_suite,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::{fmt, io, str::FromStr};

/// The identity of a suite, assigned by the host framework.
///
/// Identities are opaque and stable: every event referring to the same suite
/// carries the same id.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteId(String);

impl SuiteId {
    /// Creates a new `SuiteId`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SuiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SuiteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SuiteId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// The identity of a spec, assigned by the host framework.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecId(String);

impl SpecId {
    /// Creates a new `SpecId`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpecId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SpecId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// A named collection of specs and nested suites.
///
/// A `Suite` owns its children: nested suites and specs appear inline in the
/// serialized form, in arrival order. The parent relation is deliberately not
/// part of this type — it is navigational state that belongs to whoever
/// builds the tree, and serializing it would encode a cycle.
///
/// The failure/skip/disable counters cover only specs directly owned by this
/// suite; they are maintained by the caller as specs complete and are not
/// recomputed by [`add_spec`](Self::add_spec).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suite {
    /// The identity of this suite.
    pub id: SuiteId,

    /// The suite description, as supplied by the framework.
    pub description: String,

    /// The framework's fully-qualified name for this suite.
    pub full_name: String,

    /// The status the framework reported for the suite as a whole, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// The time at which the suite started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<FixedOffset>>,

    /// The time at which the suite finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,

    /// The number of directly-owned specs that failed.
    pub failed_count: usize,

    /// The number of directly-owned specs that were skipped (pending).
    pub skipped_count: usize,

    /// The number of directly-owned specs that were disabled.
    pub disabled_count: usize,

    /// Nested suites, in arrival order.
    pub suites: Vec<Suite>,

    /// Directly-owned specs, in arrival order.
    pub specs: Vec<Spec>,
}

impl Suite {
    /// Creates a new `Suite` with the given identity and description.
    ///
    /// The full name defaults to the description; use
    /// [`set_full_name`](Self::set_full_name) if the framework supplies a
    /// qualified one.
    pub fn new(id: impl Into<SuiteId>, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            id: id.into(),
            full_name: description.clone(),
            description,
            status: None,
            start_time: None,
            end_time: None,
            failed_count: 0,
            skipped_count: 0,
            disabled_count: 0,
            suites: vec![],
            specs: vec![],
        }
    }

    /// Sets the fully-qualified name for this suite.
    pub fn set_full_name(&mut self, full_name: impl Into<String>) -> &mut Self {
        self.full_name = full_name.into();
        self
    }

    /// Sets the framework-reported status for this suite.
    pub fn set_status(&mut self, status: impl Into<String>) -> &mut Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the start timestamp for this suite.
    pub fn set_start_time(&mut self, start_time: impl Into<DateTime<FixedOffset>>) -> &mut Self {
        self.start_time = Some(start_time.into());
        self
    }

    /// Sets the end timestamp for this suite.
    pub fn set_end_time(&mut self, end_time: impl Into<DateTime<FixedOffset>>) -> &mut Self {
        self.end_time = Some(end_time.into());
        self
    }

    /// Appends a nested suite.
    pub fn add_suite(&mut self, suite: Suite) -> &mut Self {
        self.suites.push(suite);
        self
    }

    /// Appends a spec.
    ///
    /// This does not touch the counters: they reflect completion events, not
    /// tree membership.
    pub fn add_spec(&mut self, spec: Spec) -> &mut Self {
        self.specs.push(spec);
        self
    }

    /// Serializes this suite subtree as compact JSON to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_suite(self, writer)
    }

    /// Serializes this suite subtree to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        // serde_json only ever emits valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// A single executable test case.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    /// The identity of this spec.
    pub id: SpecId,

    /// The spec description, as supplied by the framework.
    pub description: String,

    /// The framework's fully-qualified name for this spec, if supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// The terminal status of this spec. `None` until the spec completes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SpecStatus>,

    /// The time at which the spec started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<FixedOffset>>,

    /// The time at which the spec finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<FixedOffset>>,

    /// Filename of the screenshot captured for this spec, if one was
    /// requested. The capture itself may still be in flight when the report
    /// is written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl Spec {
    /// Creates a new `Spec` with the given identity and description.
    pub fn new(id: impl Into<SpecId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            full_name: None,
            status: None,
            start_time: None,
            end_time: None,
            screenshot: None,
        }
    }

    /// Sets the fully-qualified name for this spec.
    pub fn set_full_name(&mut self, full_name: impl Into<String>) -> &mut Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Sets the status of this spec.
    pub fn set_status(&mut self, status: SpecStatus) -> &mut Self {
        self.status = Some(status);
        self
    }

    /// Sets the start timestamp for this spec.
    pub fn set_start_time(&mut self, start_time: impl Into<DateTime<FixedOffset>>) -> &mut Self {
        self.start_time = Some(start_time.into());
        self
    }

    /// Sets the end timestamp for this spec.
    pub fn set_end_time(&mut self, end_time: impl Into<DateTime<FixedOffset>>) -> &mut Self {
        self.end_time = Some(end_time.into());
        self
    }

    /// Records the filename of the screenshot captured for this spec.
    pub fn set_screenshot(&mut self, screenshot: impl Into<String>) -> &mut Self {
        self.screenshot = Some(screenshot.into());
        self
    }
}

/// The terminal status of a spec.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecStatus {
    /// The spec ran and passed.
    Passed,

    /// The spec ran and failed.
    Failed,

    /// The spec was skipped (a pending spec).
    Pending,

    /// The spec was disabled and never ran.
    Disabled,

    /// The spec was excluded from the run by the framework.
    Excluded,
}

impl SpecStatus {
    /// Returns the string values recognized by [`FromStr`].
    pub fn variants() -> &'static [&'static str] {
        &["passed", "failed", "pending", "disabled", "excluded"]
    }

    /// Returns true if this status counts as a failure.
    pub fn is_failed(self) -> bool {
        self == SpecStatus::Failed
    }

    /// Returns true if this status counts as skipped.
    pub fn is_skipped(self) -> bool {
        self == SpecStatus::Pending
    }

    /// Returns true if this status counts as disabled.
    pub fn is_disabled(self) -> bool {
        self == SpecStatus::Disabled
    }

    fn as_str(self) -> &'static str {
        match self {
            SpecStatus::Passed => "passed",
            SpecStatus::Failed => "failed",
            SpecStatus::Pending => "pending",
            SpecStatus::Disabled => "disabled",
            SpecStatus::Excluded => "excluded",
        }
    }
}

impl fmt::Display for SpecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpecStatus {
    type Err = SpecStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passed" => Ok(SpecStatus::Passed),
            "failed" => Ok(SpecStatus::Failed),
            "pending" => Ok(SpecStatus::Pending),
            "disabled" => Ok(SpecStatus::Disabled),
            "excluded" => Ok(SpecStatus::Excluded),
            other => Err(SpecStatusParseError::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("passed", SpecStatus::Passed; "passed")]
    #[test_case("failed", SpecStatus::Failed; "failed")]
    #[test_case("pending", SpecStatus::Pending; "pending")]
    #[test_case("disabled", SpecStatus::Disabled; "disabled")]
    #[test_case("excluded", SpecStatus::Excluded; "excluded")]
    fn status_roundtrips_through_str(input: &str, expected: SpecStatus) {
        let status: SpecStatus = input.parse().expect("known status parses");
        assert_eq!(status, expected);
        assert_eq!(status.to_string(), input);
    }

    #[test]
    fn unknown_status_lists_variants() {
        let err = "exploded".parse::<SpecStatus>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("exploded"), "message: {message}");
        assert!(message.contains("pending"), "message: {message}");
    }

    #[test]
    fn status_classification_is_exclusive() {
        for status in [
            SpecStatus::Passed,
            SpecStatus::Failed,
            SpecStatus::Pending,
            SpecStatus::Disabled,
            SpecStatus::Excluded,
        ] {
            let matches = [
                status.is_failed(),
                status.is_skipped(),
                status.is_disabled(),
            ]
            .iter()
            .filter(|m| **m)
            .count();
            assert!(matches <= 1, "{status} matched {matches} counters");
        }
    }

    #[test]
    fn suite_full_name_defaults_to_description() {
        let mut suite = Suite::new("s1", "Login");
        assert_eq!(suite.full_name, "Login");

        suite.set_full_name("Auth Login");
        assert_eq!(suite.full_name, "Auth Login");
        assert_eq!(suite.description, "Login");
    }

    #[test]
    fn add_spec_does_not_touch_counters() {
        let mut suite = Suite::new("s1", "Login");
        let mut spec = Spec::new("1", "fails");
        spec.set_status(SpecStatus::Failed);
        suite.add_spec(spec);

        assert_eq!(suite.specs.len(), 1);
        assert_eq!(suite.failed_count, 0);
    }
}
