// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge-by-identity store for partially-known suites and specs.

use super::events::{SpecData, SuiteData};
use indexmap::IndexMap;
use specline_tree::{Spec, SpecId, Suite, SuiteId};

/// Latest known attributes for every suite and spec identity seen so far.
///
/// Records are created on first reference and refined by shallow merges: a
/// payload's present fields overwrite the stored value, absent fields are
/// left alone, and nothing is ever deleted mid-run. Re-applying the same
/// payload is idempotent. Insertion order is preserved.
#[derive(Clone, Debug, Default)]
pub(crate) struct EventRegistry {
    suites: IndexMap<SuiteId, SuiteEntry>,
    specs: IndexMap<SpecId, SpecEntry>,
}

impl EventRegistry {
    pub(crate) fn clear(&mut self) {
        self.suites.clear();
        self.specs.clear();
    }

    pub(crate) fn upsert_suite(&mut self, data: &SuiteData) -> &mut SuiteEntry {
        let entry = self
            .suites
            .entry(data.id.clone())
            .or_insert_with(|| SuiteEntry::new(data.id.clone()));
        entry.merge(data);
        entry
    }

    pub(crate) fn upsert_spec(&mut self, data: &SpecData) -> &mut SpecEntry {
        let entry = self
            .specs
            .entry(data.id.clone())
            .or_insert_with(|| SpecEntry::new(data.id.clone()));
        entry.merge(data);
        entry
    }

    pub(crate) fn suite(&self, id: &SuiteId) -> Option<&SuiteEntry> {
        self.suites.get(id)
    }

    pub(crate) fn suite_mut(&mut self, id: &SuiteId) -> Option<&mut SuiteEntry> {
        self.suites.get_mut(id)
    }

    pub(crate) fn spec(&self, id: &SpecId) -> Option<&SpecEntry> {
        self.specs.get(id)
    }

    pub(crate) fn spec_mut(&mut self, id: &SpecId) -> Option<&mut SpecEntry> {
        self.specs.get_mut(id)
    }
}

/// A suite record plus the structural state that never serializes.
#[derive(Clone, Debug)]
pub(crate) struct SuiteEntry {
    /// The eventual tree node. Its child vectors stay empty here; membership
    /// is tracked by id so back-references never flow into the payload.
    pub(crate) node: Suite,

    /// `None` until the suite-started path has run for this identity, then
    /// `Some(parent)`. Set exactly once.
    pub(crate) parent: Option<Option<SuiteId>>,

    pub(crate) child_suites: Vec<SuiteId>,
    pub(crate) child_specs: Vec<SpecId>,
}

impl SuiteEntry {
    fn new(id: SuiteId) -> Self {
        Self {
            node: Suite::new(id, ""),
            parent: None,
            child_suites: Vec::new(),
            child_specs: Vec::new(),
        }
    }

    fn merge(&mut self, data: &SuiteData) {
        if let Some(description) = &data.description {
            self.node.description = description.clone();
        }
        if let Some(full_name) = &data.full_name {
            self.node.full_name = full_name.clone();
        }
        if let Some(status) = &data.status {
            self.node.status = Some(status.clone());
        }
    }

    /// The parent suite id, if this entry has been started and has a parent.
    pub(crate) fn parent_id(&self) -> Option<&SuiteId> {
        self.parent.as_ref().and_then(|parent| parent.as_ref())
    }

    /// True if no suite-started has been observed or synthesized yet.
    pub(crate) fn never_started(&self) -> bool {
        self.parent.is_none()
    }
}

/// A spec record plus its owning-suite relation.
#[derive(Clone, Debug)]
pub(crate) struct SpecEntry {
    pub(crate) node: Spec,

    /// The directly-owning suite. Set exactly once, when the spec is first
    /// attached.
    pub(crate) suite: Option<SuiteId>,

    /// Set once the completion event for this identity has been processed;
    /// guards the terminal status and the completion side effects.
    pub(crate) finished: bool,
}

impl SpecEntry {
    fn new(id: SpecId) -> Self {
        Self {
            node: Spec::new(id, ""),
            suite: None,
            finished: false,
        }
    }

    fn merge(&mut self, data: &SpecData) {
        if let Some(description) = &data.description {
            self.node.description = description.clone();
        }
        if let Some(full_name) = &data.full_name {
            self.node.full_name = Some(full_name.clone());
        }
        // A terminal status is immutable.
        if !self.finished {
            if let Some(status) = data.status {
                self.node.status = Some(status);
            }
        }
    }
}
