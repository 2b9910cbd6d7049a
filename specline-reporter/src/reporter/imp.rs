// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reporter: a reducer over suite lifecycle events.

use super::{
    consolidate::write_reports,
    events::{RunSummary, SpecData, SuiteData, SuiteEvent, SuiteEventKind},
    helpers::sanitize_filename,
    registry::EventRegistry,
};
use crate::{
    artifact::{ArtifactWriter, FsArtifactWriter},
    capture::{CaptureSource, ScreenshotCapturer},
    config::ReporterConfig,
};
use chrono::{DateTime, FixedOffset};
use debug_ignore::DebugIgnore;
use specline_tree::{SpecId, SpecStatus, SuiteId};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Identity of the sentinel suite that adopts specs whose enclosing suite
/// never started (focused specs). All such specs in a run share one sentinel.
pub const FOCUSED_SUITE_ID: &str = "focused";

const FOCUSED_SUITE_NAME: &str = "focused specs";

fn focused_suite_data() -> SuiteData {
    SuiteData {
        id: FOCUSED_SUITE_ID.into(),
        description: Some(FOCUSED_SUITE_NAME.to_owned()),
        full_name: Some(FOCUSED_SUITE_NAME.to_owned()),
        status: None,
    }
}

/// Where the run currently is in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum RunState {
    Idle,
    Running,
    Finished,
}

/// Spec counts for the run as a whole.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    /// The number of specs the framework said it defined, if it said.
    pub defined: Option<usize>,

    /// The number of specs that completed. A spec completing more than once
    /// is counted once.
    pub executed: usize,
}

/// Reporter builder.
#[derive(Debug)]
pub struct ReporterBuilder {
    config: ReporterConfig,
    capture_source: DebugIgnore<Option<Arc<dyn CaptureSource>>>,
    runtime_handle: Option<Handle>,
    writers: Vec<Box<dyn ArtifactWriter>>,
}

impl ReporterBuilder {
    /// Creates a builder with the given configuration.
    pub fn new(config: ReporterConfig) -> Self {
        Self {
            config,
            capture_source: DebugIgnore(None),
            runtime_handle: None,
            writers: Vec::new(),
        }
    }

    /// Sets the source screenshots are captured from.
    ///
    /// Without a source, capture is disabled regardless of configuration.
    pub fn set_capture_source(&mut self, source: Arc<dyn CaptureSource>) -> &mut Self {
        self.capture_source = DebugIgnore(Some(source));
        self
    }

    /// Sets the tokio runtime capture tasks are spawned on. Defaults to the
    /// runtime current at build time, if any.
    pub fn set_runtime_handle(&mut self, handle: Handle) -> &mut Self {
        self.runtime_handle = Some(handle);
        self
    }

    /// Adds an artifact writer to the fallback chain. Writers are tried in
    /// insertion order; when none is added, the filesystem writer is used.
    pub fn add_artifact_writer(&mut self, writer: Box<dyn ArtifactWriter>) -> &mut Self {
        self.writers.push(writer);
        self
    }

    /// Builds the reporter.
    pub fn build(self) -> Reporter {
        let Self {
            config,
            capture_source,
            runtime_handle,
            mut writers,
        } = self;

        if writers.is_empty() {
            writers.push(Box::new(FsArtifactWriter));
        }

        let capturer = match capture_source.0 {
            Some(source) if config.capture_screenshots => {
                match runtime_handle.or_else(|| Handle::try_current().ok()) {
                    Some(handle) => Some(ScreenshotCapturer::new(
                        source,
                        config.screenshots_path(),
                        handle,
                    )),
                    None => {
                        warn!("screenshot capture disabled: no tokio runtime available");
                        None
                    }
                }
            }
            _ => None,
        };

        Reporter {
            config,
            registry: EventRegistry::default(),
            state: RunState::Idle,
            current: None,
            top_level: Vec::new(),
            stats: RunStats::default(),
            started_at: None,
            finished_at: None,
            capturer,
            writers,
        }
    }
}

/// Aggregates suite lifecycle events into a result tree and serializes it
/// when the run finishes.
///
/// Events are expected to arrive serially; the reporter is a plain reducer
/// over them. No event can fail the host's run: every recoverable condition
/// is logged and absorbed, including the two degenerate event shapes some
/// frameworks produce (a spec starting with no suite open, and a suite
/// finishing that never started).
#[derive(Debug)]
pub struct Reporter {
    config: ReporterConfig,
    registry: EventRegistry,
    state: RunState,
    /// The innermost suite currently open.
    current: Option<SuiteId>,
    /// Top-level suites in arrival order.
    top_level: Vec<SuiteId>,
    stats: RunStats,
    started_at: Option<DateTime<FixedOffset>>,
    finished_at: Option<DateTime<FixedOffset>>,
    capturer: Option<ScreenshotCapturer>,
    writers: Vec<Box<dyn ArtifactWriter>>,
}

impl Reporter {
    /// Creates a reporter with the given configuration and defaults for
    /// everything else.
    pub fn new(config: ReporterConfig) -> Self {
        ReporterBuilder::new(config).build()
    }

    /// Consumes one lifecycle event.
    pub fn report_event(&mut self, event: SuiteEvent) {
        let SuiteEvent { timestamp, kind } = event;
        match kind {
            SuiteEventKind::RunStarted { summary } => self.on_run_started(timestamp, summary),
            SuiteEventKind::SuiteStarted(data) => self.on_suite_started(timestamp, data),
            SuiteEventKind::SpecStarted(data) => self.on_spec_started(timestamp, data),
            SuiteEventKind::SpecFinished(data) => self.on_spec_finished(timestamp, data),
            SuiteEventKind::SuiteFinished(data) => self.on_suite_finished(timestamp, data),
            SuiteEventKind::RunFinished => self.on_run_finished(timestamp),
        }
    }

    /// True once run-started has been seen.
    pub fn is_started(&self) -> bool {
        self.state != RunState::Idle
    }

    /// True once run-done has been processed and reports are written.
    pub fn is_finished(&self) -> bool {
        self.state == RunState::Finished
    }

    /// Spec counts for the current run.
    pub fn run_stats(&self) -> RunStats {
        self.stats
    }

    /// The time the current run started, if it has.
    pub fn started_at(&self) -> Option<DateTime<FixedOffset>> {
        self.started_at
    }

    /// The time the current run finished, if it has.
    pub fn finished_at(&self) -> Option<DateTime<FixedOffset>> {
        self.finished_at
    }

    fn on_run_started(&mut self, timestamp: DateTime<FixedOffset>, summary: Option<RunSummary>) {
        self.state = RunState::Running;
        self.registry.clear();
        self.current = None;
        self.top_level.clear();
        self.stats = RunStats {
            defined: summary.and_then(|summary| summary.total_specs_defined),
            executed: 0,
        };
        self.started_at = Some(timestamp);
        self.finished_at = None;

        if self.config.clean_output_dir && !self.config.output_dir.as_str().is_empty() {
            if let Err(error) = std::fs::remove_dir_all(&self.config.output_dir) {
                debug!(%error, dir = %self.config.output_dir, "previous output not removed");
            }
        }
    }

    fn on_suite_started(&mut self, timestamp: DateTime<FixedOffset>, data: SuiteData) {
        let open_parent = self.current.clone();
        let id = data.id.clone();

        let entry = self.registry.upsert_suite(&data);
        entry.node.start_time = Some(timestamp);
        let attach = entry.never_started();
        if attach {
            // The parent is set exactly once, at creation.
            entry.parent = Some(open_parent.clone());
        }

        if attach {
            match &open_parent {
                Some(parent_id) => {
                    if let Some(parent) = self.registry.suite_mut(parent_id) {
                        parent.child_suites.push(id.clone());
                    }
                }
                None => self.top_level.push(id.clone()),
            }
        }

        self.current = Some(id);
    }

    fn on_spec_started(&mut self, timestamp: DateTime<FixedOffset>, data: SpecData) {
        if self.current.is_none() {
            // A spec with no suite open is a focused spec: its enclosing
            // suite never started. Adopt it into the sentinel suite.
            self.on_suite_started(timestamp, focused_suite_data());
        }
        let owner = self.current.clone();
        let id = data.id.clone();

        let entry = self.registry.upsert_spec(&data);
        entry.node.start_time = Some(timestamp);
        let attach = entry.suite.is_none();
        if attach {
            entry.suite = owner.clone();
        }

        if attach {
            if let Some(owner_id) = &owner {
                if let Some(suite) = self.registry.suite_mut(owner_id) {
                    suite.child_specs.push(id);
                }
            }
        }
    }

    fn on_spec_finished(&mut self, timestamp: DateTime<FixedOffset>, data: SpecData) {
        let entry = self.registry.upsert_spec(&data);
        entry.node.end_time = Some(timestamp);
        if entry.finished {
            // Already completed; the merge above refreshed attributes and
            // the terminal status stayed put.
            return;
        }
        entry.finished = true;

        let status = entry.node.status;
        let description = entry.node.description.clone();
        let owner = entry.suite.clone();

        self.stats.executed += 1;

        match (&owner, status) {
            (Some(owner_id), Some(status)) => {
                if let Some(suite) = self.registry.suite_mut(owner_id) {
                    if status.is_failed() {
                        suite.node.failed_count += 1;
                    } else if status.is_skipped() {
                        suite.node.skipped_count += 1;
                    } else if status.is_disabled() {
                        suite.node.disabled_count += 1;
                    }
                }
            }
            (None, _) => {
                debug!(id = %data.id, "spec completed outside any suite");
            }
            _ => {}
        }

        self.maybe_capture(&data.id, &description, status);
    }

    fn on_suite_finished(&mut self, timestamp: DateTime<FixedOffset>, data: SuiteData) {
        let needs_start = self
            .registry
            .suite(&data.id)
            .is_none_or(|entry| entry.never_started());
        if needs_start {
            // A suite can finish without ever starting (a wholesale-disabled
            // suite). Synthesize the missing start from the same payload.
            self.on_suite_started(timestamp, data.clone());
        }

        let entry = self.registry.upsert_suite(&data);
        entry.node.end_time = Some(timestamp);
        self.current = entry.parent_id().cloned();
    }

    fn on_run_finished(&mut self, timestamp: DateTime<FixedOffset>) {
        // A focused-spec sentinel (or anything else still open) never saw
        // its own finish event; close the chain before serializing.
        while let Some(open) = self.current.clone() {
            self.on_suite_finished(timestamp, SuiteData::new(open));
        }

        self.finished_at = Some(timestamp);
        self.state = RunState::Finished;

        write_reports(&self.registry, &self.top_level, &self.config, &self.writers);
    }

    /// Requests a screenshot for a just-completed spec, per policy. The
    /// filename is recorded on the spec record immediately; the capture
    /// itself races the rest of the run and is never awaited.
    fn maybe_capture(&mut self, id: &SpecId, description: &str, status: Option<SpecStatus>) {
        let Some(capturer) = &self.capturer else {
            return;
        };
        let failed = status.is_some_and(SpecStatus::is_failed);
        if self.config.capture_only_on_failures && !failed {
            return;
        }

        let filename = if self.config.fixed_screenshot_name {
            format!("{}.png", sanitize_filename(description))
        } else {
            format!("{}.png", Uuid::new_v4().simple())
        };
        if let Some(entry) = self.registry.spec_mut(id) {
            entry.node.screenshot = Some(filename.clone());
        }
        capturer.request(&filename);
    }
}
