// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree assembly, serialization, and the consolidation policy.

use super::{helpers::qualified_suite_name, registry::EventRegistry};
use crate::{
    artifact::ArtifactWriter,
    config::{REPORT_EXTENSION, ReporterConfig},
};
use camino::Utf8Path;
use specline_tree::{Suite, SuiteId};
use tracing::warn;

/// Walks the finished top-level suites and writes one or more artifacts
/// according to the consolidation policy: everything into one buffer
/// (consolidate-all), or one artifact per top-level suite, named after its
/// qualified name.
pub(crate) fn write_reports(
    registry: &EventRegistry,
    top_level: &[SuiteId],
    config: &ReporterConfig,
    writers: &[Box<dyn ArtifactWriter>],
) {
    let mut consolidated = String::new();

    for id in top_level {
        let Some(entry) = registry.suite(id) else {
            continue;
        };
        let Some(suite) = assemble_suite(registry, id) else {
            continue;
        };
        let output = match suite.to_json_string() {
            Ok(output) => output,
            Err(error) => {
                warn!(%error, suite = %id, "could not serialize suite; skipping");
                continue;
            }
        };

        if config.consolidate_all() || (config.consolidate && entry.parent_id().is_some()) {
            consolidated.push_str(&output);
        } else {
            let name = format!(
                "{}{}",
                config.effective_file_prefix(),
                qualified_suite_name(registry, id, true, config.use_dot_notation)
            );
            write_artifact(
                writers,
                &config.output_dir,
                &with_report_extension(name),
                &output,
            );
        }
    }

    if !consolidated.is_empty() {
        let name = with_report_extension(config.effective_file_prefix().to_owned());
        write_artifact(writers, &config.output_dir, &name, &consolidated);
    }
}

/// Assembles the owned subtree for a suite: attributes and counters from the
/// registry entry, child suites and specs nested in arrival order. The
/// registry's parent relation stays behind — the assembled tree carries no
/// back-references.
fn assemble_suite(registry: &EventRegistry, id: &SuiteId) -> Option<Suite> {
    let entry = registry.suite(id)?;
    let mut node = entry.node.clone();
    for spec_id in &entry.child_specs {
        if let Some(spec) = registry.spec(spec_id) {
            node.add_spec(spec.node.clone());
        }
    }
    for child_id in &entry.child_suites {
        if let Some(child) = assemble_suite(registry, child_id) {
            node.add_suite(child);
        }
    }
    Some(node)
}

fn with_report_extension(mut name: String) -> String {
    if !name.ends_with(REPORT_EXTENSION) {
        name.push_str(REPORT_EXTENSION);
    }
    name
}

/// Tries each writer in turn; on total failure logs one diagnostic carrying
/// every attempt. Never propagates: report writing must not abort the run.
fn write_artifact(
    writers: &[Box<dyn ArtifactWriter>],
    dir: &Utf8Path,
    filename: &str,
    text: &str,
) {
    let mut attempts = Vec::new();
    for writer in writers {
        match writer.write(dir, filename, text) {
            Ok(()) => return,
            Err(error) => attempts.push(error.to_string()),
        }
    }
    warn!(
        %dir,
        filename,
        attempts = %attempts.join("; "),
        "writing report artifact failed"
    );
}
