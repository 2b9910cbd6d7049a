// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reporter configuration.

use camino::Utf8PathBuf;
use serde::Deserialize;

/// The file extension appended to report artifacts.
pub const REPORT_EXTENSION: &str = ".json";

/// Configuration for a [`Reporter`](crate::reporter::Reporter).
///
/// Deserializes from kebab-case keys so it can be embedded in a config file,
/// and implements `Default` with the values a bare reporter uses.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReporterConfig {
    /// Capture a screenshot as each spec completes.
    pub capture_screenshots: bool,

    /// Narrow screenshot capture to failed specs only.
    pub capture_only_on_failures: bool,

    /// Base directory for written artifacts.
    pub output_dir: Utf8PathBuf,

    /// Folder captured screenshots are written to, relative to `output_dir`.
    pub screenshots_dir: Utf8PathBuf,

    /// Derive qualified suite names by dot-joining ancestor descriptions
    /// instead of using the framework-native full name.
    pub use_dot_notation: bool,

    /// Name screenshots after the spec description instead of a random
    /// token.
    pub fixed_screenshot_name: bool,

    /// Merge all suites into one artifact instead of writing one artifact
    /// per top-level suite.
    pub consolidate: bool,

    /// Merge nested suites' output into the single consolidated buffer.
    /// Ignored when `consolidate` is off.
    pub consolidate_all: bool,

    /// Filename prefix for written reports. Defaults to `report` when
    /// consolidating everything, `report-` otherwise.
    pub file_prefix: Option<String>,

    /// Remove the previous run's output directory when a new run starts.
    pub clean_output_dir: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            capture_screenshots: true,
            capture_only_on_failures: false,
            output_dir: Utf8PathBuf::new(),
            screenshots_dir: "screenshots".into(),
            use_dot_notation: true,
            fixed_screenshot_name: false,
            consolidate: true,
            consolidate_all: true,
            file_prefix: None,
            clean_output_dir: true,
        }
    }
}

impl ReporterConfig {
    /// Consolidate-all only applies while consolidation itself is on.
    pub(crate) fn consolidate_all(&self) -> bool {
        self.consolidate && self.consolidate_all
    }

    pub(crate) fn effective_file_prefix(&self) -> &str {
        match &self.file_prefix {
            Some(prefix) => prefix,
            None if self.consolidate_all() => "report",
            None => "report-",
        }
    }

    /// Directory screenshots are written to. A leading slash on the
    /// configured subfolder is stripped so it stays inside `output_dir`.
    pub(crate) fn screenshots_path(&self) -> Utf8PathBuf {
        let subfolder = self.screenshots_dir.as_str().trim_start_matches('/');
        self.output_dir.join(subfolder)
    }
}
