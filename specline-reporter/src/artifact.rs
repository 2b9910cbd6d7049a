// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writing report artifacts to persistent storage.

use crate::errors::WriteArtifactError;
use camino::Utf8Path;
use std::fmt;

/// A destination for rendered report text.
///
/// The reporter holds an ordered chain of writers and tries each in turn, so
/// an implementation only needs to handle its own environment and fail
/// cleanly everywhere else.
pub trait ArtifactWriter: fmt::Debug + Send {
    /// Writes `text` as `filename` under `dir`, creating `dir` if needed.
    fn write(&self, dir: &Utf8Path, filename: &str, text: &str) -> Result<(), WriteArtifactError>;
}

/// Writes artifacts to the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsArtifactWriter;

impl ArtifactWriter for FsArtifactWriter {
    fn write(&self, dir: &Utf8Path, filename: &str, text: &str) -> Result<(), WriteArtifactError> {
        if !dir.as_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|error| WriteArtifactError::Fs {
                file: dir.to_owned(),
                error,
            })?;
        }
        let file = dir.join(filename);
        std::fs::write(&file, text).map_err(|error| WriteArtifactError::Fs { file, error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::tempdir;
    use pretty_assertions::assert_eq;

    #[test]
    fn fs_writer_creates_directories() {
        let dir = tempdir().expect("tempdir created");
        let nested = dir.path().join("reports/nightly");

        FsArtifactWriter
            .write(&nested, "report.json", "{}")
            .expect("write succeeds");

        let written = std::fs::read_to_string(nested.join("report.json")).expect("file readable");
        assert_eq!(written, "{}");
    }

    #[test]
    fn fs_writer_reports_the_failing_path() {
        let dir = tempdir().expect("tempdir created");
        // a plain file where the writer expects a directory
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "x").expect("blocker written");

        let err = FsArtifactWriter
            .write(&blocker.join("sub"), "report.json", "{}")
            .expect_err("write fails");
        assert!(err.to_string().contains("blocked"), "error: {err}");
    }
}
