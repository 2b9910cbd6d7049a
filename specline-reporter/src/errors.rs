// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by specline-reporter.

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurs while writing a report artifact.
///
/// Returned by [`ArtifactWriter::write`](crate::artifact::ArtifactWriter::write).
/// The reporter treats this as non-fatal: it tries the next writer in its
/// chain and, if all fail, logs a diagnostic and moves on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteArtifactError {
    /// An error occurred while creating the output directory or writing the
    /// file.
    #[error("error writing `{file}`")]
    Fs {
        /// The file or directory being written.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },
}

/// An error produced by a [`CaptureSource`](crate::capture::CaptureSource).
///
/// Capture errors are always swallowed by the reporter — at most logged —
/// and never affect report correctness.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CaptureError {
    /// The capture source is not available, e.g. the session has already
    /// ended.
    #[error("capture source unavailable")]
    Unavailable,

    /// The capture source reported a failure.
    #[error("capture failed: {message}")]
    Failed {
        /// Description of the failure.
        message: String,
    },
}
