// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optional screenshot capture as specs complete.

use crate::errors::CaptureError;
use camino::Utf8PathBuf;
use futures::future::BoxFuture;
use std::{fmt, sync::Arc};
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Metadata describing the environment a capture came from.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct EnvironmentInfo {
    /// Browser or device name.
    pub name: Option<String>,

    /// Browser or device version.
    pub version: Option<String>,

    /// Platform the session runs on.
    pub platform: Option<String>,
}

/// A source of captured screenshots, typically a live browser session.
///
/// Both operations are best-effort: any failure is logged and swallowed and
/// never affects report correctness.
pub trait CaptureSource: Send + Sync {
    /// Captures a screenshot, resolving to the raw image bytes.
    fn capture(&self) -> BoxFuture<'static, Result<Vec<u8>, CaptureError>>;

    /// Describes the environment the capture was taken in.
    fn describe_environment(&self) -> BoxFuture<'static, Result<EnvironmentInfo, CaptureError>>;
}

/// Schedules detached, best-effort screenshot captures.
///
/// Requests are fire-and-forget: nothing in report construction waits for an
/// in-flight capture, and a capture that resolves after the report has been
/// written simply lands next to it.
pub(crate) struct ScreenshotCapturer {
    source: Arc<dyn CaptureSource>,
    dir: Utf8PathBuf,
    handle: Handle,
}

impl fmt::Debug for ScreenshotCapturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenshotCapturer")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl ScreenshotCapturer {
    pub(crate) fn new(source: Arc<dyn CaptureSource>, dir: Utf8PathBuf, handle: Handle) -> Self {
        Self {
            source,
            dir,
            handle,
        }
    }

    /// Requests a capture to be written as `filename` under the screenshots
    /// directory. Returns immediately; completion is not observable.
    pub(crate) fn request(&self, filename: &str) {
        let source = Arc::clone(&self.source);
        let path = self.dir.join(filename);
        self.handle.spawn(async move {
            let bytes = match source.capture().await {
                Ok(bytes) => bytes,
                Err(error) => {
                    warn!(%error, %path, "screenshot capture failed");
                    return;
                }
            };
            match source.describe_environment().await {
                Ok(environment) => debug!(?environment, %path, "captured screenshot"),
                Err(error) => debug!(%error, "capture environment unavailable"),
            }
            if let Some(dir) = path.parent() {
                if let Err(error) = tokio::fs::create_dir_all(dir).await {
                    warn!(%error, %dir, "could not create screenshot directory");
                    return;
                }
            }
            if let Err(error) = tokio::fs::write(&path, &bytes).await {
                warn!(%error, %path, "could not write screenshot");
            }
        });
    }
}
