// Copyright (c) The specline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the fire-and-forget screenshot capture path.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, FixedOffset};
use futures::future::BoxFuture;
use pretty_assertions::assert_eq;
use serde_json::Value;
use specline_reporter::{
    artifact::ArtifactWriter,
    capture::{CaptureSource, EnvironmentInfo},
    config::ReporterConfig,
    errors::{CaptureError, WriteArtifactError},
    reporter::{Reporter, ReporterBuilder, SpecData, SuiteData, SuiteEvent, SuiteEventKind},
};
use specline_tree::SpecStatus;
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

struct StaticCaptureSource;

impl CaptureSource for StaticCaptureSource {
    fn capture(&self) -> BoxFuture<'static, Result<Vec<u8>, CaptureError>> {
        Box::pin(async { Ok(PNG_BYTES.to_vec()) })
    }

    fn describe_environment(&self) -> BoxFuture<'static, Result<EnvironmentInfo, CaptureError>> {
        Box::pin(async { Ok(EnvironmentInfo::default()) })
    }
}

struct FailingCaptureSource;

impl CaptureSource for FailingCaptureSource {
    fn capture(&self) -> BoxFuture<'static, Result<Vec<u8>, CaptureError>> {
        Box::pin(async { Err(CaptureError::Unavailable) })
    }

    fn describe_environment(&self) -> BoxFuture<'static, Result<EnvironmentInfo, CaptureError>> {
        Box::pin(async { Err(CaptureError::Unavailable) })
    }
}

#[derive(Clone, Debug, Default)]
struct RecordingWriter {
    artifacts: Arc<Mutex<Vec<String>>>,
}

impl RecordingWriter {
    fn texts(&self) -> Vec<String> {
        self.artifacts.lock().unwrap().clone()
    }
}

impl ArtifactWriter for RecordingWriter {
    fn write(&self, _dir: &Utf8Path, _filename: &str, text: &str) -> Result<(), WriteArtifactError> {
        self.artifacts.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}

fn ts() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00+00:00").expect("valid timestamp")
}

fn event(kind: SuiteEventKind) -> SuiteEvent {
    SuiteEvent::new(ts(), kind)
}

fn spec_started(id: &str, description: &str) -> SuiteEvent {
    let mut data = SpecData::new(id);
    data.description = Some(description.to_owned());
    event(SuiteEventKind::SpecStarted(data))
}

fn spec_finished(id: &str, status: SpecStatus) -> SuiteEvent {
    let mut data = SpecData::new(id);
    data.status = Some(status);
    event(SuiteEventKind::SpecFinished(data))
}

fn drive_suite(reporter: &mut Reporter, specs: &[(&str, &str, SpecStatus)]) {
    reporter.report_event(event(SuiteEventKind::RunStarted { summary: None }));
    let mut suite = SuiteData::new("A");
    suite.description = Some("Shots".to_owned());
    reporter.report_event(event(SuiteEventKind::SuiteStarted(suite)));
    for (id, description, status) in specs {
        reporter.report_event(spec_started(id, description));
        reporter.report_event(spec_finished(id, *status));
    }
    reporter.report_event(event(SuiteEventKind::SuiteFinished(SuiteData::new("A"))));
    reporter.report_event(event(SuiteEventKind::RunFinished));
}

fn capture_config(output_dir: Utf8PathBuf, fixed_name: bool) -> ReporterConfig {
    ReporterConfig {
        capture_screenshots: true,
        fixed_screenshot_name: fixed_name,
        output_dir,
        clean_output_dir: false,
        ..ReporterConfig::default()
    }
}

fn report_spec(texts: &[String], index: usize) -> Value {
    let doc: Value = serde_json::from_str(&texts[0]).expect("artifact parses");
    doc["specs"][index].clone()
}

async fn wait_for(path: &Utf8Path) -> bool {
    for _ in 0..200 {
        if path.exists() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    path.exists()
}

#[tokio::test]
async fn capture_writes_screenshot_and_records_reference() {
    let dir = camino_tempfile::tempdir().expect("tempdir created");
    let writer = RecordingWriter::default();

    let mut builder = ReporterBuilder::new(capture_config(dir.path().to_owned(), true));
    builder
        .set_capture_source(Arc::new(StaticCaptureSource))
        .add_artifact_writer(Box::new(writer.clone()));
    let mut reporter = builder.build();

    drive_suite(&mut reporter, &[("1", "logs in", SpecStatus::Passed)]);

    // the reference is recorded synchronously, before the capture resolves
    let spec = report_spec(&writer.texts(), 0);
    assert_eq!(spec["screenshot"], "logs-in.png");

    let path = dir.path().join("screenshots/logs-in.png");
    assert!(wait_for(&path).await, "screenshot written at {path}");
    let bytes = std::fs::read(&path).expect("screenshot readable");
    assert_eq!(bytes, PNG_BYTES);
}

#[tokio::test]
async fn capture_only_on_failures_skips_passing_specs() {
    let dir = camino_tempfile::tempdir().expect("tempdir created");
    let writer = RecordingWriter::default();

    let config = ReporterConfig {
        capture_only_on_failures: true,
        ..capture_config(dir.path().to_owned(), true)
    };
    let mut builder = ReporterBuilder::new(config);
    builder
        .set_capture_source(Arc::new(StaticCaptureSource))
        .add_artifact_writer(Box::new(writer.clone()));
    let mut reporter = builder.build();

    drive_suite(
        &mut reporter,
        &[
            ("1", "passes", SpecStatus::Passed),
            ("2", "fails", SpecStatus::Failed),
        ],
    );

    let texts = writer.texts();
    assert_eq!(report_spec(&texts, 0)["screenshot"], Value::Null);
    assert_eq!(report_spec(&texts, 1)["screenshot"], "fails.png");

    let failed_shot = dir.path().join("screenshots/fails.png");
    assert!(wait_for(&failed_shot).await, "failed spec captured");
    assert!(
        !dir.path().join("screenshots/passes.png").exists(),
        "passing spec not captured"
    );
}

#[tokio::test]
async fn random_tokens_name_screenshots_by_default() {
    let dir = camino_tempfile::tempdir().expect("tempdir created");
    let writer = RecordingWriter::default();

    let mut builder = ReporterBuilder::new(capture_config(dir.path().to_owned(), false));
    builder
        .set_capture_source(Arc::new(StaticCaptureSource))
        .add_artifact_writer(Box::new(writer.clone()));
    let mut reporter = builder.build();

    drive_suite(&mut reporter, &[("1", "logs in", SpecStatus::Passed)]);

    let spec = report_spec(&writer.texts(), 0);
    let name = spec["screenshot"].as_str().expect("screenshot recorded");
    assert!(name.ends_with(".png"), "name: {name}");
    let token = name.trim_end_matches(".png");
    assert_eq!(token.len(), 32, "token: {token}");
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn capture_failure_is_absorbed() {
    let dir = camino_tempfile::tempdir().expect("tempdir created");
    let writer = RecordingWriter::default();

    let mut builder = ReporterBuilder::new(capture_config(dir.path().to_owned(), true));
    builder
        .set_capture_source(Arc::new(FailingCaptureSource))
        .add_artifact_writer(Box::new(writer.clone()));
    let mut reporter = builder.build();

    drive_suite(&mut reporter, &[("1", "logs in", SpecStatus::Failed)]);

    // The reference is recorded even though the capture never lands; a
    // missing file next to a written report is the documented race.
    let spec = report_spec(&writer.texts(), 0);
    assert_eq!(spec["screenshot"], "logs-in.png");
    assert!(reporter.is_finished());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!dir.path().join("screenshots/logs-in.png").exists());
}

#[test]
fn capture_is_disabled_without_a_runtime() {
    let writer = RecordingWriter::default();

    let mut builder = ReporterBuilder::new(capture_config("unused".into(), true));
    builder
        .set_capture_source(Arc::new(StaticCaptureSource))
        .add_artifact_writer(Box::new(writer.clone()));
    let mut reporter = builder.build();

    drive_suite(&mut reporter, &[("1", "logs in", SpecStatus::Failed)]);

    let spec = report_spec(&writer.texts(), 0);
    assert_eq!(spec["screenshot"], Value::Null, "no capture without a runtime");
}
