use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use logsift_core::{run_pipeline, PipelineOptions, PipelineReport, TracingProgress};

use crate::error::AppError;
use crate::validation;
use crate::{archive, AppState};

/// Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// One-shot processing endpoint.
///
/// Accepts multipart uploads (`files` parts, optional `keywords`, `level`,
/// `pattern` text parts), runs the pipeline inside a temporary workspace,
/// and responds with a zip of the output tree. The report counters travel in
/// `X-Files-Scanned` and `X-Summary-Files` headers.
pub async fn process(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let workspace = tempfile::tempdir().context("creating job workspace")?;
    let input_dir = workspace.path().join("input");
    let output_dir = workspace.path().join("output");
    fs::create_dir_all(&input_dir).context("creating input directory")?;
    fs::create_dir_all(&output_dir).context("creating output directory")?;

    let mut keywords: Vec<String> = Vec::new();
    let mut level: Option<String> = None;
    let mut pattern = logsift_core::DEFAULT_PATTERN.to_string();
    let mut uploads = 0usize;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "files" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                let safe_name = validation::validate_file_upload(
                    &filename,
                    bytes.len(),
                    state.config.max_upload_size,
                )?;
                fs::write(input_dir.join(&safe_name), &bytes)
                    .with_context(|| format!("persisting upload {}", safe_name))?;
                uploads += 1;
            }
            "keywords" => {
                keywords = field
                    .text()
                    .await?
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
            }
            "level" => {
                let value = validation::sanitize_text(&field.text().await?);
                if !value.is_empty() {
                    level = Some(value);
                }
            }
            "pattern" => {
                let value = validation::sanitize_text(&field.text().await?);
                if !value.is_empty() {
                    pattern = value;
                }
            }
            other => {
                tracing::debug!("ignoring unknown multipart field '{}'", other);
            }
        }
    }

    tracing::info!(
        "processing {} upload(s), {} keyword(s), level {:?}",
        uploads,
        keywords.len(),
        level
    );

    let options = PipelineOptions {
        keywords,
        level,
        pattern,
        settle_delay: Some(Duration::from_millis(state.config.settle_delay_ms)),
        ..Default::default()
    };
    let report = run_blocking(input_dir, output_dir.clone(), options).await?;

    let bytes = archive::zip_directory(&output_dir).context("packaging results")?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/zip"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"logsift_results.zip\""),
    );
    headers.insert(
        "x-files-scanned",
        HeaderValue::from_str(&report.files_scanned.to_string())
            .context("encoding report header")?,
    );
    headers.insert(
        "x-summary-files",
        HeaderValue::from_str(&report.summary_files_written.to_string())
            .context("encoding report header")?,
    );

    Ok((headers, bytes))
}

/// The core is synchronous by design; keep it off the async workers.
async fn run_blocking(
    input_dir: PathBuf,
    output_dir: PathBuf,
    options: PipelineOptions,
) -> Result<PipelineReport, AppError> {
    let report = tokio::task::spawn_blocking(move || {
        run_pipeline(&input_dir, &output_dir, &options, &TracingProgress)
    })
    .await
    .context("pipeline task panicked")??;
    Ok(report)
}
