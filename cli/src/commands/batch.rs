// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `batch` command
//!
//! Reads a JSON array of rows, generates each one in order, and writes the
//! batch report.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use listing_genius_core::application::batch_generation::{
    BatchGenerationDriver, BatchReport, BatchRow, BatchRowOutcome,
};
use listing_genius_core::domain::listing::GenerationRequest;

use crate::embedded::EmbeddedServices;

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON file holding an array of rows
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the JSON batch report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Backend for rows that do not name one
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,
}

pub fn load_rows(path: &Path, default_provider: Option<&str>) -> Result<Vec<GenerationRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch input {:?}", path))?;
    let rows: Vec<BatchRow> = serde_json::from_str(&content)
        .with_context(|| format!("Batch input {:?} must be a JSON array of rows", path))?;

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            let request = row.into_request(default_provider);
            if !request.has_content() {
                anyhow::bail!(
                    "Batch row {} needs a title or an image (img_link / image_base64)",
                    index + 1
                );
            }
            Ok(request)
        })
        .collect()
}

pub async fn execute(args: BatchArgs, config_path: Option<PathBuf>) -> Result<()> {
    let rows = load_rows(&args.input, args.provider.as_deref())?;
    let services = EmbeddedServices::new(config_path)?;
    let driver = BatchGenerationDriver::new(services.listing_service.clone());

    let progress = ProgressBar::new(rows.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} rows ({elapsed})")
            .context("Invalid progress bar template")?
            .progress_chars("=>-"),
    );

    let report = driver
        .run(rows, |p| progress.set_position(p.current as u64))
        .await;
    progress.finish_and_clear();

    print_summary(&report);

    if let Some(output) = &args.output {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(output, json)
            .with_context(|| format!("Failed to write batch report to {:?}", output))?;
        println!(
            "{}",
            format!("✓ Report written: {}", output.display()).green()
        );
    }

    Ok(())
}

fn print_summary(report: &BatchReport) {
    println!("{} {}", "Batch".bold(), report.batch_id);
    println!(
        "  {} succeeded, {} failed, {} total",
        report.succeeded().to_string().green(),
        report.failed().to_string().red(),
        report.total
    );

    for row in &report.rows {
        if let BatchRowOutcome::Failed { kind, message } = &row.outcome {
            println!("  {} row {} [{}]: {}", "✗".red(), row.index + 1, kind, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use listing_genius_core::domain::listing::TargetPlatform;

    #[test]
    fn test_load_rows_applies_batch_provider() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(
            &path,
            r#"[
                { "title": "Desk lamp" },
                { "title": "Mug", "target_platform": "EBAY", "model_provider": "kimi" }
            ]"#,
        )
        .unwrap();

        let rows = load_rows(&path, Some("gemini")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].provider_override.as_deref(), Some("gemini"));
        assert_eq!(rows[1].provider_override.as_deref(), Some("kimi"));
        assert_eq!(rows[1].target_platform, TargetPlatform::Ebay);
    }

    #[test]
    fn test_load_rows_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"{ "title": "Desk lamp" }"#).unwrap();

        assert!(load_rows(&path, None).is_err());
    }

    #[test]
    fn test_load_rows_rejects_row_without_title_or_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(
            &path,
            r#"[
                { "title": "Desk lamp" },
                { "title": "   ", "target_platform": "EBAY" },
                { "img_link": "https://cdn.example.com/mug.jpg" }
            ]"#,
        )
        .unwrap();

        let err = load_rows(&path, None).unwrap_err();
        assert!(err.to_string().contains("Batch row 2"));
    }

    #[test]
    fn test_load_rows_accepts_image_only_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.json");
        std::fs::write(&path, r#"[{ "image_base64": "aGVsbG8=" }]"#).unwrap();

        let rows = load_rows(&path, None).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].title().is_none());
    }
}
