// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Single listing operations
//!
//! Commands: generate, translate

use anyhow::{Context, Result};
use base64::Engine;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use listing_genius_core::domain::listing::{
    GenerationRequest, GenerationResult, TargetPlatform, TranslationRequest, TranslationResult,
};

use crate::embedded::EmbeddedServices;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Product title
    #[arg(short, long, value_name = "TITLE")]
    pub title: Option<String>,

    /// Product image URL (fetched before the backend call)
    #[arg(long, value_name = "URL", conflicts_with = "image_file")]
    pub image_url: Option<String>,

    /// Local product image, sent inline
    #[arg(long, value_name = "FILE")]
    pub image_file: Option<PathBuf>,

    /// Target marketplace (amazon, ebay)
    #[arg(short, long, default_value = "amazon")]
    pub platform: TargetPlatform,

    /// Backend to use (openai, gemini, kimi)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Target language code, e.g. de-DE
    #[arg(long = "to", value_name = "LANG")]
    pub target_language: String,

    /// Backend to use (openai, gemini, kimi)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Strings to translate, in order
    #[arg(value_name = "ITEM", required = true)]
    pub items: Vec<String>,
}

fn read_image_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read image file {:?}", path))?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

pub fn build_generation_request(args: &GenerateArgs) -> Result<GenerationRequest> {
    let mut request = GenerationRequest {
        product_title: args.title.clone(),
        image_url: args.image_url.clone(),
        target_platform: args.platform,
        provider_override: args.provider.clone(),
        ..GenerationRequest::default()
    };

    if let Some(path) = &args.image_file {
        request.image_inline = Some(read_image_file(path)?);
    }

    if !request.has_content() {
        anyhow::bail!("Provide a --title or an image (--image-url / --image-file)");
    }
    Ok(request)
}

pub async fn generate(args: GenerateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let request = build_generation_request(&args)?;
    let services = EmbeddedServices::new(config_path)?;

    let result = services
        .listing_service
        .generate(request)
        .await
        .context("Generation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_generation(&result);
    }
    Ok(())
}

pub async fn translate(args: TranslateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut request = TranslationRequest::new(args.items, args.target_language);
    request.provider_override = args.provider;

    let services = EmbeddedServices::new(config_path)?;

    let result = services
        .listing_service
        .translate(request.clone())
        .await
        .context("Translation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_translation(&request, &result);
    }
    Ok(())
}

fn print_generation(result: &GenerationResult) {
    println!(
        "{} {} ({})",
        "✓ Generated with".green(),
        result.provider.to_string().bold(),
        result.language_code
    );
    println!();
    for (i, point) in result.bullet_points.iter().enumerate() {
        println!("  {}. {}", i + 1, point);
    }
}

fn print_translation(request: &TranslationRequest, result: &TranslationResult) {
    println!(
        "{} {} → {}",
        "✓ Translated with".green(),
        result.provider.to_string().bold(),
        request.target_language_code
    );
    println!();
    for (source, translated) in request.source_items.iter().zip(&result.translated_items) {
        println!("  {}", source.dimmed());
        println!("  {}", translated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        generate: GenerateArgs,
    }

    #[test]
    fn test_image_file_is_inlined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lamp.jpg");
        std::fs::write(&path, b"hello").unwrap();

        let cli = TestCli::parse_from([
            "test",
            "--image-file",
            path.to_str().unwrap(),
            "--platform",
            "ebay",
        ]);
        let request = build_generation_request(&cli.generate).unwrap();

        assert_eq!(request.image_inline.as_deref(), Some("aGVsbG8="));
        assert_eq!(request.target_platform, TargetPlatform::Ebay);
        assert!(request.title().is_none());
    }

    #[test]
    fn test_request_without_content_is_rejected() {
        let cli = TestCli::parse_from(["test", "--title", "   "]);
        assert!(build_generation_request(&cli.generate).is_err());
    }

    #[test]
    fn test_url_and_file_conflict() {
        let parsed = TestCli::try_parse_from([
            "test",
            "--image-url",
            "https://cdn.example.com/a.jpg",
            "--image-file",
            "a.jpg",
        ]);
        assert!(parsed.is_err());
    }
}
