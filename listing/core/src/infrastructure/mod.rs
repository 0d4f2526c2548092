// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod llm;
pub mod prompt_builder;
pub mod normalizer;
pub mod image_fetcher;

pub use image_fetcher::{HttpImageFetcher, ImageFetcher};
pub use llm::ProviderRegistry;
