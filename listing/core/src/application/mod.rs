// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod listing_service;
pub mod batch_generation;

// Re-export use cases for convenience
pub use listing_service::{ListingService, StandardListingService};
pub use batch_generation::{BatchGenerationDriver, BatchProgress, BatchReport, BatchRow, BatchRowOutcome, BatchRowReport};
