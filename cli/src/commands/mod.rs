// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the ListingGenius CLI

pub mod batch;
pub mod config;
pub mod listing;
pub mod serve;

pub use self::batch::BatchArgs;
pub use self::config::ConfigCommand;
pub use self::listing::{GenerateArgs, TranslateArgs};
pub use self::serve::ServeArgs;
