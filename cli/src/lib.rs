// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! ListingGenius CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Command implementations, in-process service wiring and the
//!   HTTP server entry point, logging setup

pub mod commands;
pub mod embedded;
pub mod logging;
pub mod server;
