// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Lib
//!
//! Provider abstraction and response normalization for ListingGenius.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Turns one logical listing operation (generate bullet points,
//!   translate copy) into a backend-specific LLM call and enforces the output
//!   contract regardless of which backend answered.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
