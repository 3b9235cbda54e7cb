// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for AgroX router tests.
//!
//! Provides a scripted text-generation port for fast, deterministic tests
//! without a running llama.cpp server.
//!
//! # Components
//!
//! - [`MockGenerator`] - Text generator replaying pre-configured replies and recording requests

pub mod mock_generator;

pub use mock_generator::{MockGenerator, MockReply};
