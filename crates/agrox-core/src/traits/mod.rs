// SPDX-FileCopyrightText: 2026 AgroX Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port trait definitions.
//!
//! Ports use `#[async_trait]` so adapters can be held as `Arc<dyn ...>`.

pub mod generator;

pub use generator::TextGenerator;
