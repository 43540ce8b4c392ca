// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt extraction and model selection for semrouter.
//!
//! Both halves are pure: no I/O, no shared state.

pub mod engine;
pub mod prompt;

pub use engine::RoutingEngine;
pub use prompt::extract_prompt;
