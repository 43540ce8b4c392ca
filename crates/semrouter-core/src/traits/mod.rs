// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the decision pipeline and its collaborators.

pub mod classifier;
pub mod headers;

pub use classifier::Classifier;
pub use headers::RequestHeaderMap;
