// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference HTTP host for the semrouter filter.
//!
//! Buffers each request, runs it through a [`semrouter_filter::RequestFilter`],
//! and forwards it (with any routing headers) to a single upstream.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, HealthState, build_router, start_server};
