// SPDX-FileCopyrightText: 2026 Semrouter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! gRPC client for the semantic classification service.
//!
//! [`GrpcClassifierClient`] implements [`semrouter_core::Classifier`] over the
//! `classifier.SemanticClassifierService` contract in `proto/classifier.proto`.

pub mod client;
pub mod proto;

pub use client::{GrpcClassifierClient, new_request_id};
