// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gasless Relay Server
//!
//! Accepts transfer intents signed by a client account, verifies the
//! signature, and broadcasts the matching transaction from a relayer
//! account that pays the gas.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Intent encoding, signature recovery, transaction building, node access
//! - `explorer` - Block explorer history lookups
//! - `relay` - Relay request validation and orchestration

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod explorer;
pub mod relay;
pub mod state;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
