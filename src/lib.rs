// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Commonpurse - Shared Wallet Ledger Service
//!
//! Multi-user wallets with running balances on a flat key-value store.
//! Balance mutations stay numerically consistent with their backing
//! transaction records, and every wallet operation respects a mutable
//! access-control list — without any multi-key atomicity from storage.
//!
//! ## Modules
//!
//! - `api` - HTTP dispatcher (Axum)
//! - `auth` - Credentials and self-contained bearer tokens
//! - `ledger` - Wallets, transactions, access control
//! - `store` - Flat key-value storage (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod state;
pub mod store;
