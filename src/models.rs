// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain Data Models
//!
//! Stored entity shapes for the flat key-value layout. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON persistence and
//! OpenAPI documentation; the wire field names are camelCase.
//!
//! The user ↔ wallet membership relation is stored on **both** sides:
//! `Wallet.access` holds member summaries and each member's `User.wallets`
//! holds wallet summaries. The two copies are kept in lockstep by every
//! mutating operation; there is no storage-level transaction tying them
//! together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Compact user reference embedded in wallets and transactions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserSummary {
    /// User id.
    pub id: String,
    /// Display name at the time the summary was written.
    pub name: String,
}

/// Compact wallet reference embedded in user profiles.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct WalletSummary {
    /// Wallet id.
    pub id: String,
    /// Wallet name at the time the summary was written.
    pub name: String,
}

/// A registered user. Stored under `user_<id>`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Denormalized cache of wallet membership, in grant order.
    #[serde(default)]
    pub wallets: Vec<WalletSummary>,
}

impl User {
    /// Compact reference for embedding into wallets and transactions.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// A login credential. Stored under `auth_<normalizedUsername>`, one per
/// normalized username. Immutable after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Normalized (NFKC, trimmed, lower-cased) username.
    pub username: String,
    /// Owning user id.
    pub user_id: String,
    /// Hex SHA-256 of `salt + "_" + password`.
    pub digest: String,
}

/// A shared, balance-bearing wallet. Stored under `wallet_<id>`.
///
/// Invariants:
/// - `balance` equals the sum of `amount` over all stored transactions of
///   this wallet, maintained incrementally (never recomputed by scanning).
/// - `access` is never empty while the wallet exists.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Wallet name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Members allowed to read and mutate this wallet, in grant order,
    /// unique by id.
    pub access: Vec<UserSummary>,
    /// Running balance; signed sum of transaction amounts.
    pub balance: f64,
    /// Opaque structured payload supplied by the client.
    #[schema(value_type = Object)]
    pub extra: serde_json::Value,
    /// Who created the wallet.
    pub created_by: UserSummary,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Closed marker. Does not block balance-affecting operations.
    pub locked: bool,
}

impl Wallet {
    /// Whether `user_id` is on the access list.
    pub fn is_member(&self, user_id: &str) -> bool {
        self.access.iter().any(|member| member.id == user_id)
    }

    /// Compact reference for embedding into user profiles.
    pub fn summary(&self) -> WalletSummary {
        WalletSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// A ledger entry contributing to one wallet's balance. Stored under
/// `transaction_<walletId>_<suffix>`; the id embeds the wallet id so all
/// entries of a wallet share a lexical key prefix.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// `<walletId>_<suffix>`.
    pub id: String,
    /// Owning wallet id.
    pub wallet_id: String,
    /// Entry title.
    pub name: String,
    /// Signed amount added to the wallet balance.
    pub amount: f64,
    /// Opaque structured payload supplied by the client.
    #[schema(value_type = Object)]
    pub extra: serde_json::Value,
    /// Who created the entry.
    pub created_by: UserSummary,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
