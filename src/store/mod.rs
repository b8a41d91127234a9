// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Flat Key-Value Storage
//!
//! Every entity in the service is one JSON document under one string key in a
//! flat namespace. The store offers exactly four capabilities — get, put,
//! delete, and prefix scan with cursor pagination — and **no cross-key
//! atomicity**: each call is its own storage transaction, and a logical
//! operation that touches several keys can be interrupted between them.
//! Higher layers are written against that contract (last write wins, no
//! coordination between concurrent writers of the same key).
//!
//! ## Key Layout
//!
//! | Entity | Key pattern |
//! |--------|-------------|
//! | Wallet | `wallet_<walletId>` |
//! | Transaction | `transaction_<walletId>_<suffix>` |
//! | User | `user_<userId>` |
//! | Credential | `auth_<normalizedUsername>` |

pub mod keys;
pub mod redb;

use serde::{de::DeserializeOwned, Serialize};

pub use self::redb::RedbStore;

/// Error type for key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("redb error: {0}")]
    Redb(#[from] ::redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] ::redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] ::redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] ::redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] ::redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] ::redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type KvResult<T> = Result<T, KvError>;

/// One page of a prefix scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    /// Keys in this page, in lexical order.
    pub keys: Vec<String>,
    /// Continuation cursor; `None` when the scan is complete.
    pub cursor: Option<String>,
    /// Whether the scan reached the end of the prefix range.
    pub complete: bool,
}

/// String-keyed byte store with prefix-scan pagination.
///
/// The storage engine behind this trait is a consumed capability, not part of
/// the design: implementations only promise per-call durability. Callers must
/// not assume two calls are atomic together.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> KvResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> KvResult<()>;

    /// Return one page of keys sharing `prefix`, starting after `cursor`.
    fn scan(&self, prefix: &str, cursor: Option<&str>, limit: usize) -> KvResult<ScanPage>;
}

/// Read a key and deserialize its JSON value.
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> KvResult<Option<T>> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Serialize a value as JSON and write it under `key`.
pub fn put_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> KvResult<()> {
    let bytes = serde_json::to_vec(value)?;
    store.put(key, &bytes)
}
