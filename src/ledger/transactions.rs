// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction log: balance-consistent ledger entries per wallet.
//!
//! Every mutation keeps the owning wallet's balance equal to the sum of its
//! stored transaction amounts by applying the incremental delta and writing
//! the wallet record in the same logical operation. The two writes are not
//! atomic; the ordering below minimizes the window in which a crash loses a
//! balance correction:
//!
//! - create: transaction record, then wallet
//! - update: wallet (delta applied), then transaction record
//! - delete: wallet (amount reversed), then transaction key removal
//!
//! Amounts arrive as arbitrary JSON; anything that does not parse as a
//! number is treated as zero rather than rejected (documented quirk,
//! preserved).

use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Transaction, UserSummary};
use crate::store::{self, keys, KeyValueStore};

use super::wallets::WalletLedger;

/// Default page size for transaction listings.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Page size used when walking the full transaction namespace.
const SCAN_PAGE: usize = 100;

/// Fields of a transaction that may change after creation. Only fields
/// present in the patch are applied.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TransactionPatch {
    /// New title.
    pub name: Option<String>,
    /// New amount; accepted as a JSON number or numeric string.
    #[schema(value_type = Option<Object>)]
    pub amount: Option<serde_json::Value>,
    /// New opaque payload.
    #[schema(value_type = Option<Object>)]
    pub extra: Option<serde_json::Value>,
}

/// One page of a wallet's transaction listing.
#[derive(Debug, Clone)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Transaction storage access and balance maintenance.
pub struct TransactionLog<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> TransactionLog<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    fn wallets(&self) -> WalletLedger<'a> {
        WalletLedger::new(self.store)
    }

    /// Post a new transaction against `wallet_id` and apply its amount to
    /// the balance. Posting against a locked wallet is not blocked.
    pub fn create(
        &self,
        wallet_id: &str,
        name: &str,
        amount: &serde_json::Value,
        extra: serde_json::Value,
        creator: &UserSummary,
    ) -> ServiceResult<Transaction> {
        let mut wallet = self.wallets().get(wallet_id, Some(creator))?;
        let amount = coerce_amount(amount);

        let tx = Transaction {
            id: format!("{wallet_id}_{}", uuid::Uuid::new_v4()),
            wallet_id: wallet_id.to_string(),
            name: name.to_string(),
            amount,
            extra,
            created_by: creator.clone(),
            created_at: Utc::now(),
        };
        store::put_json(self.store, &keys::transaction(&tx.id), &tx)?;

        wallet.balance += amount;
        self.wallets().persist(&wallet)?;

        Ok(tx)
    }

    /// Load a transaction, enforcing membership on its owning wallet.
    pub fn get(&self, transaction_id: &str, requester: &UserSummary) -> ServiceResult<Transaction> {
        let tx = self.load(transaction_id)?;
        self.wallets().get(&tx.wallet_id, Some(requester))?;
        Ok(tx)
    }

    /// Apply a patch to a transaction. An amount change moves the wallet
    /// balance by `new - old` and rewrites the wallet before the
    /// transaction record; an unchanged amount writes no wallet update.
    pub fn update(
        &self,
        transaction_id: &str,
        patch: TransactionPatch,
        requester: &UserSummary,
    ) -> ServiceResult<Transaction> {
        let mut tx = self.load(transaction_id)?;
        let mut wallet = self.wallets().get(&tx.wallet_id, Some(requester))?;

        if let Some(name) = patch.name {
            tx.name = name;
        }
        if let Some(extra) = patch.extra {
            tx.extra = extra;
        }
        if let Some(raw) = patch.amount {
            let new_amount = coerce_amount(&raw);
            if new_amount != tx.amount {
                wallet.balance += new_amount - tx.amount;
                self.wallets().persist(&wallet)?;
                tx.amount = new_amount;
            }
        }

        store::put_json(self.store, &keys::transaction(&tx.id), &tx)?;
        Ok(tx)
    }

    /// Remove a transaction, reversing its contribution to the balance.
    /// The corrected wallet is durable before the record disappears.
    pub fn delete(
        &self,
        transaction_id: &str,
        requester: &UserSummary,
    ) -> ServiceResult<Transaction> {
        let tx = self.load(transaction_id)?;
        let mut wallet = self.wallets().get(&tx.wallet_id, Some(requester))?;

        wallet.balance -= tx.amount;
        self.wallets().persist(&wallet)?;

        self.store.delete(&keys::transaction(&tx.id))?;
        Ok(tx)
    }

    /// One page of a wallet's transactions, in key order. Entries that fail
    /// to decode are skipped, so a page may carry fewer than `limit` items
    /// while more remain.
    pub fn list(
        &self,
        wallet_id: &str,
        cursor: Option<&str>,
        limit: usize,
        requester: &UserSummary,
    ) -> ServiceResult<TransactionPage> {
        self.wallets().get(wallet_id, Some(requester))?;

        let page = self
            .store
            .scan(&keys::transactions_of(wallet_id), cursor, limit)?;

        let mut transactions = Vec::with_capacity(page.keys.len());
        for key in &page.keys {
            let Some(bytes) = self.store.get(key)? else {
                continue;
            };
            match serde_json::from_slice::<Transaction>(&bytes) {
                Ok(tx) => transactions.push(tx),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "skipping undecodable transaction entry")
                }
            }
        }

        Ok(TransactionPage {
            transactions,
            cursor: page.cursor,
            has_more: !page.complete,
        })
    }

    /// Every transaction created by `user_id`, across all wallets.
    ///
    /// Full scan of the transaction namespace with client-side filtering —
    /// there is no secondary index by creator, and adding one would change
    /// the performance contract. Acceptable only at small scale.
    pub fn list_by_creator(&self, user_id: &str) -> ServiceResult<Vec<Transaction>> {
        let mut transactions = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .store
                .scan(keys::transaction_prefix(), cursor.as_deref(), SCAN_PAGE)?;
            for key in &page.keys {
                let Some(bytes) = self.store.get(key)? else {
                    continue;
                };
                match serde_json::from_slice::<Transaction>(&bytes) {
                    Ok(tx) if tx.created_by.id == user_id => transactions.push(tx),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "skipping undecodable transaction entry")
                    }
                }
            }
            if page.complete {
                break;
            }
            cursor = page.cursor;
        }

        Ok(transactions)
    }

    fn load(&self, transaction_id: &str) -> ServiceResult<Transaction> {
        store::get_json(self.store, &keys::transaction(transaction_id))?.ok_or_else(|| {
            ServiceError::not_found(format!("transaction {transaction_id} not found"))
        })
    }
}

/// Parse an amount from arbitrary JSON. Numbers pass through; numeric
/// strings are parsed; everything else is zero.
pub(crate) fn coerce_amount(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
