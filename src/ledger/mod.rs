// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger Core
//!
//! Wallets, their transaction logs, and the access-control lifecycle, built
//! directly on the flat key-value store. Every operation here is a short
//! read-modify-write sequence over one or more keys with **no cross-key
//! atomicity**: the documented failure windows (§DESIGN.md) are accepted,
//! not patched. Nothing in this module recomputes a balance by scanning —
//! balances move only by the incremental deltas applied alongside
//! transaction mutations.

pub mod access;
pub mod transactions;
pub mod users;
pub mod wallets;

pub use access::AccessControl;
pub use transactions::{TransactionLog, TransactionPage, TransactionPatch};
pub use users::{UserDirectory, UserPage};
pub use wallets::WalletLedger;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::auth::{CredentialVault, TokenService};
    use crate::store::RedbStore;

    #[test]
    fn full_account_to_ledger_walk() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        let salt = "pepper";

        // Register and resolve the identity the way the dispatcher would
        let vault = CredentialVault::new(&store, salt);
        let registered = vault.register("alice", "hunter2").unwrap();
        let tokens = TokenService::new(&store, salt);
        let token = tokens.issue(&registered.id);
        let alice = tokens.verify(&token).unwrap().summary();

        // Wallet starts at zero
        let ledger = WalletLedger::new(&store);
        let wallet = ledger
            .create(&alice, "W1", "", serde_json::Value::Null)
            .unwrap();
        assert_eq!(wallet.balance, 0.0);

        // 50 -> 30 -> deleted, balance tracking each step
        let log = TransactionLog::new(&store);
        let tx = log
            .create(&wallet.id, "seed", &json!(50), json!({}), &alice)
            .unwrap();
        assert_eq!(ledger.get(&wallet.id, Some(&alice)).unwrap().balance, 50.0);

        log.update(
            &tx.id,
            TransactionPatch {
                amount: Some(json!(30)),
                ..Default::default()
            },
            &alice,
        )
        .unwrap();
        assert_eq!(ledger.get(&wallet.id, Some(&alice)).unwrap().balance, 30.0);

        log.delete(&tx.id, &alice).unwrap();
        assert_eq!(ledger.get(&wallet.id, Some(&alice)).unwrap().balance, 0.0);

        // Second member joins; winding the wallet down stops at the last one
        let bob = vault.register("bob", "secret").unwrap().summary();
        let access = AccessControl::new(&store);
        access.grant(&wallet.id, &bob.id, &alice).unwrap();
        access.revoke(&wallet.id, &alice.id, &bob).unwrap();
        let err = access.revoke(&wallet.id, &bob.id, &bob).unwrap_err();
        assert!(matches!(err, crate::error::ServiceError::Invariant(_)));
    }
}
