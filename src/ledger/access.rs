// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access control: wallet membership grants and revocations.
//!
//! Membership lives on both sides of the relation — `Wallet.access` and each
//! member's `User.wallets` — and every mutation here updates both in one
//! call, wallet side first. The two writes are not atomic: a failure between
//! them leaves one side updated, a window that is accepted and documented
//! rather than hidden.

use crate::error::{ServiceError, ServiceResult};
use crate::models::{UserSummary, Wallet};
use crate::store::KeyValueStore;

use super::users::UserDirectory;
use super::wallets::WalletLedger;

/// Grant/revoke operations on a wallet's access list.
pub struct AccessControl<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> AccessControl<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Add `target_user_id` to the wallet's access list and mirror the
    /// wallet into the target's membership cache.
    pub fn grant(
        &self,
        wallet_id: &str,
        target_user_id: &str,
        requester: &UserSummary,
    ) -> ServiceResult<Wallet> {
        let ledger = WalletLedger::new(self.store);
        let mut wallet = ledger.get(wallet_id, Some(requester))?;

        if wallet.is_member(target_user_id) {
            return Err(ServiceError::conflict(format!(
                "user {target_user_id} already has access to wallet {wallet_id}"
            )));
        }

        let directory = UserDirectory::new(self.store);
        let mut target = directory.get(target_user_id)?;

        wallet.access.push(target.summary());
        ledger.persist(&wallet)?;

        target.wallets.push(wallet.summary());
        directory.put(&target)?;

        Ok(wallet)
    }

    /// Remove `target_user_id` from the wallet's access list and scrub the
    /// wallet from the target's membership cache.
    ///
    /// Never leaves the access list empty: removing the last member fails.
    pub fn revoke(
        &self,
        wallet_id: &str,
        target_user_id: &str,
        requester: &UserSummary,
    ) -> ServiceResult<Wallet> {
        let ledger = WalletLedger::new(self.store);
        let mut wallet = ledger.get(wallet_id, Some(requester))?;

        if !wallet.is_member(target_user_id) {
            return Err(ServiceError::validation(format!(
                "user {target_user_id} has no access to wallet {wallet_id}"
            )));
        }
        if wallet.access.len() == 1 {
            return Err(ServiceError::invariant(format!(
                "cannot remove the last member of wallet {wallet_id}"
            )));
        }

        wallet.access.retain(|member| member.id != target_user_id);
        ledger.persist(&wallet)?;

        let directory = UserDirectory::new(self.store);
        match directory.get(target_user_id) {
            Ok(mut target) => {
                target.wallets.retain(|summary| summary.id != wallet_id);
                directory.put(&target)?;
            }
            Err(e) => {
                // Wallet side is already updated; the mirror is best effort.
                tracing::warn!(
                    wallet_id,
                    target_user_id,
                    error = %e,
                    "failed to scrub wallet from revoked member's cache"
                );
            }
        }

        Ok(wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::store::{self, keys, RedbStore};

    fn temp_store() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (store, dir)
    }

    fn seed_user(store: &RedbStore, id: &str, name: &str) -> UserSummary {
        let user = User {
            id: id.into(),
            name: name.into(),
            wallets: Vec::new(),
        };
        store::put_json(store, &keys::user(id), &user).unwrap();
        user.summary()
    }

    fn setup() -> (RedbStore, tempfile::TempDir, UserSummary, UserSummary, Wallet) {
        let (store, dir) = temp_store();
        let alice = seed_user(&store, "u1", "alice");
        let bob = seed_user(&store, "u2", "bob");
        let wallet = WalletLedger::new(&store)
            .create(&alice, "Trip", "", serde_json::Value::Null)
            .unwrap();
        (store, dir, alice, bob, wallet)
    }

    #[test]
    fn grant_updates_both_sides() {
        let (store, _dir, alice, bob, wallet) = setup();
        let access = AccessControl::new(&store);

        let updated = access.grant(&wallet.id, "u2", &alice).unwrap();
        assert!(updated.is_member("u2"));
        assert_eq!(updated.access.len(), 2);

        let bob_profile = UserDirectory::new(&store).get("u2").unwrap();
        assert_eq!(bob_profile.wallets.len(), 1);
        assert_eq!(bob_profile.wallets[0].id, wallet.id);

        // Bob can now read the wallet
        assert!(WalletLedger::new(&store).get(&wallet.id, Some(&bob)).is_ok());
    }

    #[test]
    fn grant_rejects_existing_member_and_unknown_user() {
        let (store, _dir, alice, _bob, wallet) = setup();
        let access = AccessControl::new(&store);

        assert!(matches!(
            access.grant(&wallet.id, "u1", &alice).unwrap_err(),
            ServiceError::Conflict(_)
        ));
        assert!(matches!(
            access.grant(&wallet.id, "ghost", &alice).unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[test]
    fn grant_requires_requester_membership() {
        let (store, _dir, _alice, bob, wallet) = setup();
        let access = AccessControl::new(&store);

        assert!(matches!(
            access.grant(&wallet.id, "u2", &bob).unwrap_err(),
            ServiceError::Auth(_)
        ));
    }

    #[test]
    fn revoke_updates_both_sides() {
        let (store, _dir, alice, bob, wallet) = setup();
        let access = AccessControl::new(&store);
        access.grant(&wallet.id, "u2", &alice).unwrap();

        let updated = access.revoke(&wallet.id, "u1", &bob).unwrap();
        assert!(!updated.is_member("u1"));
        assert_eq!(updated.access.len(), 1);

        let alice_profile = UserDirectory::new(&store).get("u1").unwrap();
        assert!(alice_profile.wallets.is_empty());
    }

    #[test]
    fn revoke_rejects_non_member_target() {
        let (store, _dir, alice, _bob, wallet) = setup();
        let access = AccessControl::new(&store);

        assert!(matches!(
            access.revoke(&wallet.id, "u2", &alice).unwrap_err(),
            ServiceError::Validation(_)
        ));
    }

    #[test]
    fn last_member_cannot_be_revoked() {
        let (store, _dir, alice, bob, wallet) = setup();
        let access = AccessControl::new(&store);
        access.grant(&wallet.id, "u2", &alice).unwrap();

        // Bob removes Alice, then tries to remove himself
        access.revoke(&wallet.id, "u1", &bob).unwrap();
        let err = access.revoke(&wallet.id, "u2", &bob).unwrap_err();
        assert!(matches!(err, ServiceError::Invariant(_)));

        // The wallet still has its one member
        let wallet = WalletLedger::new(&store).get(&wallet.id, None).unwrap();
        assert_eq!(wallet.access.len(), 1);
        assert!(wallet.is_member("u2"));
    }

    #[test]
    fn membership_stays_symmetric_after_grant_revoke_cycle() {
        let (store, _dir, alice, _bob, wallet) = setup();
        let access = AccessControl::new(&store);
        let directory = UserDirectory::new(&store);

        access.grant(&wallet.id, "u2", &alice).unwrap();
        access.revoke(&wallet.id, "u2", &alice).unwrap();

        let stored = WalletLedger::new(&store).get(&wallet.id, None).unwrap();
        for user_id in ["u1", "u2"] {
            let profile = directory.get(user_id).unwrap();
            let cached = profile.wallets.iter().any(|w| w.id == wallet.id);
            assert_eq!(
                stored.is_member(user_id),
                cached,
                "asymmetric membership for {user_id}"
            );
        }
    }
}
