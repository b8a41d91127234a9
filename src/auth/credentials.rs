// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential vault: registration and password verification.
//!
//! One credential per normalized username. Normalization (NFKC, trim,
//! lower-case) is applied before every lookup or store, which is what makes
//! usernames case-insensitive. Credentials are immutable after registration;
//! there is no password-change flow.

use unicode_normalization::UnicodeNormalization;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Credential, User};
use crate::store::{self, keys, KeyValueStore};

use super::salted_digest;

/// Registration and login against stored credentials.
pub struct CredentialVault<'a> {
    store: &'a dyn KeyValueStore,
    salt: &'a str,
}

impl<'a> CredentialVault<'a> {
    pub fn new(store: &'a dyn KeyValueStore, salt: &'a str) -> Self {
        Self { store, salt }
    }

    /// Register a new user.
    ///
    /// Persists the profile first and the credential second; the credential
    /// is the uniqueness anchor, so a crash between the two writes leaves an
    /// unreferenced profile rather than a claimable username.
    pub fn register(&self, username: &str, password: &str) -> ServiceResult<User> {
        let display_name = username.trim();
        if display_name.is_empty() || !display_name.chars().all(|c| c.is_alphanumeric()) {
            return Err(ServiceError::validation(
                "username must be non-empty letters and digits",
            ));
        }
        if password.is_empty() {
            return Err(ServiceError::validation("password must not be empty"));
        }

        let normalized = normalize_username(username);
        let credential_key = keys::credential(&normalized);
        if self.store.get(&credential_key)?.is_some() {
            return Err(ServiceError::conflict(format!(
                "username {normalized} is already taken"
            )));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: display_name.to_string(),
            wallets: Vec::new(),
        };
        store::put_json(self.store, &keys::user(&user.id), &user)?;

        let credential = Credential {
            username: normalized,
            user_id: user.id.clone(),
            digest: salted_digest(self.salt, password),
        };
        store::put_json(self.store, &credential_key, &credential)?;

        Ok(user)
    }

    /// Verify a username/password pair and return the user profile.
    pub fn verify(&self, username: &str, password: &str) -> ServiceResult<User> {
        let normalized = normalize_username(username);
        let credential: Credential =
            store::get_json(self.store, &keys::credential(&normalized))?.ok_or_else(|| {
                ServiceError::not_found(format!("no account for username {normalized}"))
            })?;

        if credential.digest != salted_digest(self.salt, password) {
            return Err(ServiceError::auth("wrong password"));
        }

        store::get_json(self.store, &keys::user(&credential.user_id))?.ok_or_else(|| {
            ServiceError::not_found(format!("user {} not found", credential.user_id))
        })
    }

    /// Resolve a username to its user id without checking a password.
    pub fn resolve_user_id(&self, username: &str) -> ServiceResult<String> {
        let normalized = normalize_username(username);
        let credential: Credential =
            store::get_json(self.store, &keys::credential(&normalized))?.ok_or_else(|| {
                ServiceError::not_found(format!("no account for username {normalized}"))
            })?;
        Ok(credential.user_id)
    }
}

/// NFKC-normalize, trim, and lower-case a username.
pub fn normalize_username(raw: &str) -> String {
    raw.nfkc().collect::<String>().trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RedbStore;

    fn temp_store() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn register_then_verify_round_trips() {
        let (store, _dir) = temp_store();
        let vault = CredentialVault::new(&store, "pepper");

        let user = vault.register("Alice", "hunter2").unwrap();
        assert_eq!(user.name, "Alice");
        assert!(user.wallets.is_empty());

        let verified = vault.verify("Alice", "hunter2").unwrap();
        assert_eq!(verified.id, user.id);
    }

    #[test]
    fn usernames_are_case_and_whitespace_insensitive() {
        let (store, _dir) = temp_store();
        let vault = CredentialVault::new(&store, "pepper");

        let user = vault.register("Alice", "hunter2").unwrap();
        assert_eq!(vault.verify("  aLiCe ", "hunter2").unwrap().id, user.id);

        // The normalized name is taken, regardless of casing
        let err = vault.register("ALICE", "other").unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn register_rejects_bad_usernames_and_empty_passwords() {
        let (store, _dir) = temp_store();
        let vault = CredentialVault::new(&store, "pepper");

        for bad in ["", "   ", "al ice", "al-ice", "a!ce"] {
            let err = vault.register(bad, "pw").unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "username {bad:?}");
        }

        let err = vault.register("alice", "").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn verify_distinguishes_missing_account_from_wrong_password() {
        let (store, _dir) = temp_store();
        let vault = CredentialVault::new(&store, "pepper");
        vault.register("alice", "hunter2").unwrap();

        assert!(matches!(
            vault.verify("bob", "hunter2").unwrap_err(),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            vault.verify("alice", "wrong").unwrap_err(),
            ServiceError::Auth(_)
        ));
    }

    #[test]
    fn resolve_user_id_by_name() {
        let (store, _dir) = temp_store();
        let vault = CredentialVault::new(&store, "pepper");
        let user = vault.register("alice", "hunter2").unwrap();

        assert_eq!(vault.resolve_user_id("ALICE").unwrap(), user.id);
        assert!(matches!(
            vault.resolve_user_id("nobody").unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }
}
