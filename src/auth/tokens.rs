// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Self-contained bearer tokens.
//!
//! Wire format: `<userId>_<nonce>_<digest>` where
//! `digest = sha256(salt + "_" + userId + "_" + nonce)` hex-encoded. No
//! session state is persisted; the nonce only makes tokens unique and
//! unguessable, so it must come from a cryptographically secure source.
//! User ids are UUIDs and never contain `_`, which keeps the three-part
//! split unambiguous.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{ServiceError, ServiceResult};
use crate::models::User;
use crate::store::{self, keys, KeyValueStore};

use super::salted_digest;

/// Token issuance and verification.
pub struct TokenService<'a> {
    store: &'a dyn KeyValueStore,
    salt: &'a str,
}

impl<'a> TokenService<'a> {
    pub fn new(store: &'a dyn KeyValueStore, salt: &'a str) -> Self {
        Self { store, salt }
    }

    /// Issue a token for `user_id`.
    pub fn issue(&self, user_id: &str) -> String {
        let mut nonce_bytes = [0u8; 16];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = hex::encode(nonce_bytes);

        let payload = format!("{user_id}_{nonce}");
        let digest = salted_digest(self.salt, &payload);
        format!("{payload}_{digest}")
    }

    /// Verify a token and resolve the user it names.
    ///
    /// Fails when the token does not split into exactly three parts, when
    /// the digest over the first two parts does not match the third, or when
    /// the referenced user no longer exists. Tokens never expire.
    pub fn verify(&self, token: &str) -> ServiceResult<User> {
        let parts: Vec<&str> = token.split('_').collect();
        let [user_id, nonce, digest] = parts.as_slice() else {
            return Err(ServiceError::auth("malformed token"));
        };

        let payload = format!("{user_id}_{nonce}");
        if salted_digest(self.salt, &payload) != *digest {
            return Err(ServiceError::auth("invalid token"));
        }

        store::get_json(self.store, &keys::user(user_id))?
            .ok_or_else(|| ServiceError::auth("token user no longer exists"))
    }
}
