// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential storage and self-contained bearer tokens.
//!
//! ## Auth Flow
//!
//! 1. `register` stores a salted password digest under the normalized
//!    username and creates the user profile
//! 2. `login` verifies the digest and issues a token
//!    `<userId>_<nonce>_<digest>`
//! 3. Requests carry `Authorization: Bearer <token>`; the extractor verifies
//!    the digest and resolves the user
//!
//! Tokens are stateless: no session row is written anywhere, and validity is
//! purely a function of the digest matching the configured salt. There is no
//! expiry — an issued token stays valid until the salt changes.

pub mod credentials;
pub mod extractor;
pub mod tokens;

pub use credentials::CredentialVault;
pub use extractor::{Auth, MaybeAuth};
pub use tokens::TokenService;

use sha2::{Digest, Sha256};

/// Hex SHA-256 of `salt + "_" + data`.
///
/// The one digest primitive shared by credential hashing and token
/// integrity; deterministic so verification can recompute it.
pub(crate) fn salted_digest(salt: &str, data: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"_");
    hasher.update(data.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic_per_salt() {
        let a = salted_digest("salt", "secret");
        let b = salted_digest("salt", "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn digest_differs_across_salts_and_inputs() {
        assert_ne!(salted_digest("salt", "secret"), salted_digest("other", "secret"));
        assert_ne!(salted_digest("salt", "secret"), salted_digest("salt", "secret2"));
    }
}
