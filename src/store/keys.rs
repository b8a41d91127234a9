// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key builders for the flat storage namespace.
//!
//! All keys are built here so the prefix conventions live in one place.
//! Transaction ids already embed their wallet id (`<walletId>_<suffix>`),
//! which is what makes per-wallet prefix scans possible.

/// Key for a wallet record.
pub fn wallet(wallet_id: &str) -> String {
    format!("wallet_{wallet_id}")
}

/// Prefix matching every wallet record.
pub fn wallet_prefix() -> &'static str {
    "wallet_"
}

/// Key for a transaction record. `transaction_id` is `<walletId>_<suffix>`.
pub fn transaction(transaction_id: &str) -> String {
    format!("transaction_{transaction_id}")
}

/// Prefix matching every transaction of one wallet.
pub fn transactions_of(wallet_id: &str) -> String {
    format!("transaction_{wallet_id}_")
}

/// Prefix matching every transaction record.
pub fn transaction_prefix() -> &'static str {
    "transaction_"
}

/// Key for a user profile.
pub fn user(user_id: &str) -> String {
    format!("user_{user_id}")
}

/// Prefix matching every user profile.
pub fn user_prefix() -> &'static str {
    "user_"
}

/// Key for a credential. `username` must already be normalized.
pub fn credential(username: &str) -> String {
    format!("auth_{username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_patterns_match_layout() {
        assert_eq!(wallet("w1"), "wallet_w1");
        assert_eq!(transaction("w1_t1"), "transaction_w1_t1");
        assert_eq!(user("u1"), "user_u1");
        assert_eq!(credential("alice"), "auth_alice");
    }

    #[test]
    fn wallet_transaction_prefix_covers_its_ids() {
        let tx_id = "w1_0b946e";
        assert!(transaction(tx_id).starts_with(&transactions_of("w1")));
        // A different wallet id never collides with the prefix.
        assert!(!transaction("w1x_0b946e").starts_with(&transactions_of("w1")));
    }
}
