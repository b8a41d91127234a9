// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User directory: profile lookup and paginated listing.
//!
//! Each profile carries a denormalized `wallets` list so "my wallets" is a
//! single key read. The list is mutated by wallet creation, deletion, and
//! access grants/revokes — never here.

use crate::error::{ServiceError, ServiceResult};
use crate::models::{User, UserSummary};
use crate::store::{self, keys, KeyValueStore};

/// One page of the user listing.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<UserSummary>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// Profile storage access.
pub struct UserDirectory<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> UserDirectory<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load a profile by user id.
    pub fn get(&self, user_id: &str) -> ServiceResult<User> {
        store::get_json(self.store, &keys::user(user_id))?
            .ok_or_else(|| ServiceError::not_found(format!("user {user_id} not found")))
    }

    /// Persist a profile, replacing any previous version.
    pub fn put(&self, user: &User) -> ServiceResult<()> {
        store::put_json(self.store, &keys::user(&user.id), user)?;
        Ok(())
    }

    /// List user summaries, optionally narrowed to ids starting with
    /// `id_prefix`, one store page at a time.
    pub fn list(
        &self,
        id_prefix: Option<&str>,
        cursor: Option<&str>,
        limit: usize,
    ) -> ServiceResult<UserPage> {
        let prefix = format!("{}{}", keys::user_prefix(), id_prefix.unwrap_or(""));
        let page = self.store.scan(&prefix, cursor, limit)?;

        let mut users = Vec::with_capacity(page.keys.len());
        for key in &page.keys {
            let Some(bytes) = self.store.get(key)? else {
                continue;
            };
            match serde_json::from_slice::<User>(&bytes) {
                Ok(user) => users.push(user.summary()),
                Err(e) => tracing::warn!(key = %key, error = %e, "skipping undecodable user entry"),
            }
        }

        Ok(UserPage {
            users,
            cursor: page.cursor,
            has_more: !page.complete,
        })
    }
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

    fn seed_user(store: &RedbStore, id: &str, name: &str) {
        let user = User {
            id: id.into(),
            name: name.into(),
            wallets: Vec::new(),
        };
        store::put_json(store, &keys::user(id), &user).unwrap();
    }

    #[test]
    fn get_missing_user_is_not_found() {
        let (store, _dir) = temp_store();
        let directory = UserDirectory::new(&store);
        assert!(matches!(
            directory.get("ghost").unwrap_err(),
            ServiceError::NotFound(_)
        ));
    }

    #[test]
    fn list_pages_through_users() {
        let (store, _dir) = temp_store();
        for i in 0..3 {
            seed_user(&store, &format!("u{i}"), &format!("user{i}"));
        }
        let directory = UserDirectory::new(&store);

        let page1 = directory.list(None, None, 2).unwrap();
        assert_eq!(page1.users.len(), 2);
        assert!(page1.has_more);

        let page2 = directory.list(None, page1.cursor.as_deref(), 2).unwrap();
        assert_eq!(page2.users.len(), 1);
        assert!(!page2.has_more);
    }

    #[test]
    fn list_narrows_by_id_prefix() {
        let (store, _dir) = temp_store();
        seed_user(&store, "aa1", "a-one");
        seed_user(&store, "aa2", "a-two");
        seed_user(&store, "bb1", "b-one");
        let directory = UserDirectory::new(&store);

        let page = directory.list(Some("aa"), None, 10).unwrap();
        assert_eq!(page.users.len(), 2);
        assert!(page.users.iter().all(|u| u.id.starts_with("aa")));
    }

    #[test]
    fn list_skips_undecodable_entries() {
        let (store, _dir) = temp_store();
        seed_user(&store, "u1", "alice");
        store.put(&keys::user("u2"), b"not json").unwrap();
        let directory = UserDirectory::new(&store);

        let page = directory.list(None, None, 10).unwrap();
        assert_eq!(page.users.len(), 1);
        assert_eq!(page.users[0].id, "u1");
    }
}
