// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded key-value store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `entries`: key → JSON bytes, one row per stored entity
//!
//! Each trait call opens its own redb transaction, so durability is per call
//! and nothing spans keys. Scan cursors are the hex-encoded last key of the
//! previous page; an undecodable cursor restarts the scan at the prefix.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{KeyValueStore, KvResult, ScanPage};

/// Single flat table: entity key → serialized record (JSON bytes).
const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");

/// Embedded flat key-value store.
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> KvResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ENTRIES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ENTRIES)?;
        match table.get(key)? {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ENTRIES)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &str) -> KvResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ENTRIES)?;
            let _ = table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn scan(&self, prefix: &str, cursor: Option<&str>, limit: usize) -> KvResult<ScanPage> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ENTRIES)?;

        // Determine scan start: either the cursor key or the prefix itself
        let start: String = cursor
            .and_then(decode_cursor)
            .unwrap_or_else(|| prefix.to_string());

        let mut keys = Vec::with_capacity(limit);
        let mut skip_first = cursor.is_some();
        let mut complete = true;

        for entry in table.range(start.as_str()..)? {
            let entry = entry?;
            let key = entry.0.value().to_string();

            if !key.starts_with(prefix) {
                break;
            }

            // Skip the cursor entry itself
            if skip_first {
                skip_first = false;
                if key == start {
                    continue;
                }
            }

            if keys.len() == limit {
                complete = false;
                break;
            }
            keys.push(key);
        }

        let next_cursor = if complete {
            None
        } else {
            keys.last().map(|k| encode_cursor(k))
        };

        Ok(ScanPage {
            keys,
            cursor: next_cursor,
            complete,
        })
    }
}

fn encode_cursor(key: &str) -> String {
    hex::encode(key.as_bytes())
}

fn decode_cursor(cursor: &str) -> Option<String> {
    let bytes = hex::decode(cursor).ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (store, dir)
    }

    #[test]
    fn put_get_delete_round_trip() {
        let (store, _dir) = temp_store();
        assert_eq!(store.get("wallet_1").unwrap(), None);

        store.put("wallet_1", b"{\"id\":\"1\"}").unwrap();
        assert_eq!(store.get("wallet_1").unwrap().as_deref(), Some(&b"{\"id\":\"1\"}"[..]));

        store.delete("wallet_1").unwrap();
        assert_eq!(store.get("wallet_1").unwrap(), None);

        // Deleting an absent key is fine
        store.delete("wallet_1").unwrap();
    }

    #[test]
    fn scan_pages_through_prefix() {
        let (store, _dir) = temp_store();
        for i in 0..5 {
            store.put(&format!("transaction_w1_{i}"), b"{}").unwrap();
        }
        // Entries outside the prefix are never returned
        store.put("transaction_w2_0", b"{}").unwrap();
        store.put("wallet_w1", b"{}").unwrap();

        let page1 = store.scan("transaction_w1_", None, 2).unwrap();
        assert_eq!(page1.keys, vec!["transaction_w1_0", "transaction_w1_1"]);
        assert!(!page1.complete);
        let cursor = page1.cursor.expect("cursor for incomplete page");

        let page2 = store.scan("transaction_w1_", Some(&cursor), 2).unwrap();
        assert_eq!(page2.keys, vec!["transaction_w1_2", "transaction_w1_3"]);
        assert!(!page2.complete);

        let page3 = store
            .scan("transaction_w1_", page2.cursor.as_deref(), 2)
            .unwrap();
        assert_eq!(page3.keys, vec!["transaction_w1_4"]);
        assert!(page3.complete);
        assert!(page3.cursor.is_none());
    }

    #[test]
    fn scan_exact_page_boundary_reports_complete_on_next_page() {
        let (store, _dir) = temp_store();
        store.put("user_a", b"{}").unwrap();
        store.put("user_b", b"{}").unwrap();

        let page1 = store.scan("user_", None, 2).unwrap();
        assert_eq!(page1.keys.len(), 2);
        assert!(page1.complete);
        assert!(page1.cursor.is_none());
    }

    #[test]
    fn scan_with_garbage_cursor_restarts_at_prefix() {
        let (store, _dir) = temp_store();
        store.put("user_a", b"{}").unwrap();

        let page = store.scan("user_", Some("not-hex!"), 10).unwrap();
        assert_eq!(page.keys, vec!["user_a"]);
        assert!(page.complete);
    }

    #[test]
    fn scan_empty_prefix_range() {
        let (store, _dir) = temp_store();
        store.put("wallet_w1", b"{}").unwrap();

        let page = store.scan("transaction_", None, 10).unwrap();
        assert!(page.keys.is_empty());
        assert!(page.complete);
        assert!(page.cursor.is_none());
    }
}
