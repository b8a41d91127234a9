// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::store::KeyValueStore;

/// Shared application state: the key-value store plus resolved configuration.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn KeyValueStore>,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn token_salt(&self) -> &str {
        &self.config.token_salt
    }
}
