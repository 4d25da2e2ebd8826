// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::{AppConfig, DEFAULT_TOKEN_TTL};
use crate::store::InMemoryStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<InMemoryStore>>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(store: InMemoryStore, tokens: TokenService) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tokens: Arc::new(tokens),
            passwords: PasswordHasher::default(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            InMemoryStore::new(),
            TokenService::new(config.api_secret.as_deref(), config.token_ttl),
        )
        .with_password_hasher(PasswordHasher::new(config.bcrypt_cost))
    }

    pub fn with_password_hasher(mut self, passwords: PasswordHasher) -> Self {
        self.passwords = passwords;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(InMemoryStore::new(), TokenService::new(None, DEFAULT_TOKEN_TTL))
    }
}
