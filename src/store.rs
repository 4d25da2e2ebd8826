// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user store.
//!
//! Stands in for the relational database. The authentication core only
//! relies on [`InMemoryStore::find_user_by_email`]; the remaining methods back
//! the `/user` endpoints.

use std::collections::HashMap;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::User;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

/// Fields written on create and update.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Default)]
pub struct InMemoryStore {
    users: HashMap<Uuid, User>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&mut self, new: NewUser) -> Result<User, StoreError> {
        self.ensure_unique(&new, None)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn find_user(&self, id: Uuid) -> Result<User, StoreError> {
        self.users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    /// Look up the user registered under `email`.
    pub fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.users
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".to_string()))
    }

    /// Oldest users first, at most `limit` of them.
    pub fn list_users(&self, limit: usize) -> Vec<User> {
        let mut users: Vec<User> = self.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        users.truncate(limit);
        users
    }

    pub fn count_users(&self) -> usize {
        self.users.len()
    }

    pub fn update_user(&mut self, id: Uuid, changes: NewUser) -> Result<User, StoreError> {
        if !self.users.contains_key(&id) {
            return Err(StoreError::NotFound(format!("user {id}")));
        }
        self.ensure_unique(&changes, Some(id))?;

        let user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;
        user.name = changes.name;
        user.email = changes.email;
        user.password_hash = changes.password_hash;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    pub fn delete_user(&mut self, id: Uuid) -> Result<User, StoreError> {
        self.users
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    fn ensure_unique(&self, candidate: &NewUser, except: Option<Uuid>) -> Result<(), StoreError> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if user.email == candidate.email {
                return Err(StoreError::Conflict("email already registered".to_string()));
            }
            if user.name == candidate.name {
                return Err(StoreError::Conflict("name already taken".to_string()));
            }
        }
        Ok(())
    }
}
