// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Demo credential store for the login endpoint.
//!
//! Plain-text passwords in memory. This exists so the auth service has
//! something to check a login against; it is not an account system.

use std::collections::HashMap;

use crate::auth::roles::{ADMIN_ROLE, USER_ROLE};

struct UserRecord {
    password: String,
    roles: Vec<String>,
}

#[derive(Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `admin` (admin, user) and `user1` (user), both with `password123`.
    pub fn with_demo_users() -> Self {
        let mut store = Self::new();
        store.insert_user("admin", "password123", &[ADMIN_ROLE, USER_ROLE]);
        store.insert_user("user1", "password123", &[USER_ROLE]);
        store
    }

    pub fn insert_user(&mut self, username: &str, password: &str, roles: &[&str]) {
        self.users.insert(
            username.to_string(),
            UserRecord {
                password: password.to_string(),
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
        );
    }

    /// Roles of `username` if the password matches.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&[String]> {
        self.users
            .get(username)
            .filter(|user| user.password == password)
            .map(|user| user.roles.as_slice())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_users_authenticate_with_roles() {
        let store = InMemoryUserStore::with_demo_users();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.authenticate("admin", "password123"),
            Some(&["admin".to_string(), "user".to_string()][..])
        );
        assert_eq!(
            store.authenticate("user1", "password123"),
            Some(&["user".to_string()][..])
        );
    }

    #[test]
    fn wrong_password_or_unknown_user_fails() {
        let store = InMemoryUserStore::with_demo_users();
        assert_eq!(store.authenticate("admin", "wrong"), None);
        assert_eq!(store.authenticate("nobody", "password123"), None);
        assert!(InMemoryUserStore::new().is_empty());
    }
}
