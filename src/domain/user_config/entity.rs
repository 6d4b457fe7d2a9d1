//! Per-user configuration record

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::user::UserId;

/// Companion record of a [`User`](crate::domain::user::User), keyed by the
/// owning user's ID and created together with the account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserConfig {
    user_id: UserId,
    settings: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserConfig {
    /// Empty configuration for a newly registered user
    pub fn for_user(user_id: UserId) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            settings: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_parts(
        user_id: UserId,
        settings: BTreeMap<String, String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            settings,
            created_at,
            updated_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn settings(&self) -> &BTreeMap<String, String> {
        &self.settings
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Merge `settings` into the current values; existing keys are overwritten
    pub fn merge(&mut self, settings: BTreeMap<String, String>) {
        if settings.is_empty() {
            return;
        }
        self.settings.extend(settings);
        self.updated_at = Utc::now();
    }
}
