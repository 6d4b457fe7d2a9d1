use serde::{Deserialize, Serialize};

/// What happens to a user's config record when the user is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigDeletionPolicy {
    /// Delete the config right after the user
    #[default]
    Cascade,
    /// Leave the config to the store's referential rules
    Retain,
}
