// User Domain Model

use serde::{Deserialize, Serialize};

/// User ID (UUID v4)
pub type UserId = String;

/// User entity
///
/// Phone numbers are stored normalized (E.164-ish, see `domain::phone`).
/// Deletion is soft: a row with `deleted_at` set is invisible to lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,

    pub is_active: bool,
    pub is_admin: bool,
    pub is_verified: bool,

    pub created_at: i64, // epoch ms
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

impl User {
    /// Create a new user
    ///
    /// ID and timestamp are injected (not generated) so use cases stay
    /// deterministic under test.
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
            email,
            is_active: true,
            is_admin: false,
            is_verified: true,
            created_at,
            updated_at: created_at,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Display name used in SMS greetings
    pub fn display_name(&self) -> &str {
        &self.first_name
    }
}
