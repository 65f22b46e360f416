use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the `users` table. Columns that are missing or NULL in the
/// result set stay `None`; only the id is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct User {
    #[sqlx(rename = "user_id")]
    pub id: String,
    #[sqlx(rename = "username", default)]
    pub user_name: Option<String>,
    #[sqlx(default)]
    pub email: Option<String>,
    #[sqlx(default)]
    pub active: Option<bool>,
    #[sqlx(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Partial update of a user. Unset fields are left untouched in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub id: String,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

impl UserUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.user_name.is_none() && self.email.is_none() && self.active.is_none()
    }
}
