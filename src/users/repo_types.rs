use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub hashed_password: String, // argon2 hash, not exposed in JSON
}

impl User {
    /// New active user with a freshly generated id.
    pub fn new(name: String, surname: String, email: String, hashed_password: String) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            name,
            surname,
            email,
            is_active: true,
            hashed_password,
        }
    }
}

/// Column changes for a partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none() && self.email.is_none()
    }
}
