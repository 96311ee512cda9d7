use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::repo_types::{User, UserChanges};

/// Request body for user creation.
#[derive(Debug, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
}

/// Partial update body; absent and `null` fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            surname: req.surname,
            email: req.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct ShowUser {
    pub user_id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
}

impl From<User> for ShowUser {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            name: u.name,
            surname: u.surname,
            email: u.email,
            is_active: u.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpdatedUserResponse {
    pub updated_user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub deleted_user_id: Uuid,
}
