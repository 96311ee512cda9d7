use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::users::repo::{StoreError, UserRepo};
use crate::users::repo_types::{User, UserChanges};

/// In-memory `users` table with the same unique-email rule as the real schema.
#[derive(Default)]
pub struct MemoryUserRepo {
    rows: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn apply(changes: &UserChanges, user: &mut User) {
    if let Some(name) = &changes.name {
        user.name = name.clone();
    }
    if let Some(surname) = &changes.surname {
        user.surname = surname.clone();
    }
    if let Some(email) = &changes.email {
        user.email = email.clone();
    }
}

fn unique_violation(constraint: &str, detail: String) -> StoreError {
    StoreError::UniqueViolation {
        constraint: Some(constraint.into()),
        message: format!("duplicate key value violates unique constraint \"{constraint}\""),
        detail: Some(detail),
    }
}

fn email_taken(rows: &HashMap<Uuid, User>, email: &str, except: Option<Uuid>) -> bool {
    rows.values()
        .any(|u| u.email == email && Some(u.user_id) != except)
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&user.user_id) {
            return Err(unique_violation(
                "users_pkey",
                format!("Key (user_id)=({}) already exists.", user.user_id),
            ));
        }
        if email_taken(&rows, &user.email, None) {
            return Err(unique_violation(
                "users_email_key",
                format!("Key (email)=({}) already exists.", user.email),
            ));
        }
        rows.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.rows.lock().unwrap().get(&user_id).cloned())
    }

    async fn update(
        &self,
        user_id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<Uuid>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(email) = &changes.email {
            if email_taken(&rows, email, Some(user_id)) {
                return Err(unique_violation(
                    "users_email_key",
                    format!("Key (email)=({email}) already exists."),
                ));
            }
        }
        Ok(rows.get_mut(&user_id).map(|user| {
            apply(changes, user);
            user.user_id
        }))
    }

    async fn delete(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        Ok(self.rows.lock().unwrap().remove(&user_id).map(|u| u.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User::new("A".into(), "B".into(), email.into(), "hash".into())
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = MemoryUserRepo::new();
        repo.insert(user("a@b.com")).await.expect("first insert");
        let err = repo.insert(user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
        assert!(err.to_string().contains("Key (email)=(a@b.com) already exists."));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn update_to_own_email_is_allowed() {
        let repo = MemoryUserRepo::new();
        let u = repo.insert(user("a@b.com")).await.unwrap();
        let changes = UserChanges {
            email: Some("a@b.com".into()),
            ..Default::default()
        };
        assert_eq!(repo.update(u.user_id, &changes).await.unwrap(), Some(u.user_id));
    }

    #[tokio::test]
    async fn update_and_delete_missing_row_return_none() {
        let repo = MemoryUserRepo::new();
        let changes = UserChanges {
            name: Some("C".into()),
            ..Default::default()
        };
        assert_eq!(repo.update(Uuid::new_v4(), &changes).await.unwrap(), None);
        assert_eq!(repo.delete(Uuid::new_v4()).await.unwrap(), None);
    }
}
