use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;
use crate::users::{dto::UserCreate, repo_types::UserChanges};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    Ok(())
}

pub(crate) fn validate_create(body: &UserCreate) -> Result<(), ApiError> {
    require_text("name", &body.name)?;
    require_text("surname", &body.surname)?;
    require_email(&body.email)?;
    if body.password.is_empty() {
        return Err(ApiError::Validation("password must not be empty".into()));
    }
    Ok(())
}

/// Rejects an empty change set, then checks each present field.
pub(crate) fn validate_changes(changes: &UserChanges) -> Result<(), ApiError> {
    if changes.is_empty() {
        return Err(ApiError::Validation(
            "At least one parameter for user update info should be provided".into(),
        ));
    }
    if let Some(name) = &changes.name {
        require_text("name", name)?;
    }
    if let Some(surname) = &changes.surname {
        require_text("surname", surname)?;
    }
    if let Some(email) = &changes.email {
        require_email(email)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(name: &str, email: &str, password: &str) -> UserCreate {
        UserCreate {
            name: name.into(),
            surname: "B".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn create_requires_all_fields() {
        assert!(validate_create(&body("A", "a@b.com", "p")).is_ok());
        assert!(matches!(
            validate_create(&body("  ", "a@b.com", "p")),
            Err(ApiError::Validation(_))
        ));
        assert!(validate_create(&body("A", "nope", "p")).is_err());
        assert!(validate_create(&body("A", "a@b.com", "")).is_err());
    }

    #[test]
    fn empty_changes_are_rejected() {
        let err = validate_changes(&UserChanges::default()).unwrap_err();
        assert!(err.to_string().contains("At least one parameter"));
    }

    #[test]
    fn present_fields_are_checked() {
        let changes = UserChanges {
            email: Some("broken".into()),
            ..Default::default()
        };
        assert!(validate_changes(&changes).is_err());
        let changes = UserChanges {
            surname: Some("D".into()),
            ..Default::default()
        };
        assert!(validate_changes(&changes).is_ok());
    }
}
