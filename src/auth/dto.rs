use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use validator::Validate;

use crate::store::User;

/// Request body for user registration. Fields are optional so that a
/// request missing several of them reports every violation at once.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name is required")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Please provide a valid email"),
        custom = "crate::validate::email"
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Password must be at least 6 characters long"),
        length(min = 6, message = "Password must be at least 6 characters long")
    )]
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "Please provide a valid email"),
        custom = "crate::validate::email"
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
}

/// Response for the current-user lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::field_errors;

    #[test]
    fn empty_registration_reports_every_field() {
        let errors = RegisterRequest::default().validate().unwrap_err();
        let details = field_errors(&errors);
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "name", "password"]);
        assert_eq!(details[0].message, "Please provide a valid email");
        assert_eq!(details[1].message, "Name is required");
        assert_eq!(details[2].message, "Password must be at least 6 characters long");
    }

    #[test]
    fn short_password_and_bad_email_fail_together() {
        let request = RegisterRequest {
            name: Some("Ada".into()),
            email: Some("not-an-email".into()),
            password: Some("abc".into()),
        };
        let details = field_errors(&request.validate().unwrap_err());
        let fields: Vec<&str> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[test]
    fn empty_name_is_treated_as_missing() {
        let request = RegisterRequest {
            name: Some(String::new()),
            email: Some("ada@example.com".into()),
            password: Some("password123".into()),
        };
        let details = field_errors(&request.validate().unwrap_err());
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "name");
        assert_eq!(details[0].message, "Name is required");
    }

    #[test]
    fn well_formed_registration_passes() {
        let request = RegisterRequest {
            name: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            password: Some("password123".into()),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn login_requires_a_password_but_not_a_long_one() {
        let request = LoginRequest {
            email: Some("ada@example.com".into()),
            password: Some("x".into()),
        };
        assert!(request.validate().is_ok());

        let request = LoginRequest {
            email: Some("ada@example.com".into()),
            password: None,
        };
        let details = field_errors(&request.validate().unwrap_err());
        assert_eq!(details[0].message, "Password is required");
    }

    #[test]
    fn public_user_omits_the_created_timestamp_and_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$x".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(PublicUser::from(&user)).expect("serialize");
        let keys: Vec<&str> = json.as_object().expect("object").keys().map(|k| k.as_str()).collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"id") && keys.contains(&"name") && keys.contains(&"email"));
    }
}
