// Formulaires reçus par l'API et réponses structurées
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{posts, users};

// ---------------------------------------------------------------------------
// Formulaires
// ---------------------------------------------------------------------------

// Rejette une valeur faite uniquement d'espaces ("   " passe `length(min = 1)`)
fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("This field cannot be blank".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 64, message = "Username is required (64 characters max)"),
        custom(function = "validate_not_blank")
    )]
    pub username: String,
    #[validate(email(message = "Invalid email address"), length(max = 120))]
    pub email: String,
    #[validate(
        length(min = 1, message = "Password is required"),
        custom(function = "validate_not_blank")
    )]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub password2: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1), custom(function = "validate_not_blank"))]
    pub username: String,
    #[validate(length(min = 1), custom(function = "validate_not_blank"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditProfileRequest {
    #[validate(
        length(min = 1, max = 64, message = "Username is required (64 characters max)"),
        custom(function = "validate_not_blank")
    )]
    pub username: String,
    #[validate(length(max = 140, message = "About me is limited to 140 characters"))]
    pub about_me: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(
        length(min = 1, max = 140, message = "A post holds between 1 and 140 characters"),
        custom(function = "validate_not_blank")
    )]
    pub body: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequestForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordForm {
    #[validate(
        length(min = 1, message = "Password is required"),
        custom(function = "validate_not_blank")
    )]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    /// Page 1 par défaut, comme `?page=` absent
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1)
    }
}

// ---------------------------------------------------------------------------
// Réponses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i32,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Un post tel qu'affiché dans un feed (avec le nom de l'auteur)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostView {
    pub id: i32,
    pub body: String,
    pub timestamp: NaiveDateTime,
    pub author_id: i32,
    pub author: Option<String>,
}

impl PostView {
    pub fn new(post: posts::Model, author: Option<users::Model>) -> Self {
        Self {
            id: post.id,
            body: post.body,
            timestamp: post.timestamp,
            author_id: post.user_id,
            author: author.map(|u| u.username),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i32,
    pub username: String,
    pub about_me: Option<String>,
    pub last_seen: Option<NaiveDateTime>,
}

impl From<users::Model> for UserView {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            about_me: user.about_me,
            last_seen: user.last_seen,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse<P: Serialize> {
    pub user: UserView,
    pub followers: u64,
    pub following: u64,
    pub is_following: bool,
    pub posts: P,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_login_rejected() {
        let blank = LoginRequest { username: "   ".into(), password: "\t \n".into() };
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("password"));

        let ok = LoginRequest { username: "susan".into(), password: "cat".into() };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_blank_post_and_username_rejected() {
        let post = CreatePostRequest { body: "    ".into() };
        assert!(post.validate().is_err());

        let post = CreatePostRequest { body: " hi ".into() };
        assert!(post.validate().is_ok());

        let profile = EditProfileRequest { username: "  ".into(), about_me: None };
        assert!(profile.validate().unwrap_err().field_errors().contains_key("username"));
    }
}
