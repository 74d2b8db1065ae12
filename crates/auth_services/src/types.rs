use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Request structure for creating an account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Public username shown on campgrounds and reviews
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    pub username: String,

    /// Password for the new account
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request structure for logging in
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username of the account
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password for the account
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User model representing the database schema
#[derive(Debug, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Email address of the user
    pub email: String,
    /// Public username of the user
    pub username: String,
    /// Hashed password of the user
    pub password_hash: String,
    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// Public user information, used in responses
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// Unique identifier for the user
    pub id: Uuid,
    /// Public username of the user
    pub username: String,
    /// Email address of the user
    pub email: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Custom error type for authentication-related errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The email address already exists in the system
    #[error("A user with the given email is already registered")]
    EmailExists,

    /// The username is already taken
    #[error("A user with the given username is already registered")]
    UsernameExists,

    /// The provided credentials are invalid
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The user was not found in the system
    #[error("User not found")]
    UserNotFound,

    /// An internal server error occurred
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An error occurred while hashing the password
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// An error occurred while validating input data
    #[error("Validation error: {0}")]
    Validation(String),
}

impl actix_web::ResponseError for AuthError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            AuthError::EmailExists => HttpResponse::Conflict().json(serde_json::json!({
                "error": "email_exists",
                "message": "An account with this email already exists"
            })),
            AuthError::UsernameExists => HttpResponse::Conflict().json(serde_json::json!({
                "error": "username_exists",
                "message": "An account with this username already exists"
            })),
            AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "invalid_credentials",
                "message": "Invalid username or password"
            })),
            AuthError::UserNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "user_not_found",
                "message": "User not found"
            })),
            AuthError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "An internal error occurred"
            })),
        }
    }
}
