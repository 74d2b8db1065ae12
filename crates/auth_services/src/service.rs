use bcrypt::{DEFAULT_COST, hash, verify};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::types::{AuthError, RegisterRequest, User};

/// A service for handling user account operations such as creating users,
/// retrieving user information, and verifying credentials.
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    /// Creates a new instance of `AuthService` with the provided database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database with the provided registration request.
    pub async fn create_user(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        // Check if email already exists
        let existing_email = sqlx::query("SELECT id FROM users WHERE email = $1")
            .bind(request.email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        if existing_email.is_some() {
            return Err(AuthError::EmailExists);
        }

        // Check if username already exists
        let existing_username = sqlx::query("SELECT id FROM users WHERE username = $1")
            .bind(request.username.trim())
            .fetch_optional(&self.pool)
            .await?;

        if existing_username.is_some() {
            return Err(AuthError::UsernameExists);
        }

        // Hash the password
        let password_hash = hash(&request.password, DEFAULT_COST)?;

        // Insert the new user
        let row = sqlx::query(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, username, password_hash, created_at, updated_at
            "#,
        )
        .bind(request.email.to_lowercase().trim())
        .bind(request.username.trim())
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        let user = User {
            id: row.get("id"),
            email: row.get("email"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        };

        Ok(user)
    }

    /// Retrieves a user by their ID, returning `None` if not found.
    pub async fn get_user_by_id(&self, user_id: &Uuid) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, username, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let user = User {
                id: row.get("id"),
                email: row.get("email"),
                username: row.get("username"),
                password_hash: row.get("password_hash"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            };
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Retrieves a user by their username, returning `None` if not found.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, username, password_hash, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            let user = User {
                id: row.get("id"),
                email: row.get("email"),
                username: row.get("username"),
                password_hash: row.get("password_hash"),
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            };
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Verifies the user's password against the stored hash.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid = verify(password, &user.password_hash)?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use bcrypt::{hash, verify};

    #[test]
    fn password_hash_roundtrip() {
        // Minimum cost keeps the test fast; the service uses DEFAULT_COST.
        let hashed = hash("correct horse battery staple", 4).unwrap();

        assert!(verify("correct horse battery staple", &hashed).unwrap());
        assert!(!verify("wrong password", &hashed).unwrap());
    }
}
