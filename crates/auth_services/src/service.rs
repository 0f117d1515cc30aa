use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::reset::{generate_reset_token, reset_token_expiry, reset_token_is_valid};
use crate::types::{AuthError, SignUpRequest, UpdateProfileRequest, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     avatar_url, is_admin, reset_password_token, reset_password_expires, created_at, updated_at";

/// A service for handling user authentication operations such as creating users,
/// retrieving user information, verifying credentials, managing sessions, and
/// the password-reset flow.
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    /// Creates a new instance of `AuthService` with the provided database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database with the provided sign-up request.
    ///
    /// Registration can never set the admin flag; elevation happens only through
    /// [`AuthService::grant_admin`].
    pub async fn create_user(&self, request: &SignUpRequest) -> Result<User, AuthError> {
        // Check if username already exists
        let existing_username = sqlx::query("SELECT id FROM users WHERE username = $1")
            .bind(request.username.trim())
            .fetch_optional(&self.pool)
            .await?;

        if existing_username.is_some() {
            return Err(AuthError::UsernameExists);
        }

        // Check if email already exists
        let existing_email = sqlx::query("SELECT id FROM users WHERE email = $1")
            .bind(request.email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        if existing_email.is_some() {
            return Err(AuthError::EmailExists);
        }

        // Hash the password
        let password_hash = hash(&request.password, DEFAULT_COST)?;

        let row = match &request.avatar_url {
            Some(avatar_url) => {
                sqlx::query(&format!(
                    r#"
                    INSERT INTO users (
                        username, email, password_hash, first_name, last_name, avatar_url
                    ) VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING {USER_COLUMNS}
                    "#,
                ))
                .bind(request.username.trim())
                .bind(request.email.to_lowercase().trim())
                .bind(&password_hash)
                .bind(&request.first_name)
                .bind(&request.last_name)
                .bind(avatar_url)
                .fetch_one(&self.pool)
                .await?
            }
            // The column default supplies the stock avatar
            None => {
                sqlx::query(&format!(
                    r#"
                    INSERT INTO users (
                        username, email, password_hash, first_name, last_name
                    ) VALUES ($1, $2, $3, $4, $5)
                    RETURNING {USER_COLUMNS}
                    "#,
                ))
                .bind(request.username.trim())
                .bind(request.email.to_lowercase().trim())
                .bind(&password_hash)
                .bind(&request.first_name)
                .bind(&request.last_name)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(user_from_row(&row))
    }

    /// Retrieves a user by their ID, returning `None` if not found.
    pub async fn get_user_by_id(&self, user_id: &Uuid) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    /// Retrieves a user by their username, returning `None` if not found.
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    /// Retrieves a user by their email address, returning `None` if not found.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| user_from_row(&row)))
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

    /// Creates a new session for the user with a refresh token hash.
    pub async fn create_session(
        &self,
        user_id: &Uuid,
        refresh_token_hash: &str,
    ) -> Result<Uuid, AuthError> {
        let row = sqlx::query(
            r#"
            INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(refresh_token_hash)
        .bind(Utc::now() + chrono::Duration::days(30)) // 30 day expiry
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    /// Deletes all sessions for the user, invalidating their refresh tokens.
    pub async fn delete_sessions(&self, user_id: &Uuid) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Updates the user's profile information.
    pub async fn update_profile(
        &self,
        user_id: &Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<User, AuthError> {
        let current_user = self
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // A changed email must not collide with another account
        let new_email = request.email.to_lowercase();
        if current_user.email != new_email
            && self.get_user_by_email(&new_email).await?.is_some()
        {
            return Err(AuthError::EmailExists);
        }

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET email = $1,
                first_name = $2,
                last_name = $3,
                avatar_url = COALESCE($4, avatar_url),
                updated_at = NOW()
            WHERE id = $5
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(new_email.trim())
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.avatar_url)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    /// Issues a password-reset token for the account with the given email.
    ///
    /// The token is 20 random bytes hex-encoded and expires one hour after
    /// issue. Returns the user and the plaintext token for mailing.
    pub async fn issue_reset_token(&self, email: &str) -> Result<(User, String), AuthError> {
        let user = self
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = generate_reset_token();
        let expires_at = reset_token_expiry(Utc::now());

        sqlx::query(
            r#"
            UPDATE users
            SET reset_password_token = $1,
                reset_password_expires = $2,
                updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(&token)
        .bind(expires_at)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok((user, token))
    }

    /// Completes a password reset: verifies the token is known and unexpired,
    /// stores the new password hash, and clears the token so it cannot be
    /// used a second time.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<User, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE reset_password_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let user = match row {
            Some(row) => user_from_row(&row),
            None => return Err(AuthError::ResetTokenInvalid),
        };

        let expires_at = user
            .reset_password_expires
            .ok_or(AuthError::ResetTokenInvalid)?;

        if !reset_token_is_valid(expires_at, Utc::now()) {
            return Err(AuthError::ResetTokenInvalid);
        }

        let password_hash = hash(new_password, DEFAULT_COST)?;

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET password_hash = $1,
                reset_password_token = NULL,
                reset_password_expires = NULL,
                updated_at = NOW()
            WHERE id = $2
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&password_hash)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(&row))
    }

    /// Grants the admin flag to `target_id`. Only an existing admin may do this.
    pub async fn grant_admin(&self, actor_id: &Uuid, target_id: &Uuid) -> Result<User, AuthError> {
        let actor = self
            .get_user_by_id(actor_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !actor.is_admin {
            return Err(AuthError::Forbidden);
        }

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET is_admin = true, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(user_from_row(&row)),
            None => Err(AuthError::UserNotFound),
        }
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        avatar_url: row.get("avatar_url"),
        is_admin: row.get("is_admin"),
        reset_password_token: row.get("reset_password_token"),
        reset_password_expires: row.get("reset_password_expires"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
