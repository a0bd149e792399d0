//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        user::{normalize_username, CreateUser, UpdateUser, User, UserClaims},
    },
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USERNAME_TAKEN: &str = "Username already exists";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Session lifetime in seconds
    pub fn token_lifetime(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    /// Whether `/auth/register` accepts anonymous callers
    pub fn open_registration(&self) -> bool {
        self.config.open_registration
    }

    /// Authenticate by username and password and return a JWT token.
    ///
    /// Unknown users and wrong passwords fail the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&user, password) {
            tracing::warn!("Failed login attempt for {}", user.username);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!("User {} logged in", user.username);
        Ok((token, user))
    }

    /// Create JWT token for a user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            role: user.role,
            exp: now + self.token_lifetime(),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Decode and validate a session token
    pub fn verify_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Create a new user (registration and admin creation share this path)
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()?;
        let username = normalize_username(&user.username)?;

        if self.repository.users.username_exists(username, None).await? {
            return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
        }

        let hash = hash_password(&user.password)?;
        let created = self
            .repository
            .users
            .create(username, &hash, user.role)
            .await
            .map_err(unique_as_taken)?;

        tracing::info!("Created user {} with role {}", created.username, created.role);
        Ok(created)
    }

    /// Update username and/or role
    pub async fn update_user(&self, id: i32, user: UpdateUser) -> AppResult<User> {
        user.validate()?;
        let username = user.username.as_deref().map(normalize_username).transpose()?;
        self.repository.users.get_by_id(id).await?;

        if let Some(username) = username {
            if self.repository.users.username_exists(username, Some(id)).await? {
                return Err(AppError::Conflict(USERNAME_TAKEN.to_string()));
            }
        }

        let updated = self
            .repository
            .users
            .update(id, username, user.role)
            .await
            .map_err(unique_as_taken)?;
        tracing::info!("Updated user {}", id);
        Ok(updated)
    }

    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    /// Create the configured administrator when the user table is empty.
    ///
    /// Returns the created user, if any.
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<Option<User>> {
        let Some(ref admin) = self.config.bootstrap_admin else {
            return Ok(None);
        };

        if self.repository.users.count().await? > 0 {
            return Ok(None);
        }

        let user = self
            .create_user(CreateUser {
                username: admin.username.clone(),
                password: admin.password.clone(),
                role: Role::Admin,
            })
            .await?;
        tracing::warn!("Bootstrap administrator {} created", user.username);
        Ok(Some(user))
    }
}

/// Two concurrent registrations can both pass the existence check; the unique
/// index catches the second one.
fn unique_as_taken(err: AppError) -> AppError {
    match err {
        AppError::Database(ref e)
            if e.as_database_error()
                .and_then(|db| db.code())
                .is_some_and(|code| code == "23505") =>
        {
            AppError::Conflict(USERNAME_TAKEN.to_string())
        }
        other => other,
    }
}

/// Verify a password against the stored argon2 hash
fn verify_password(user: &User, password: &str) -> bool {
    match PasswordHash::new(&user.password) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => {
            tracing::error!("Stored password hash for user {} is malformed", user.id);
            false
        }
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
