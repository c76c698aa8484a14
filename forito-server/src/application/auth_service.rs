use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, SignupRequest, User};
use crate::infrastructure::jwt::JwtService;

/// Hashing cost and token lifetimes, supplied from settings at startup.
#[derive(Debug, Clone)]
pub(crate) struct AuthConfig {
    pub(crate) hash_memory_kib: u32,
    pub(crate) hash_iterations: u32,
    pub(crate) login_ttl_seconds: i64,
    pub(crate) signup_ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) token: String,
}

pub(crate) struct AuthService<R: UserRepository> {
    repo: R,
    jwt: Arc<JwtService>,
    config: AuthConfig,
}

impl<R: UserRepository> AuthService<R> {
    pub(crate) fn new(repo: R, jwt: Arc<JwtService>, config: AuthConfig) -> Self {
        Self { repo, jwt, config }
    }

    pub(crate) async fn signup(&self, req: SignupRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        if self.repo.find_by_email(&req.email).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!(
                "user email: {}",
                req.email
            )));
        }

        let password_hash = self.hash_password(&req.password)?;
        let user = self
            .repo
            .create_user(NewUser {
                name: req.display_name(),
                email: req.email.clone(),
                password_hash,
            })
            .await?;

        let token = self
            .jwt
            .generate_token(&user.id, &user.email, self.config.signup_ttl_seconds)
            .map_err(|e| DomainError::Unexpected(e.to_string()))?;

        Ok(AuthResult { user, token })
    }

    /// Unknown email and wrong password are reported distinctly, keeping the
    /// historical API contract.
    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let credentials = self
            .repo
            .find_by_email(&req.email)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user email: {}", req.email)))?;

        self.verify_password(&req.password, &credentials.password_hash)?;

        let user = credentials.user;
        let token = self
            .jwt
            .generate_token(&user.id, &user.email, self.config.login_ttl_seconds)
            .map_err(|e| DomainError::Unexpected(e.to_string()))?;

        Ok(AuthResult { user, token })
    }

    fn hasher(&self) -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(self.config.hash_memory_kib, self.config.hash_iterations, 1, None)
            .map_err(|e| DomainError::Unexpected(format!("invalid hash parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DomainError::Unexpected(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, stored_hash: &str) -> Result<(), DomainError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| DomainError::Unexpected(format!("stored hash is malformed: {e}")))?;
        self.hasher()?
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| DomainError::InvalidCredentials)
    }
}
