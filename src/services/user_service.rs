use crate::config::AuthConfig;
use crate::models::user::{User, UserLoginRequest, UserRegistrationRequest};
use crate::state::AuthSession;
use crate::utils::error::{sql_state, AppError, AppResult, UNIQUE_VIOLATION};
use crate::utils::jwt;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct UserService {
    pool: PgPool,
    auth: AuthConfig,
}

impl UserService {
    pub fn new(pool: PgPool, auth: AuthConfig) -> Self {
        UserService { pool, auth }
    }

    // Register a new customer account
    pub async fn register_user(&self, request: UserRegistrationRequest) -> AppResult<Uuid> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();

        // Check if email already exists
        let existing_user = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?;

        if existing_user.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        // Hash password
        let hashed_password = hash(request.password.as_bytes(), DEFAULT_COST)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let user_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO users (email, password_hash, full_name, role) VALUES ($1, $2, $3, 'customer') RETURNING id",
        )
        .bind(&email)
        .bind(&hashed_password)
        .bind(request.full_name.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match sql_state(&e).as_deref() {
            // lost a race with a concurrent registration
            Some(UNIQUE_VIOLATION) => AppError::Conflict("Email already registered".into()),
            _ => AppError::from(e),
        })?;

        tracing::info!(%user_id, "user registered");
        Ok(user_id)
    }

    // Login user
    pub async fn login_user(&self, request: UserLoginRequest) -> AppResult<AuthSession> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, full_name, role, created_at FROM users WHERE email = $1",
        )
        .bind(request.email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid credentials".into()))?;

        // Verify password
        let password_matches = verify(request.password.as_bytes(), &user.password_hash)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        if !password_matches {
            tracing::warn!(user_id = %user.id, "failed login attempt");
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        // Generate JWT token
        let (token, expires_at) = jwt::generate_token(user.id, user.role, &self.auth)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        Ok(AuthSession {
            user_id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            token,
            expires_at,
        })
    }
}
