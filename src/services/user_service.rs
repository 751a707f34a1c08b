use crate::models::user::{
    RegisterResponse, Role, User, UserLoginRequest, UserLoginResponse, UserRegistrationRequest,
};
use crate::utils::error::{inserted_id, AppError, AppResult};
use crate::utils::jwt;
use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::MySqlPool;
use validator::Validate;

const USERNAME_TAKEN: &str = "Username already exists";

#[derive(Clone)]
pub struct UserService {
    pool: MySqlPool,
    jwt_secret: String,
}

impl UserService {
    pub fn new(pool: MySqlPool, jwt_secret: String) -> Self {
        UserService { pool, jwt_secret }
    }

    /// Create a `USER` account.
    ///
    /// The early lookup gives the usual answer for a taken name; the unique
    /// index on `username` settles concurrent registrations of the same name.
    pub async fn register_user(
        &self,
        request: UserRegistrationRequest,
    ) -> AppResult<RegisterResponse> {
        request.validate()?;

        let existing_user = sqlx::query("SELECT id FROM users WHERE username = ?")
            .bind(&request.username)
            .fetch_optional(&self.pool)
            .await?;

        if existing_user.is_some() {
            return Err(AppError::Conflict(USERNAME_TAKEN.into()));
        }

        let hashed_password = hash(request.password.as_bytes(), DEFAULT_COST)
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let result = sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
            .bind(&request.username)
            .bind(hashed_password)
            .bind(Role::User.as_ref())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::conflict_on_duplicate(e, USERNAME_TAKEN))?;

        let user_id = inserted_id(&result)?;
        tracing::info!(user_id, username = %request.username, "user registered");

        Ok(RegisterResponse {
            user_id,
            username: request.username,
            role: Role::User,
        })
    }

    pub async fn login_user(&self, request: UserLoginRequest) -> AppResult<UserLoginResponse> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, role FROM users WHERE username = ?",
        )
        .bind(&request.username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid credentials".into()))?;

        let password_matches = verify(request.password.as_bytes(), &user.password)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        if !password_matches {
            tracing::debug!(username = %user.username, "login with wrong password");
            return Err(AppError::AuthError("Invalid credentials".into()));
        }

        let token = jwt::generate_token(&self.jwt_secret, user.id, user.role)
            .map_err(|e| AppError::AuthError(e.to_string()))?;

        Ok(UserLoginResponse {
            token,
            user_id: user.id,
            role: user.role,
        })
    }
}
