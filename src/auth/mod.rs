//! Account registration, login and JWT verification.

pub mod user;

use std::sync::Arc;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::ids::{IdGenerator, MAX_ID_ATTEMPTS, USER_ID_PREFIX};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Internal user id (UUID).
    pub sub: String,
    pub name: String,
    pub email: String,
    /// Token id, for audit logs.
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
    /// Token lifetime in seconds.
    pub expiration_secs: i64,
}

impl From<&AppConfig> for AuthConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            issuer: config.auth_issuer.clone(),
            audience: config.auth_audience.clone(),
            expiration_secs: config.jwt_expiration,
        }
    }
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(hash).map_err(|e| ServiceError::HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn issue_token(config: &AuthConfig, user: &user::Model) -> Result<String, ServiceError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp: now + config.expiration_secs,
        nbf: now,
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ServiceError::InternalError(format!("Failed to sign token: {}", e)))
}

fn decode_token(config: &AuthConfig, token: &str) -> Result<Claims, ServiceError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    validation.set_audience(&[&config.audience]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| ServiceError::Unauthorized("Invalid or expired token".to_string()))
}

pub struct AuthService {
    db: DbPool,
    config: AuthConfig,
    ids: Arc<dyn IdGenerator>,
    events: EventSender,
}

impl AuthService {
    pub fn new(
        db: DbPool,
        config: AuthConfig,
        ids: Arc<dyn IdGenerator>,
        events: EventSender,
    ) -> Self {
        Self {
            db,
            config,
            ids,
            events,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode_token(&self.config, token)
    }

    /// Creates an account and returns a signed token plus the stored user.
    #[instrument(skip(self, request))]
    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<(String, user::Model), ServiceError> {
        request.validate()?;
        let name = require_field(request.name, "Name is required")?;
        let email = require_field(request.email, "Email is required")?;
        let password = require_field(request.password, "Password is required")?;

        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(email.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict("User already exists".to_string()));
        }

        let public_id = self.unused_public_id().await?;
        let now = Utc::now();

        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            public_id: Set(public_id),
            name: Set(name),
            email: Set(email),
            password_hash: Set(hash_password(&password)?),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = model.insert(&self.db).await?;
        self.events.send_or_log(Event::UserRegistered(saved.id)).await;

        let token = issue_token(&self.config, &saved)?;
        Ok((token, saved))
    }

    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> Result<(String, user::Model), ServiceError> {
        let email = require_field(request.email, "Email is required")?;
        let password = require_field(request.password, "Password is required")?;

        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&password, &user.password_hash)? {
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = issue_token(&self.config, &user)?;
        Ok((token, user))
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Generates a `USR-...` id that no existing account uses. Collisions are
    /// rare (six random digits per year) so a bounded retry suffices.
    async fn unused_public_id(&self) -> Result<String, ServiceError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = self.ids.generate(USER_ID_PREFIX);
            let taken = user::Entity::find()
                .filter(user::Column::PublicId.eq(candidate.clone()))
                .one(&self.db)
                .await?
                .is_some();
            if !taken {
                return Ok(candidate);
            }
        }
        Err(ServiceError::InternalError(
            "Failed to generate unique user ID. Please try again.".to_string(),
        ))
    }
}

fn require_field(value: Option<String>, message: &str) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::ValidationError(message.to_string())),
    }
}

/// Authenticated caller, extracted from the `Authorization: Bearer` header.
/// Relies on `Arc<AuthService>` being injected into request extensions.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub token_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_service = parts
            .extensions
            .get::<Arc<AuthService>>()
            .cloned()
            .ok_or_else(|| {
                ServiceError::InternalError("Auth service not configured".to_string())
            })?;

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ServiceError::Unauthorized("No token, authorization denied".to_string())
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ServiceError::Unauthorized("No token, authorization denied".to_string())
        })?;

        let claims = auth_service.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(AuthUser {
            user_id,
            name: claims.name,
            email: claims.email,
            token_id: claims.jti,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            user_id: user.public_id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

pub fn auth_routes() -> Router<Arc<AuthService>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub(crate) async fn register(
    State(service): State<Arc<AuthService>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ServiceError> {
    let (token, user) = service.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub(crate) async fn login(
    State(service): State<Arc<AuthService>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    let (token, user) = service.login(request).await?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub(crate) async fn me(
    State(service): State<Arc<AuthService>>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ServiceError> {
    let user = service.get_user(auth.user_id).await?;
    Ok(Json(user.into()))
}
