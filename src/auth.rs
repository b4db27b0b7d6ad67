use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{AppConfig, Env},
    error::AppError,
    models::{ADMIN_ROLE, User},
    repository::RepositoryState,
};

/// Name of the cookie carrying the identity token for browser sessions.
pub const AUTH_COOKIE: &str = "auth_token";

/// Claims
///
/// Payload of the identity token issued by the external identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the `users.id` of the caller.
    pub sub: i64,
    pub exp: usize,
    pub iat: usize,
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Taking it as a handler argument is what
/// makes a route "authenticated".
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        AuthUser {
            id: user.id,
            role: user.role,
        }
    }
}

/// AdminUser
///
/// An `AuthUser` whose role is `admin`. Non-admin identities are rejected with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

/// Resolution order:
/// 1. `Env::Local` only: an `x-user-id` header naming an existing user.
/// 2. `Authorization: Bearer <jwt>`.
/// 3. The `auth_token` cookie.
///
/// The token subject is always looked up again, so deleted users lose access immediately.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.env == Env::Local {
            let bypass_id = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<i64>().ok());

            if let Some(user_id) = bypass_id {
                if let Some(user) = repo.get_user(user_id).await? {
                    return Ok(user.into());
                }
            }
        }

        let token = bearer_token(parts)
            .or_else(|| {
                CookieJar::from_headers(&parts.headers)
                    .get(AUTH_COOKIE)
                    .map(|cookie| cookie.value().to_string())
            })
            .ok_or(AppError::Unauthorized)?;

        let claims = decode_claims(&token, &config.jwt_secret)?;

        let user = repo
            .get_user(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(user.into())
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!(user_id = user.id, "admin route refused");
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Verifies signature and expiry of an HS256 identity token.
pub fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("rejected token: {:?}", e.kind());
            AppError::Unauthorized
        })
}
