use crate::config::AuthConfig;
use crate::models::user::Role;
use crate::policy::Principal;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket_okapi::request::OpenApiFromRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user_id
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, OpenApiFromRequest)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

/// Present on routes that serve both guests and logged-in users.
#[derive(Debug, Clone, Copy, OpenApiFromRequest)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

pub fn generate_token(
    user_id: Uuid,
    role: Role,
    config: &AuthConfig,
) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
    let expires_at = Utc::now() + Duration::hours(config.token_ttl_hours);

    let claims = Claims {
        sub: user_id,
        role,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok((token, expires_at))
}

pub fn decode_token(token: &str, config: &AuthConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

fn bearer_token<'r>(request: &'r Request<'_>) -> Option<&'r str> {
    request
        .headers()
        .get_one("Authorization")
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn authenticate(request: &Request<'_>, token: &str) -> Outcome<AuthenticatedUser, ()> {
    let config = match request.rocket().state::<AuthConfig>() {
        Some(config) => config,
        None => return Outcome::Error((Status::InternalServerError, ())),
    };

    match decode_token(token, config) {
        Ok(claims) => Outcome::Success(AuthenticatedUser {
            user_id: claims.sub,
            role: claims.role,
        }),
        Err(e) => {
            tracing::debug!(error = %e, "rejected bearer token");
            Outcome::Error((Status::Unauthorized, ()))
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match bearer_token(request) {
            Some(token) => authenticate(request, token),
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

// A missing header means "guest"; a bad token is still rejected.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match bearer_token(request) {
            Some(token) => authenticate(request, token).map(|user| OptionalUser(Some(user))),
            None => Outcome::Success(OptionalUser(None)),
        }
    }
}
