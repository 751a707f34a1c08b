use crate::config::AppConfig;
use crate::models::user::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket_okapi::request::OpenApiFromRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, OpenApiFromRequest)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub fn generate_token(
    secret: &str,
    user_id: i32,
    role: Role,
) -> Result<String, jsonwebtoken::errors::Error> {
    // Tokens are valid for 24 hours
    let expiration = (chrono::Utc::now() + chrono::Duration::hours(24)).timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let token = match request.headers().get_one("Authorization") {
            Some(header) => match header.strip_prefix("Bearer ") {
                Some(token) => token,
                None => return Outcome::Error((Status::Unauthorized, ())),
            },
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        let config = match request.rocket().state::<AppConfig>() {
            Some(config) => config,
            None => {
                tracing::error!("AppConfig is not managed, cannot verify tokens");
                return Outcome::Error((Status::InternalServerError, ()));
            }
        };

        match decode_token(&config.jwt_secret, token) {
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
}
