use chrono::{TimeDelta, Utc};
use error_stack::Report;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ripple_error::{ApiError, ErrorCategory};
use ripple_model::User;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::App;

static JWT_HEADER: LazyLock<Header> = LazyLock::new(|| Header::new(Algorithm::HS256));
static JWT_LOGIN_ISSUER: &str = "ripple.api.login";

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginClaims {
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
    pub sub: i64,

    pub name: String,
}

impl LoginClaims {
    pub fn generate(user: &User, expiry_hours: u64) -> LoginClaims {
        let now = Utc::now();
        Self {
            nbf: now.timestamp(),
            exp: (now + TimeDelta::hours(expiry_hours as i64)).timestamp(),
            iss: JWT_LOGIN_ISSUER.to_string(),
            sub: user.id.0,

            name: user.name.clone(),
        }
    }

    pub fn encode(&self, app: &App) -> Result<String, ApiError> {
        encode_jwt(&app.jwt_encode, self)
    }

    pub fn decode(app: &App, token: &str) -> Result<Self, ApiError> {
        decode_jwt(&app.jwt_decode, token)
    }
}

fn encode_jwt(key: &EncodingKey, claims: &LoginClaims) -> Result<String, ApiError> {
    jsonwebtoken::encode(&JWT_HEADER, claims, key).map_err(|error| {
        ApiError::from(Report::new(error).attach_printable("could not encode login jwt claims"))
    })
}

fn decode_jwt(key: &DecodingKey, token: &str) -> Result<LoginClaims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 30;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_issuer(&[JWT_LOGIN_ISSUER]);

    let token = token.replace(char::is_whitespace, "");
    match jsonwebtoken::decode(&token, key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(error) => match error.kind() {
            ErrorKind::ExpiredSignature => Err(ApiError::new(ErrorCategory::ExpiredToken)),
            ErrorKind::InvalidToken
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidSignature
            | ErrorKind::ImmatureSignature
            | ErrorKind::Base64(..)
            | ErrorKind::Json(..)
            | ErrorKind::Utf8(..) => Err(ApiError::new(ErrorCategory::AccessDenied)),
            _ => Err(ApiError::from(
                Report::new(error).attach_printable("could not decode login jwt claims"),
            )),
        },
    }
}
