/// High-level classification of every error the API can emit.
///
/// The category decides both the HTTP status code and the `code`
/// (plus optional `subcode`) fields of the serialized error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// We don't know what is the cause of this error but the error we
    /// have in our server is reported to the operators.
    Unknown,

    /// Bad or missing input from the client.
    InvalidRequest,

    /// Missing or invalid credentials.
    AccessDenied,

    /// The session token was valid once but has expired since.
    ExpiredToken,

    /// Acting on a resource owned by somebody else.
    Forbidden,

    /// The referenced entity does not exist.
    NotFound,

    /// One of our backing services (usually the database) is down.
    Outage,

    LoginUserFailed(LoginUserFailed),
    RegisterUserFailed(RegisterUserFailed),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginUserFailed {
    InvalidCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterUserFailed {
    UsernameTaken,
    EmailTaken,
    WeakPassword,
}

impl ErrorCategory {
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::InvalidRequest => "invalid_request",
            Self::AccessDenied => "access_denied",
            Self::ExpiredToken => "expired_token",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Outage => "outage",
            Self::LoginUserFailed(..) => "login_user_failed",
            Self::RegisterUserFailed(..) => "register_user_failed",
        }
    }

    #[must_use]
    pub fn subcode(&self) -> Option<&'static str> {
        match self {
            Self::LoginUserFailed(subcode) => Some(match subcode {
                LoginUserFailed::InvalidCredentials => "invalid_credentials",
            }),
            Self::RegisterUserFailed(subcode) => Some(match subcode {
                RegisterUserFailed::UsernameTaken => "username_taken",
                RegisterUserFailed::EmailTaken => "email_taken",
                RegisterUserFailed::WeakPassword => "weak_password",
            }),
            _ => None,
        }
    }
}
