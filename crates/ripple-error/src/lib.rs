mod category;
pub use self::category::{ErrorCategory, LoginUserFailed, RegisterUserFailed};

#[cfg(feature = "axum")]
mod axum;

/// An error that can be safely serialized into an HTTP response.
///
/// Every error leaving the service layer is one of these. Internal
/// failures (database reports and friends) are converted through
/// [`From<error_stack::Report<C>>`] which logs the report and hides it
/// behind [`ErrorCategory::Unknown`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ApiError {
    pub category: ErrorCategory,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(category: ErrorCategory) -> Self {
        Self {
            category,
            message: None,
        }
    }

    pub fn unknown() -> Self {
        Self::new(ErrorCategory::Unknown)
    }

    pub fn message(self, message: impl Into<String>) -> Self {
        Self {
            category: self.category,
            message: Some(message.into()),
        }
    }
}

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.category == other.category
    }
}

impl Eq for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.category.code()),
            None => f.write_str(self.category.code()),
        }
    }
}

impl serde::Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let subcode = self.category.subcode();
        let len = 1 + usize::from(subcode.is_some()) + usize::from(self.message.is_some());

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("code", self.category.code())?;
        if let Some(subcode) = subcode {
            map.serialize_entry("subcode", subcode)?;
        }
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        map.end()
    }
}

impl<C> From<error_stack::Report<C>> for ApiError {
    #[track_caller]
    fn from(report: error_stack::Report<C>) -> Self {
        tracing::error!(error = ?report, "Caught internal server error");
        ApiError::unknown().message("Unexpected error has occurred. Please try again later.")
    }
}
