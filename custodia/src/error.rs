use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("internal error: {0:#?}")]
    Internal(#[from] anyhow::Error),

    #[error("configuration error: {0:#?}")]
    Config(anyhow::Error),

    /// A required request parameter was absent or empty.
    #[error("missing parameter: {0}")]
    MissingParam(String),

    /// A supplied value failed a format or business-rule check.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(anyhow::Error),

    /// A row could not be mapped onto the expected entity shape.
    #[error("decode error: {0}")]
    Decode(anyhow::Error),

    /// The store executed an insert but did not hand back the new key.
    #[error("generated key unavailable: {0}")]
    GeneratedKey(String),
}

impl Error {
    pub fn missing_param(field: impl Into<String>) -> Self {
        Self::MissingParam(field.into())
    }

    pub fn invalid_param(field: impl Into<String>) -> Self {
        Self::InvalidParam(field.into())
    }

    /// Stable machine-readable code, rendered in error responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Internal(_) => "INTERNAL",
            Self::Config(_) => "CONFIG",
            Self::MissingParam(_) => "MISSING_PARAM",
            Self::InvalidParam(_) => "INVALID_PARAM",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE",
            Self::Decode(_) => "DECODE",
            Self::GeneratedKey(_) => "GENERATED_KEY",
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParam(_) | Self::InvalidParam(_) | Self::NotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
