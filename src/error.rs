use thiserror::Error;

use crate::models::Collection;

/// Errors raised by the rental client library
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (DNS, TLS, connection reset...)
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    /// A backend record failed boundary validation
    #[error("invalid {collection} record {id}: {reason}")]
    InvalidRecord {
        collection: Collection,
        id: String,
        reason: String,
    },

    /// A locally stored value could not be read back as text
    #[error("stored value under {key:?} is corrupt: {reason}")]
    CorruptPayload { key: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    #[error("invalid configuration: {message}")]
    ConfigValidation { message: String },

    /// One or more form fields were rejected
    #[error("form has invalid fields: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Whether this error means the backend has no such record
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound {
            collection: Collection::Locations,
            id: "rec404".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "locations record not found: rec404");
    }

    #[test]
    fn test_validation_message_joins_fields() {
        let err = Error::Validation(vec!["title is required".into(), "city is required".into()]);
        assert_eq!(
            err.to_string(),
            "form has invalid fields: title is required; city is required"
        );
        assert!(!err.is_not_found());
    }
}
