use serde::{Deserialize, Serialize};

use crate::models::{Fields, RawRecord};

/// Body of POST and PATCH requests: `{ "records": [ { "id"?, "fields" } ] }`
#[derive(Debug, Serialize)]
pub struct WriteEnvelope<'a> {
    pub records: Vec<WriteRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct WriteRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub fields: &'a Fields,
}

impl<'a> WriteEnvelope<'a> {
    pub fn create(fields: &'a Fields) -> Self {
        Self {
            records: vec![WriteRecord { id: None, fields }],
        }
    }

    pub fn update(id: &'a str, fields: &'a Fields) -> Self {
        Self {
            records: vec![WriteRecord {
                id: Some(id),
                fields,
            }],
        }
    }
}

/// Body of list, create and update responses
#[derive(Debug, Deserialize)]
pub struct RecordsEnvelope {
    pub records: Vec<RawRecord>,
    /// Pagination cursor. Never followed.
    #[serde(default)]
    pub offset: Option<String>,
}

/// Error body; the backend uses two shapes for it
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: BackendError,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BackendError {
    Detailed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        message: Option<String>,
    },
    Code(String),
}

impl BackendError {
    pub fn message(&self) -> String {
        match self {
            Self::Detailed {
                kind,
                message: Some(message),
            } => format!("{}: {}", kind, message),
            Self::Detailed { kind, message: None } => kind.clone(),
            Self::Code(code) => code.clone(),
        }
    }
}
