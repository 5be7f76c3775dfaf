use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Collection;

/// Untyped field set, as the backend sends and receives it
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A backend row: its record id plus the typed field set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record<F> {
    pub id: String,
    #[serde(
        rename = "createdTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_time: Option<DateTime<Utc>>,
    pub fields: F,
}

/// A record whose fields have not been checked yet
pub type RawRecord = Record<Fields>;

/// Field sets that belong to one backend collection.
///
/// `validate` runs after decoding and rejects rows that decode fine but make
/// no sense for the domain (empty names, negative prices).
pub trait RecordFields: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn validate(&self) -> Result<(), String>;
}

impl<F> Record<F> {
    pub fn new(id: impl Into<String>, fields: F) -> Self {
        Self {
            id: id.into(),
            created_time: None,
            fields,
        }
    }
}
