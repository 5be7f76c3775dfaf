use serde::{Deserialize, Serialize};

use super::{Collection, Record, RecordFields};

/// An amenity or tag that can be linked to locations
pub type Characteristic = Record<CharacteristicFields>;

/// Absent optional columns are written as `null`: the backend's PATCH leaves
/// omitted columns untouched, so this is what clears them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CharacteristicFields {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "icone", default)]
    pub icon: Option<String>,
}

impl RecordFields for CharacteristicFields {
    const COLLECTION: Collection = Collection::Characteristics;

    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is empty".to_string());
        }
        Ok(())
    }
}
