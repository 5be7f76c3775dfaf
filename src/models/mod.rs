mod characteristic;
mod location;
mod record;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use characteristic::{Characteristic, CharacteristicFields};
pub use location::{Location, LocationFields};
pub use record::{Fields, RawRecord, Record, RecordFields};

/// The two record collections kept by the backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Locations,
    Characteristics,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locations => "locations",
            Self::Characteristics => "characteristics",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
