use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use super::{Collection, Record, RecordFields};

/// A rentable listing
pub type Location = Record<LocationFields>;

/// Location columns, named the way the backend table names them
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LocationFields {
    #[serde(rename = "titulo", default)]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
    /// Daily price
    #[serde(rename = "preco", deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(rename = "cidade", default)]
    pub city: String,
    #[serde(rename = "imagem", default)]
    pub image_url: String,
    /// Linked characteristic record ids, in the order the backend keeps them
    #[serde(rename = "locacao_caracteristicas", default)]
    pub characteristic_ids: Vec<String>,
}

impl RecordFields for LocationFields {
    const COLLECTION: Collection = Collection::Locations;

    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("price must be a non-negative number, got {}", self.price));
        }
        Ok(())
    }
}

/// Accepts `120`, `120.5` and `"120"`; spreadsheet cells drift between the two.
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    match Price::deserialize(deserializer)? {
        Price::Number(n) => Ok(n),
        Price::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("price is not a number: {:?}", s))),
    }
}
