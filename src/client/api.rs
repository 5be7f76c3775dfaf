use crate::client::traits::RecordStore;
use crate::error::{Error, Result};
use crate::models::{
    Characteristic, CharacteristicFields, Fields, Location, LocationFields, RawRecord, Record,
    RecordFields,
};
use serde_json::Value;
use tracing::{debug, warn};

/// Typed access to locations and characteristics.
///
/// Rows coming back from the store are decoded and validated here, so the
/// view layer only ever sees well-formed records.
pub struct RentalApi {
    store: Box<dyn RecordStore>,
}

/// Both collections, fetched together
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub locations: Vec<Location>,
    pub characteristics: Vec<Characteristic>,
}

impl Catalog {
    /// Characteristics linked to `location`, in link order. Dangling ids are skipped.
    pub fn characteristics_of(&self, location: &Location) -> Vec<&Characteristic> {
        location
            .fields
            .characteristic_ids
            .iter()
            .filter_map(|id| self.characteristics.iter().find(|c| &c.id == id))
            .collect()
    }
}

impl RentalApi {
    pub fn new(store: impl RecordStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn locations(&self) -> Result<Vec<Location>> {
        self.list().await
    }

    pub async fn location(&self, id: &str) -> Result<Location> {
        self.get(id).await
    }

    pub async fn create_location(&self, fields: &LocationFields) -> Result<Location> {
        self.create(fields).await
    }

    pub async fn update_location(&self, id: &str, fields: &LocationFields) -> Result<Location> {
        self.update(id, fields).await
    }

    pub async fn delete_location(&self, id: &str) -> Result<()> {
        self.store.delete(LocationFields::COLLECTION, id).await
    }

    pub async fn characteristics(&self) -> Result<Vec<Characteristic>> {
        self.list().await
    }

    pub async fn characteristic(&self, id: &str) -> Result<Characteristic> {
        self.get(id).await
    }

    pub async fn create_characteristic(
        &self,
        fields: &CharacteristicFields,
    ) -> Result<Characteristic> {
        self.create(fields).await
    }

    pub async fn update_characteristic(
        &self,
        id: &str,
        fields: &CharacteristicFields,
    ) -> Result<Characteristic> {
        self.update(id, fields).await
    }

    pub async fn delete_characteristic(&self, id: &str) -> Result<()> {
        self.store
            .delete(CharacteristicFields::COLLECTION, id)
            .await
    }

    /// Fetch both collections concurrently; fails if either request fails
    pub async fn catalog(&self) -> Result<Catalog> {
        let (locations, characteristics) =
            tokio::try_join!(self.locations(), self.characteristics())?;
        Ok(Catalog {
            locations,
            characteristics,
        })
    }

    /// Rows that fail validation are dropped from listings with a warning
    async fn list<F: RecordFields>(&self) -> Result<Vec<Record<F>>> {
        let raw = self.store.list(F::COLLECTION).await?;
        let total = raw.len();

        let records: Vec<Record<F>> = raw
            .into_iter()
            .filter_map(|record| match decode::<F>(record) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping row: {}", e);
                    None
                }
            })
            .collect();

        debug!("Decoded {}/{} {} rows", records.len(), total, F::COLLECTION);
        Ok(records)
    }

    async fn get<F: RecordFields>(&self, id: &str) -> Result<Record<F>> {
        decode(self.store.get(F::COLLECTION, id).await?)
    }

    async fn create<F: RecordFields>(&self, fields: &F) -> Result<Record<F>> {
        let fields = encode(fields)?;
        decode(self.store.create(F::COLLECTION, fields).await?)
    }

    async fn update<F: RecordFields>(&self, id: &str, fields: &F) -> Result<Record<F>> {
        let fields = encode(fields)?;
        decode(self.store.update(F::COLLECTION, id, fields).await?)
    }
}

fn decode<F: RecordFields>(raw: RawRecord) -> Result<Record<F>> {
    let RawRecord {
        id,
        created_time,
        fields,
    } = raw;
    let invalid = |reason: String| Error::InvalidRecord {
        collection: F::COLLECTION,
        id: id.clone(),
        reason,
    };

    let fields: F =
        serde_json::from_value(Value::Object(fields)).map_err(|e| invalid(e.to_string()))?;
    fields.validate().map_err(invalid)?;

    Ok(Record {
        id,
        created_time,
        fields,
    })
}

/// Refuses to send rows that `decode` would reject on the way back
fn encode<F: RecordFields>(fields: &F) -> Result<Fields> {
    fields
        .validate()
        .map_err(|reason| Error::Validation(vec![reason]))?;

    match serde_json::to_value(fields)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Validation(vec![format!(
            "{} fields must encode to an object, got {}",
            F::COLLECTION,
            other
        )])),
    }
}
