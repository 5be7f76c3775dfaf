use crate::client::traits::RecordStore;
use crate::error::{Error, Result};
use crate::models::{Collection, Fields, RawRecord};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// In-process record store with the same contract as the hosted backend
#[derive(Default)]
pub struct MemoryRecordStore {
    tables: Mutex<HashMap<Collection, Vec<RawRecord>>>,
    next_id: AtomicU64,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small catalog for running without credentials
    pub fn with_sample_data() -> Self {
        info!("📋 Seeding in-memory backend with sample listings");

        let store = Self::new();
        {
            let mut tables = store.tables();
            let characteristics = tables.entry(Collection::Characteristics).or_default();
            for (id, name, icon) in [
                ("recWifi", "Wi-Fi", "📶"),
                ("recPool", "Piscina", "🏊"),
                ("recAir", "Ar-condicionado", "❄️"),
                ("recPets", "Aceita pets", "🐾"),
            ] {
                characteristics.push(sample(id, json!({ "nome": name, "icone": icon })));
            }

            let locations = tables.entry(Collection::Locations).or_default();
            locations.push(sample(
                "recChaleSerra",
                json!({
                    "titulo": "Chalé na Serra",
                    "descricao": "Chalé de madeira com lareira e vista para o vale.",
                    "preco": 320,
                    "cidade": "Gramado",
                    "imagem": "https://images.example.com/chale.jpg",
                    "locacao_caracteristicas": ["recWifi", "recPets"]
                }),
            ));
            locations.push(sample(
                "recCasaPraia",
                json!({
                    "titulo": "Casa de Praia",
                    "descricao": "Casa pé na areia para até oito pessoas.",
                    "preco": 540,
                    "cidade": "Porto de Galinhas",
                    "imagem": "https://images.example.com/praia.jpg",
                    "locacao_caracteristicas": ["recWifi", "recPool", "recAir"]
                }),
            ));
            locations.push(sample(
                "recStudioCentro",
                json!({
                    "titulo": "Studio no Centro",
                    "descricao": "Studio compacto perto do metrô.",
                    "preco": 150,
                    "cidade": "São Paulo",
                    "imagem": "https://images.example.com/studio.jpg",
                    "locacao_caracteristicas": ["recAir"]
                }),
            ));
        }
        store
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<Collection, Vec<RawRecord>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn assign_id(&self) -> String {
        format!("rec{:014}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn not_found(collection: Collection, id: &str) -> Error {
        Error::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}

fn sample(id: &str, fields: Value) -> RawRecord {
    let fields = match fields {
        Value::Object(map) => map,
        _ => Fields::new(),
    };
    RawRecord {
        id: id.to_string(),
        created_time: Some(Utc::now()),
        fields,
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self, collection: Collection) -> Result<Vec<RawRecord>> {
        let records = self.tables().get(&collection).cloned().unwrap_or_default();
        debug!("Listing {} {} from memory", records.len(), collection);
        Ok(records)
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<RawRecord> {
        self.tables()
            .get(&collection)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .cloned()
            .ok_or_else(|| Self::not_found(collection, id))
    }

    async fn create(&self, collection: Collection, fields: Fields) -> Result<RawRecord> {
        let record = RawRecord {
            id: self.assign_id(),
            created_time: Some(Utc::now()),
            fields,
        };
        self.tables()
            .entry(collection)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> Result<RawRecord> {
        let mut tables = self.tables();
        let record = tables
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| Self::not_found(collection, id))?;
        record.fields = fields;
        Ok(record.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let mut tables = self.tables();
        let records = tables
            .get_mut(&collection)
            .ok_or_else(|| Self::not_found(collection, id))?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(Self::not_found(collection, id));
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_submitted_fields() {
        let store = MemoryRecordStore::new();
        let submitted = fields(json!({ "titulo": "Cabin", "preco": 120, "cidade": "X" }));

        let created = store
            .create(Collection::Locations, submitted.clone())
            .await
            .unwrap();
        assert!(created.id.starts_with("rec"));

        let fetched = store.get(Collection::Locations, &created.id).await.unwrap();
        assert_eq!(fetched.fields, submitted);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = MemoryRecordStore::new();
        let a = store.create(Collection::Characteristics, Fields::new()).await.unwrap();
        let b = store.create(Collection::Characteristics, Fields::new()).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let store = MemoryRecordStore::with_sample_data();
        let err = store.get(Collection::Locations, "recNope").await.unwrap_err();
        assert!(err.is_not_found());

        let err = store
            .update(Collection::Locations, "recNope", Fields::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let store = MemoryRecordStore::new();
        let created = store
            .create(Collection::Characteristics, fields(json!({ "nome": "Wifi", "icone": "📶" })))
            .await
            .unwrap();

        let updated = store
            .update(Collection::Characteristics, &created.id, fields(json!({ "nome": "Wi-Fi" })))
            .await
            .unwrap();
        assert_eq!(updated.fields, fields(json!({ "nome": "Wi-Fi" })));
    }

    #[tokio::test]
    async fn test_repeat_delete_fails() {
        let store = MemoryRecordStore::with_sample_data();
        store.delete(Collection::Locations, "recStudioCentro").await.unwrap();
        let err = store
            .delete(Collection::Locations, "recStudioCentro")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.list(Collection::Locations).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryRecordStore::with_sample_data();
        let ids: Vec<String> = store
            .list(Collection::Locations)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["recChaleSerra", "recCasaPraia", "recStudioCentro"]);
    }
}
