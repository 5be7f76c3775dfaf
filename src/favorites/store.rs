use crate::error::{Error, Result};
use crate::favorites::storage::LocalStorage;
use crate::models::Location;
use tracing::{debug, warn};

/// Storage key holding the JSON array of favorited snapshots
pub const FAVORITES_KEY: &str = "favorites";

/// Called with the full set after every effective mutation
pub type Subscriber = Box<dyn FnMut(&[Location]) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// What the view layer may do with favorites
pub trait Favorites {
    /// Current favorites, oldest first
    fn favorites(&self) -> &[Location];

    fn is_favorite(&self, id: &str) -> bool;

    /// Store a snapshot of `location`. Returns false when it was already a favorite.
    fn add_favorite(&mut self, location: Location) -> Result<bool>;

    /// Returns false when `id` was not a favorite
    fn remove_favorite(&mut self, id: &str) -> Result<bool>;

    /// Flip the favorite state of `location`; returns the new state
    fn toggle_favorite(&mut self, location: Location) -> Result<bool> {
        if self.is_favorite(&location.id) {
            self.remove_favorite(&location.id)?;
            Ok(false)
        } else {
            self.add_favorite(location)?;
            Ok(true)
        }
    }

    fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// Favorites kept in memory and written through to local storage on every change
pub struct FavoritesStore<S: LocalStorage> {
    storage: S,
    favorites: Vec<Location>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: LocalStorage> FavoritesStore<S> {
    /// Restore the persisted set. A missing key gives an empty store; so does an
    /// unreadable payload, which is also deleted so the next load starts clean.
    pub fn load(storage: S) -> Result<Self> {
        let parsed = match storage.get_item(FAVORITES_KEY) {
            Ok(None) => Ok(Vec::new()),
            Ok(Some(payload)) => {
                serde_json::from_str::<Vec<Location>>(&payload).map_err(|e| e.to_string())
            }
            Err(Error::CorruptPayload { reason, .. }) => Err(reason),
            Err(e) => return Err(e),
        };

        let favorites = match parsed {
            Ok(favorites) => dedup_by_id(favorites),
            Err(reason) => {
                warn!("Discarding unreadable favorites payload: {}", reason);
                storage.remove_item(FAVORITES_KEY)?;
                Vec::new()
            }
        };

        debug!("Loaded {} favorites", favorites.len());
        Ok(Self {
            storage,
            favorites,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Write through, then tell subscribers. Subscribers hear about the change
    /// even if the write failed; the error still reaches the caller.
    fn commit(&mut self) -> Result<()> {
        let written = serde_json::to_string(&self.favorites)
            .map_err(Error::from)
            .and_then(|payload| self.storage.set_item(FAVORITES_KEY, &payload));

        if let Err(e) = &written {
            warn!("Failed to persist favorites: {}", e);
        }

        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.favorites);
        }
        written
    }
}

impl<S: LocalStorage> Favorites for FavoritesStore<S> {
    fn favorites(&self) -> &[Location] {
        &self.favorites
    }

    fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|l| l.id == id)
    }

    fn add_favorite(&mut self, location: Location) -> Result<bool> {
        if self.is_favorite(&location.id) {
            return Ok(false);
        }

        debug!("Adding favorite {}", location.id);
        self.favorites.push(location);
        self.commit()?;
        Ok(true)
    }

    fn remove_favorite(&mut self, id: &str) -> Result<bool> {
        let before = self.favorites.len();
        self.favorites.retain(|l| l.id != id);
        if self.favorites.len() == before {
            return Ok(false);
        }

        debug!("Removed favorite {}", id);
        self.commit()?;
        Ok(true)
    }

    fn subscribe(&mut self, subscriber: Subscriber) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.subscribers.push((id, subscriber));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }
}

/// Hand-edited payloads may repeat an id; the first snapshot wins
fn dedup_by_id(favorites: Vec<Location>) -> Vec<Location> {
    let mut unique: Vec<Location> = Vec::with_capacity(favorites.len());
    for location in favorites {
        if !unique.iter().any(|l| l.id == location.id) {
            unique.push(location);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::storage::{FileStorage, MemoryStorage};
    use crate::models::{LocationFields, Record};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn location(id: &str, title: &str, price: f64) -> Location {
        Record::new(
            id,
            LocationFields {
                title: title.to_string(),
                price,
                city: "X".to_string(),
                ..Default::default()
            },
        )
    }

    /// Storage whose writes always fail
    struct ReadOnlyStorage;

    impl LocalStorage for ReadOnlyStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove_item(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_add_then_remove_scenario() {
        let mut store = FavoritesStore::load(MemoryStorage::new()).unwrap();
        let cabin: Location = serde_json::from_value(json!({
            "id": "rec1",
            "fields": { "titulo": "Cabin", "preco": 120, "cidade": "X" }
        }))
        .unwrap();

        assert!(store.add_favorite(cabin).unwrap());
        assert!(store.is_favorite("rec1"));

        assert!(store.remove_favorite("rec1").unwrap());
        assert!(!store.is_favorite("rec1"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = FavoritesStore::load(MemoryStorage::new()).unwrap();

        assert!(store.add_favorite(location("rec1", "Cabin", 120.0)).unwrap());
        assert!(!store.add_favorite(location("rec1", "Cabin (edited)", 90.0)).unwrap());

        assert_eq!(store.len(), 1);
        // The first snapshot is kept
        assert_eq!(store.favorites()[0].fields.title, "Cabin");
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = FavoritesStore::load(MemoryStorage::new()).unwrap();
        store.add_favorite(location("rec1", "Cabin", 120.0)).unwrap();

        assert!(!store.remove_favorite("rec2").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let storage = MemoryStorage::new();
        let mut store = FavoritesStore::load(storage.clone()).unwrap();

        store.add_favorite(location("rec1", "Cabin", 120.0)).unwrap();
        let payload = storage.get_item(FAVORITES_KEY).unwrap().unwrap();
        let persisted: Vec<Location> = serde_json::from_str(&payload).unwrap();
        assert_eq!(persisted.len(), 1);

        store.remove_favorite("rec1").unwrap();
        assert_eq!(storage.get_item(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_persisted_set_round_trips() {
        let dir = tempdir().unwrap();
        let mut store = FavoritesStore::load(FileStorage::new(dir.path())).unwrap();
        store.add_favorite(location("rec1", "Cabin", 120.0)).unwrap();
        store.add_favorite(location("rec2", "Loft", 75.5)).unwrap();
        store.add_favorite(location("rec3", "Villa", 900.0)).unwrap();
        store.remove_favorite("rec2").unwrap();

        let reloaded = FavoritesStore::load(FileStorage::new(dir.path())).unwrap();
        assert_eq!(reloaded.favorites(), store.favorites());
        assert!(reloaded.is_favorite("rec1"));
        assert!(!reloaded.is_favorite("rec2"));
        assert!(reloaded.is_favorite("rec3"));
    }

    #[test]
    fn test_corrupt_payload_loads_empty_and_is_discarded() {
        let storage = MemoryStorage::new();
        storage.set_item(FAVORITES_KEY, "{not json").unwrap();

        let store = FavoritesStore::load(storage.clone()).unwrap();
        assert!(store.is_empty());
        assert_eq!(storage.get_item(FAVORITES_KEY).unwrap(), None);
    }

    #[test]
    fn test_non_utf8_file_loads_empty_and_is_removed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, [0xff, 0xfe, b'[', b']']).unwrap();

        let store = FavoritesStore::load(FileStorage::new(dir.path())).unwrap();
        assert!(store.is_empty());
        assert!(!path.exists());

        // The next start is clean too
        let again = FavoritesStore::load(FileStorage::new(dir.path())).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_wrong_shape_payload_loads_empty() {
        let storage = MemoryStorage::new();
        storage
            .set_item(FAVORITES_KEY, r#"[{"id": 7, "fields": "nope"}]"#)
            .unwrap();

        let store = FavoritesStore::load(storage).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_ids_in_payload_collapse() {
        let storage = MemoryStorage::new();
        let payload = serde_json::to_string(&vec![
            location("rec1", "First", 1.0),
            location("rec1", "Second", 2.0),
        ])
        .unwrap();
        storage.set_item(FAVORITES_KEY, &payload).unwrap();

        let store = FavoritesStore::load(storage).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.favorites()[0].fields.title, "First");
    }

    #[test]
    fn test_subscribers_hear_effective_mutations_only() {
        let mut store = FavoritesStore::load(MemoryStorage::new()).unwrap();
        let seen: Arc<Mutex<Vec<usize>>> = Arc::default();

        let sink = Arc::clone(&seen);
        let id = store.subscribe(Box::new(move |favorites: &[Location]| {
            sink.lock().unwrap().push(favorites.len());
        }));

        store.add_favorite(location("rec1", "Cabin", 120.0)).unwrap();
        store.add_favorite(location("rec1", "Cabin", 120.0)).unwrap();
        store.add_favorite(location("rec2", "Loft", 80.0)).unwrap();
        store.remove_favorite("rec9").unwrap();
        store.remove_favorite("rec1").unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1]);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.remove_favorite("rec2").unwrap();
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_toggle() {
        let mut store = FavoritesStore::load(MemoryStorage::new()).unwrap();
        assert!(store.toggle_favorite(location("rec1", "Cabin", 120.0)).unwrap());
        assert!(store.is_favorite("rec1"));
        assert!(!store.toggle_favorite(location("rec1", "Cabin", 120.0)).unwrap());
        assert!(!store.is_favorite("rec1"));
    }

    #[test]
    fn test_write_failure_is_reported_but_state_kept() {
        let mut store = FavoritesStore::load(ReadOnlyStorage).unwrap();
        let notified = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&notified);
        store.subscribe(Box::new(move |_: &[Location]| *sink.lock().unwrap() += 1));

        let err = store.add_favorite(location("rec1", "Cabin", 120.0)).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(store.is_favorite("rec1"));
        assert_eq!(*notified.lock().unwrap(), 1);
    }
}
