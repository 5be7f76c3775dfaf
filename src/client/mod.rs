pub mod airtable;
pub mod api;
pub mod memory;
pub mod traits;
pub mod types;

pub use airtable::AirtableClient;
pub use api::{Catalog, RentalApi};
pub use memory::MemoryRecordStore;
pub use traits::RecordStore;
