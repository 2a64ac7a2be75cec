//! Persistence adapters.
//!
//! - [`InMemoryStore`] / [`FileStore`] implement the `KeyValueStore` port
//! - [`JsonRepository`] implements every repository port on top of a store
//! - [`seed_defaults`] installs the starter worldbooks and characters

mod collection;
mod file_store;
mod json_repository;
mod memory_store;
mod seed;

pub use collection::{CollectionKind, ID_COUNTERS_KEY, IdCounters, Record};
pub use file_store::FileStore;
pub use json_repository::JsonRepository;
pub use memory_store::InMemoryStore;
pub use seed::{SeedReport, seed_defaults};
