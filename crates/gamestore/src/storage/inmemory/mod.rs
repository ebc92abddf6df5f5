//! In-memory storage backend.
//!
//! Stores each entity type in a `BTreeMap` keyed by id, wrapped in
//! `Arc<RwLock<_>>`. Data is lost when the repository is dropped.

mod repository;

pub use repository::InMemoryRepository;
