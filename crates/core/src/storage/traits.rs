use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use super::{FieldValue, PageParameters, PaginatedList, QuerySpec, Result};

/// A persisted record with an integer identity.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Name used in errors and logs.
    const ENTITY_TYPE: &'static str;
    /// Fields the store must keep unique across all records.
    const UNIQUE_FIELDS: &'static [&'static str];

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    /// Value of a queryable field, or `None` if the field is unknown or unset.
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}

/// Generic CRUD access to entities of type `E`.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Gets an entity by its ID.
    async fn get_by_id(&self, id: i64) -> Result<Option<E>>;

    /// Gets one page of the entities matching `spec`, ordered by ID.
    async fn get_page(&self, page: PageParameters, spec: &QuerySpec<E>)
        -> Result<PaginatedList<E>>;

    /// Gets every entity matching `spec`, ordered by ID.
    async fn find(&self, spec: &QuerySpec<E>) -> Result<Vec<E>>;

    /// Persists a new entity and returns it with its assigned ID.
    ///
    /// Fails with `UniqueViolation` when a unique field collides.
    async fn create(&self, entity: &E) -> Result<E>;

    /// Replaces an existing entity.
    ///
    /// Fails with `NotFound` when the ID is absent and `UniqueViolation`
    /// when a unique field collides with another record.
    async fn update(&self, entity: &E) -> Result<()>;

    /// Deletes an entity by its ID.
    async fn delete(&self, id: i64) -> Result<()>;
}
