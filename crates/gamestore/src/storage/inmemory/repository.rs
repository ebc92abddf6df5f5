//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use gamestore_core::storage::{
    Entity, PageParameters, PaginatedList, QuerySpec, Repository, RepositoryError, Result,
};

/// In-memory storage for one entity type.
///
/// Ids are assigned from a counter starting at 1 and are never reused.
/// Unique fields declared by the entity are enforced on create and update.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    items: Arc<RwLock<BTreeMap<i64, E>>>,
    next_id: Arc<AtomicI64>,
}

impl<E> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            next_id: self.next_id.clone(),
        }
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryRepository<E> {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

/// Returns the first unique field of `candidate` that collides with another record.
fn unique_conflict<E: Entity>(items: &BTreeMap<i64, E>, candidate: &E) -> Option<&'static str> {
    E::UNIQUE_FIELDS.iter().copied().find(|field| {
        let value = candidate.field_value(field);
        value.is_some()
            && items
                .values()
                .any(|other| other.id() != candidate.id() && other.field_value(field) == value)
    })
}

fn unique_violation<E: Entity>(field: &str) -> RepositoryError {
    RepositoryError::UniqueViolation {
        entity_type: E::ENTITY_TYPE,
        field: field.to_string(),
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn get_by_id(&self, id: i64) -> Result<Option<E>> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    async fn get_page(&self, page: PageParameters, spec: &QuerySpec<E>) -> Result<PaginatedList<E>> {
        let matching = self.find(spec).await?;
        Ok(PaginatedList::from_full_list(matching, page))
    }

    async fn find(&self, spec: &QuerySpec<E>) -> Result<Vec<E>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|e| spec.is_satisfied_by(e))
            .cloned()
            .collect())
    }

    async fn create(&self, entity: &E) -> Result<E> {
        let mut items = self.items.write().await;

        let mut created = entity.clone();
        // Not yet in the map, so an id of 0 never matches an existing record.
        created.set_id(0);
        if let Some(field) = unique_conflict(&items, &created) {
            return Err(unique_violation::<E>(field));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        created.set_id(id);
        items.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, entity: &E) -> Result<()> {
        let mut items = self.items.write().await;
        if !items.contains_key(&entity.id()) {
            return Err(RepositoryError::NotFound {
                entity_type: E::ENTITY_TYPE,
                id: entity.id(),
            });
        }
        if let Some(field) = unique_conflict(&items, entity) {
            return Err(unique_violation::<E>(field));
        }
        items.insert(entity.id(), entity.clone());
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut items = self.items.write().await;
        if items.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: E::ENTITY_TYPE,
                id,
            });
        }
        Ok(())
    }
}
