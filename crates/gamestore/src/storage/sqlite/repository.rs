//! SQLite repository implementation.
//!
//! Implements `gamestore_core::storage::Repository` for every entity that
//! describes its table through [`SqlEntity`].

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use gamestore_core::storage::{
    Entity, FieldValue, PageParameters, PaginatedList, QuerySpec, Repository, RepositoryError,
    Result,
};
use gamestore_core::store::{Company, Device, User};

use super::conversions::{
    company_params, device_params, row_to_company, row_to_device, row_to_user, user_params,
};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Table mapping for an entity stored in SQLite.
pub trait SqlEntity: Entity {
    /// `SELECT ... FROM ...` without a `WHERE` clause.
    const SELECT: &'static str;
    /// `SELECT COUNT(*) FROM ...` over the same joins as `SELECT`.
    const COUNT: &'static str;
    const INSERT: &'static str;
    /// Takes the insert parameters followed by the id.
    const UPDATE: &'static str;
    const DELETE: &'static str;
    /// Qualified id column, used for lookups and ordering.
    const ID_COLUMN: &'static str;

    /// Qualified column for a queryable field.
    fn column(field: &str) -> Option<&'static str>;

    fn from_row(row: &Row) -> rusqlite::Result<Self>;

    fn params(&self) -> Vec<Value>;
}

impl SqlEntity for Company {
    const SELECT: &'static str = schema::SELECT_COMPANIES;
    const COUNT: &'static str = schema::COUNT_COMPANIES;
    const INSERT: &'static str = schema::INSERT_COMPANY;
    const UPDATE: &'static str = schema::UPDATE_COMPANY;
    const DELETE: &'static str = schema::DELETE_COMPANY;
    const ID_COLUMN: &'static str = "c.id";

    fn column(field: &str) -> Option<&'static str> {
        match field {
            "id" => Some("c.id"),
            "name" => Some("c.name"),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        row_to_company(row)
    }

    fn params(&self) -> Vec<Value> {
        company_params(self)
    }
}

impl SqlEntity for Device {
    const SELECT: &'static str = schema::SELECT_DEVICES;
    const COUNT: &'static str = schema::COUNT_DEVICES;
    const INSERT: &'static str = schema::INSERT_DEVICE;
    const UPDATE: &'static str = schema::UPDATE_DEVICE;
    const DELETE: &'static str = schema::DELETE_DEVICE;
    const ID_COLUMN: &'static str = "d.id";

    fn column(field: &str) -> Option<&'static str> {
        match field {
            "id" => Some("d.id"),
            "name" => Some("d.name"),
            "category" => Some("d.category"),
            "company_id" => Some("d.company_id"),
            "company_name" => Some("c.name"),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        row_to_device(row)
    }

    fn params(&self) -> Vec<Value> {
        device_params(self)
    }
}

impl SqlEntity for User {
    const SELECT: &'static str = schema::SELECT_USERS;
    const COUNT: &'static str = schema::COUNT_USERS;
    const INSERT: &'static str = schema::INSERT_USER;
    const UPDATE: &'static str = schema::UPDATE_USER;
    const DELETE: &'static str = schema::DELETE_USER;
    const ID_COLUMN: &'static str = "u.id";

    fn column(field: &str) -> Option<&'static str> {
        match field {
            "id" => Some("u.id"),
            "username" => Some("u.username"),
            "email" => Some("u.email"),
            "role" => Some("u.role"),
            _ => None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        row_to_user(row)
    }

    fn params(&self) -> Vec<Value> {
        user_params(self)
    }
}

/// Renders a spec as a bound ` WHERE a = ?1 AND b = ?2` clause.
///
/// An empty spec renders as an empty string.
fn where_clause<E: SqlEntity>(spec: &QuerySpec<E>) -> Result<(String, Vec<Value>)> {
    let mut conditions = Vec::with_capacity(spec.criteria().len());
    let mut values = Vec::with_capacity(spec.criteria().len());

    for (i, criterion) in spec.criteria().iter().enumerate() {
        let column = E::column(criterion.field).ok_or_else(|| {
            RepositoryError::InvalidData(format!(
                "{} has no queryable field '{}'",
                E::ENTITY_TYPE,
                criterion.field
            ))
        })?;
        conditions.push(format!("{column} = ?{}", i + 1));
        values.push(match &criterion.value {
            FieldValue::Text(s) => Value::Text(s.clone()),
            FieldValue::Integer(n) => Value::Integer(*n),
        });
    }

    if conditions.is_empty() {
        Ok((String::new(), values))
    } else {
        Ok((format!(" WHERE {}", conditions.join(" AND ")), values))
    }
}

/// SQLite-based repository implementation.
///
/// One connection serves every entity type; clones share it.
#[derive(Clone)]
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl<E: SqlEntity> Repository<E> for SqliteRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<E>> {
        let sql = format!("{} WHERE {} = ?1", E::SELECT, E::ID_COLUMN);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let entity = stmt
                    .query_row([id], |row| E::from_row(row))
                    .optional()
                    .map_err(wrap_err)?;
                Ok(entity)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, E::ENTITY_TYPE))
    }

    async fn get_page(&self, page: PageParameters, spec: &QuerySpec<E>) -> Result<PaginatedList<E>> {
        let (filter, values) = where_clause(spec)?;
        let count_sql = format!("{}{filter}", E::COUNT);
        let select_sql = format!(
            "{}{filter} ORDER BY {} LIMIT {} OFFSET {}",
            E::SELECT,
            E::ID_COLUMN,
            page.page_size,
            page.offset()
        );

        let (entities, total) = self
            .conn
            .call(move |conn| {
                let total: i64 = conn
                    .query_row(&count_sql, params_from_iter(values.iter()), |row| row.get(0))
                    .map_err(wrap_err)?;

                let mut stmt = conn.prepare(&select_sql).map_err(wrap_err)?;
                let entities = stmt
                    .query_map(params_from_iter(values.iter()), |row| E::from_row(row))
                    .map_err(wrap_err)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(wrap_err)?;
                Ok((entities, total))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, E::ENTITY_TYPE))?;

        let total = usize::try_from(total).unwrap_or_default();
        Ok(PaginatedList::new(entities, total, page))
    }

    async fn find(&self, spec: &QuerySpec<E>) -> Result<Vec<E>> {
        let (filter, values) = where_clause(spec)?;
        let sql = format!("{}{filter} ORDER BY {}", E::SELECT, E::ID_COLUMN);

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let entities = stmt
                    .query_map(params_from_iter(values.iter()), |row| E::from_row(row))
                    .map_err(wrap_err)?
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(wrap_err)?;
                Ok(entities)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, E::ENTITY_TYPE))
    }

    async fn create(&self, entity: &E) -> Result<E> {
        let values = entity.params();
        let select_sql = format!("{} WHERE {} = ?1", E::SELECT, E::ID_COLUMN);

        // Read back through SELECT so joined columns are filled in.
        self.conn
            .call(move |conn| {
                conn.execute(E::INSERT, params_from_iter(values.iter()))
                    .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();
                let created = conn
                    .query_row(&select_sql, [id], |row| E::from_row(row))
                    .map_err(wrap_err)?;
                Ok(created)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, E::ENTITY_TYPE))
    }

    async fn update(&self, entity: &E) -> Result<()> {
        let id = entity.id();
        let mut values = entity.params();
        values.push(Value::Integer(id));

        let rows_affected = self
            .conn
            .call(move |conn| {
                let rows = conn
                    .execute(E::UPDATE, params_from_iter(values.iter()))
                    .map_err(wrap_err)?;
                Ok(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, E::ENTITY_TYPE))?;

        if rows_affected == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: E::ENTITY_TYPE,
                id,
            });
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .call(move |conn| {
                let rows = conn.execute(E::DELETE, [id]).map_err(wrap_err)?;
                Ok(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, E::ENTITY_TYPE))?;

        if rows_affected == 0 {
            return Err(RepositoryError::NotFound {
                entity_type: E::ENTITY_TYPE,
                id,
            });
        }

        Ok(())
    }
}
