use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::{Entity, PageError};

/// Default number of entities per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound for a requested page size. Larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 50;
/// Cache discriminator of a spec without criteria.
pub const UNFILTERED: &str = "all";

/// Which page of a listing to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParameters {
    pub page_number: u32,
    pub page_size: u32,
}

impl PageParameters {
    /// Creates page parameters, clamping the size to [`MAX_PAGE_SIZE`].
    pub fn new(page_number: u32, page_size: u32) -> Result<Self, PageError> {
        if page_number < 1 {
            return Err(PageError::InvalidPageNumber);
        }
        if page_size < 1 {
            return Err(PageError::InvalidPageSize);
        }
        Ok(Self {
            page_number,
            page_size: page_size.min(MAX_PAGE_SIZE),
        })
    }

    /// Number of entities that precede this page.
    pub fn offset(&self) -> usize {
        (self.page_number as usize - 1) * self.page_size as usize
    }
}

impl Default for PageParameters {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a listing plus the information needed to navigate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedList<T> {
    pub entities: Vec<T>,
    pub total_count: usize,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> PaginatedList<T> {
    /// Wraps an already-sliced page.
    pub fn new(entities: Vec<T>, total_count: usize, page: PageParameters) -> Self {
        let total_pages = total_count.div_ceil(page.page_size as usize) as u32;
        Self {
            entities,
            total_count,
            page_number: page.page_number,
            page_size: page.page_size,
            total_pages,
            has_previous: page.page_number > 1,
            has_next: page.page_number < total_pages,
        }
    }

    /// Builds the requested page out of a complete result set.
    pub fn from_full_list(all: Vec<T>, page: PageParameters) -> Self {
        let total_count = all.len();
        let entities = all
            .into_iter()
            .skip(page.offset())
            .take(page.page_size as usize)
            .collect();
        Self::new(entities, total_count, page)
    }

    /// Converts every entity on the page, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            entities: self.entities.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

/// A comparable field value used in query criteria.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// A single `field = value` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub field: &'static str,
    pub value: FieldValue,
}

/// A conjunction of equality criteria over the fields of `E`.
///
/// The in-memory store evaluates it with [`QuerySpec::is_satisfied_by`];
/// SQL stores render each criterion as a bound `WHERE` clause. An empty
/// spec matches everything.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec<E> {
    criteria: Vec<Criterion>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Default for QuerySpec<E> {
    fn default() -> Self {
        Self {
            criteria: Vec::new(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> QuerySpec<E> {
    /// A spec that matches every entity.
    pub fn all() -> Self {
        Self::default()
    }

    /// A spec with a single equality criterion.
    pub fn where_eq(field: &'static str, value: impl Into<FieldValue>) -> Self {
        Self::default().and(field, value)
    }

    /// Adds another equality criterion.
    pub fn and(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.criteria.push(Criterion {
            field,
            value: value.into(),
        });
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// True when every criterion matches the entity's field value.
    pub fn is_satisfied_by(&self, entity: &E) -> bool {
        self.criteria
            .iter()
            .all(|c| entity.field_value(c.field).as_ref() == Some(&c.value))
    }

    /// Cache discriminator for this spec: the criterion values joined by
    /// `:`, or `all` when the spec is empty.
    pub fn discriminator(&self) -> String {
        if self.criteria.is_empty() {
            return UNFILTERED.to_string();
        }
        self.criteria
            .iter()
            .map(|c| c.value.to_string())
            .collect::<Vec<_>>()
            .join(":")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Company, Device, DeviceCategory};

    #[test]
    fn test_page_parameters_defaults() {
        let page = PageParameters::default();
        assert_eq!(page.page_number, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_parameters_rejects_zero() {
        assert_eq!(
            PageParameters::new(0, 10),
            Err(PageError::InvalidPageNumber)
        );
        assert_eq!(PageParameters::new(1, 0), Err(PageError::InvalidPageSize));
    }

    #[test]
    fn test_page_parameters_clamps_size() {
        let page = PageParameters::new(2, 500).unwrap();
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn test_from_full_list_slices_requested_page() {
        let all: Vec<u32> = (1..=25).collect();
        let page = PaginatedList::from_full_list(all, PageParameters::new(3, 10).unwrap());

        assert_eq!(page.entities, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn test_from_full_list_past_the_end_is_empty() {
        let page = PaginatedList::from_full_list(vec![1, 2, 3], PageParameters::new(5, 2).unwrap());
        assert!(page.entities.is_empty());
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next);
    }

    #[test]
    fn test_page_never_exceeds_page_size() {
        for size in 1..=12u32 {
            let all: Vec<u32> = (0..40).collect();
            let page = PaginatedList::from_full_list(all, PageParameters::new(1, size).unwrap());
            assert!(page.entities.len() <= size as usize);
        }
    }

    #[test]
    fn test_empty_list_has_no_pages() {
        let page: PaginatedList<u32> = PaginatedList::from_full_list(vec![], PageParameters::default());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn test_paginated_list_serializes_camel_case() {
        let page = PaginatedList::from_full_list(vec![1], PageParameters::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["hasNext"], false);
    }

    #[test]
    fn test_query_spec_discriminator() {
        assert_eq!(QuerySpec::<Device>::all().discriminator(), "all");
        assert_eq!(
            QuerySpec::<Device>::where_eq("company_name", "Razer").discriminator(),
            "Razer"
        );
        assert_eq!(
            QuerySpec::<Device>::where_eq("company_name", "Razer")
                .and("category", "mouse")
                .discriminator(),
            "Razer:mouse"
        );
    }

    #[test]
    fn test_query_spec_is_satisfied_by() {
        let device = Device::new("Viper", DeviceCategory::Mouse, 50.0, 3, 1)
            .with_company_name("Razer");

        assert!(QuerySpec::all().is_satisfied_by(&device));
        assert!(QuerySpec::where_eq("company_name", "Razer").is_satisfied_by(&device));
        assert!(!QuerySpec::where_eq("company_name", "Logitech").is_satisfied_by(&device));
        assert!(!QuerySpec::where_eq("company_name", "Razer")
            .and("category", "keyboard")
            .is_satisfied_by(&device));
    }

    #[test]
    fn test_query_spec_unknown_field_never_matches() {
        let company = Company::new("Razer");
        assert!(!QuerySpec::where_eq("color", "green").is_satisfied_by(&company));
    }
}
