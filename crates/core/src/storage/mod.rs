mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{PageError, RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{Entity, Repository};
pub use types::{
    Criterion, FieldValue, PageParameters, PaginatedList, QuerySpec, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE, UNFILTERED,
};
