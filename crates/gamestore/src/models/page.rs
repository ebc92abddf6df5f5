use serde::Deserialize;

use gamestore_core::storage::{PageError, PageParameters, DEFAULT_PAGE_SIZE};

/// Query string of paginated listings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Only used by the device listing.
    #[serde(default)]
    pub company_name: Option<String>,
}

impl PageQuery {
    /// Page parameters with defaults for missing values.
    pub fn parameters(&self) -> Result<PageParameters, PageError> {
        PageParameters::new(
            self.page_number.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}
