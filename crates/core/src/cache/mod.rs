mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{device_key, devices_key, list_key};
pub use serialization::{deserialize, serialize, SerializationError};
pub use traits::Cache;
