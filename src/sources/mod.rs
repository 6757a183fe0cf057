pub mod error;
pub mod http;
pub mod traits;
pub mod types;

pub use error::FetchError;
pub use http::{PropertyApi, RequestContext};
pub use traits::PropertySource;
pub use types::{FilterCriteria, ListingFilter, PropertyUpdate};
