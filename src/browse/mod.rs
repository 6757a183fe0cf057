pub mod session;
pub mod sort;

pub use session::{BrowseSession, FetchPhase};
pub use sort::{sort_properties, SortKey};
