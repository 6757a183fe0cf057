use crate::models::Property;
use crate::sources::error::FetchError;
use crate::sources::types::FilterCriteria;
use async_trait::async_trait;

/// Anything that can answer a property search.
/// The browse session only talks to this trait, so tests can swap in a scripted source.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch the complete result set for the given criteria
    async fn fetch_properties(&self, criteria: &FilterCriteria) -> Result<Vec<Property>, FetchError>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
