use crate::browse::sort::{sort_properties, SortKey};
use crate::models::Property;
use crate::sources::{FetchError, FilterCriteria, ListingFilter, PropertySource};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

/// Lifecycle of the most recent fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing requested yet
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Result of one fetch, tagged with the generation that issued it
#[derive(Debug)]
pub struct FetchOutcome {
    generation: u64,
    result: Result<Vec<Property>, FetchError>,
}

/// State of one browse session: filter criteria, sort key and the last
/// successful result for the current criteria.
///
/// Every criteria change issues a new fetch. Each fetch gets a generation
/// number, the previous one is aborted, and any outcome that does not carry
/// the current generation is dropped.
pub struct BrowseSession<S: PropertySource + 'static> {
    source: Arc<S>,
    criteria: FilterCriteria,
    sort: SortKey,
    properties: Vec<Property>,
    loading: bool,
    error: Option<String>,
    phase: FetchPhase,
    generation: u64,
    in_flight: Option<AbortHandle>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl<S: PropertySource + 'static> BrowseSession<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self::with_criteria(source, FilterCriteria::default())
    }

    pub fn with_criteria(source: Arc<S>, criteria: FilterCriteria) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            source,
            criteria,
            sort: SortKey::default(),
            properties: Vec::new(),
            loading: false,
            error: None,
            phase: FetchPhase::Idle,
            generation: 0,
            in_flight: None,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    /// Last successful result, in fetch order
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Last successful result, ordered by the active sort key
    pub fn sorted(&self) -> Vec<Property> {
        sort_properties(&self.properties, self.sort)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Initial fetch when the view opens
    pub fn mount(&mut self) -> u64 {
        self.refresh()
    }

    /// Re-issue the current criteria, e.g. after a failure
    pub fn retry(&mut self) -> u64 {
        self.refresh()
    }

    pub fn set_listing_type(&mut self, listing_type: ListingFilter) -> u64 {
        self.criteria.listing_type = listing_type;
        self.refresh()
    }

    pub fn set_location(&mut self, location: impl Into<String>) -> u64 {
        self.criteria.location = location.into();
        self.refresh()
    }

    pub fn set_min_price(&mut self, min_price: Option<f64>) -> u64 {
        self.criteria.min_price = checked_price("min_price", min_price);
        self.refresh()
    }

    pub fn set_max_price(&mut self, max_price: Option<f64>) -> u64 {
        self.criteria.max_price = checked_price("max_price", max_price);
        self.refresh()
    }

    pub fn set_bedrooms(&mut self, bedrooms: Option<u32>) -> u64 {
        self.criteria.bedrooms = bedrooms;
        self.refresh()
    }

    pub fn set_property_type(&mut self, property_type: Option<String>) -> u64 {
        self.criteria.property_type = property_type;
        self.refresh()
    }

    pub fn set_furnished(&mut self, furnished: Option<bool>) -> u64 {
        self.criteria.furnished = furnished;
        self.refresh()
    }

    pub fn set_parking(&mut self, parking: Option<bool>) -> u64 {
        self.criteria.parking = parking;
        self.refresh()
    }

    /// Replace every criterion at once (one fetch)
    pub fn set_criteria(&mut self, criteria: FilterCriteria) -> u64 {
        self.criteria = FilterCriteria {
            min_price: checked_price("min_price", criteria.min_price),
            max_price: checked_price("max_price", criteria.max_price),
            ..criteria
        };
        self.refresh()
    }

    /// Back to the unfiltered view
    pub fn clear_filters(&mut self) -> u64 {
        self.set_criteria(FilterCriteria::default())
    }

    /// Sorting is client-side only; no fetch
    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// Issue a fetch for the current criteria, superseding any in flight
    pub fn refresh(&mut self) -> u64 {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        self.loading = true;
        self.phase = FetchPhase::Loading;

        if self.criteria.price_range_inverted() {
            warn!(
                "Minimum price {:?} is above maximum price {:?}; sending anyway",
                self.criteria.min_price, self.criteria.max_price
            );
        }

        let source = Arc::clone(&self.source);
        let criteria = self.criteria.clone();
        debug!(generation, "Fetching properties from {}", source.source_name());

        let fetch = tokio::spawn(async move { source.fetch_properties(&criteria).await });
        self.in_flight = Some(fetch.abort_handle());

        // Forward the outcome; a panicking source still ends the spinner
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let result = match fetch.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => return,
                Err(e) => Err(FetchError::Task(e.to_string())),
            };
            let _ = outcome_tx.send(FetchOutcome { generation, result });
        });

        generation
    }

    /// Apply an outcome if it belongs to the current generation.
    /// Returns false when it was stale and dropped.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                stale = outcome.generation,
                current = self.generation,
                "Discarding superseded fetch result"
            );
            return false;
        }

        self.in_flight = None;
        self.loading = false;

        match outcome.result {
            Ok(properties) => {
                info!("Loaded {} properties", properties.len());
                self.properties = properties;
                self.error = None;
                self.phase = FetchPhase::Loaded;
            }
            Err(e) => {
                warn!("Fetching properties failed: {}", e);
                self.error = Some(e.user_message());
                self.phase = FetchPhase::Failed;
            }
        }

        true
    }

    /// Wait until the current fetch has resolved
    pub async fn settle(&mut self) {
        while self.loading {
            match self.outcome_rx.recv().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
    }

    /// Apply whatever outcomes have already arrived, without waiting
    pub fn drain_ready(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply(outcome);
        }
    }
}

fn checked_price(field: &str, price: Option<f64>) -> Option<f64> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => {
            warn!("Ignoring invalid {}: {}", field, p);
            None
        }
        other => other,
    }
}
