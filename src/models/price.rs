use super::ListingType;
use serde::{Deserialize, Serialize};

/// Billing period of a rental price
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    /// Suffix appended to a rental price, e.g. `/mo`
    pub fn suffix(&self) -> &'static str {
        match self {
            Frequency::Monthly => "/mo",
            Frequency::Yearly => "/yr",
        }
    }
}

/// Whether the asking price is open to negotiation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceTerms {
    #[default]
    Fixed,
    Negotiable,
}

/// Asking price of a listing.
///
/// A frequency only exists for rentals. Serializes to the backend's
/// `{ amount, frequency?, type }` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "super::record::PriceRecord")]
pub enum Price {
    Sale {
        amount: f64,
        terms: PriceTerms,
    },
    Rent {
        amount: f64,
        frequency: Frequency,
        terms: PriceTerms,
    },
}

impl Price {
    pub fn amount(&self) -> f64 {
        match self {
            Price::Sale { amount, .. } | Price::Rent { amount, .. } => *amount,
        }
    }

    pub fn terms(&self) -> PriceTerms {
        match self {
            Price::Sale { terms, .. } | Price::Rent { terms, .. } => *terms,
        }
    }

    pub fn frequency(&self) -> Option<Frequency> {
        match self {
            Price::Sale { .. } => None,
            Price::Rent { frequency, .. } => Some(*frequency),
        }
    }

    pub fn listing_type(&self) -> ListingType {
        match self {
            Price::Sale { .. } => ListingType::Sale,
            Price::Rent { .. } => ListingType::Rent,
        }
    }

    pub fn is_negotiable(&self) -> bool {
        self.terms() == PriceTerms::Negotiable
    }

    /// Same listing type and frequency, new amount
    pub fn with_amount(self, amount: f64) -> Self {
        match self {
            Price::Sale { terms, .. } => Price::Sale { amount, terms },
            Price::Rent {
                frequency, terms, ..
            } => Price::Rent {
                amount,
                frequency,
                terms,
            },
        }
    }

    pub fn with_terms(self, terms: PriceTerms) -> Self {
        match self {
            Price::Sale { amount, .. } => Price::Sale { amount, terms },
            Price::Rent {
                amount, frequency, ..
            } => Price::Rent {
                amount,
                frequency,
                terms,
            },
        }
    }
}
