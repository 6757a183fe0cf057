mod price;
mod record;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use price::{Frequency, Price, PriceTerms};

/// Whether a listing is offered for rent or for sale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }

    /// Badge text shown on a card
    pub fn badge(&self) -> &'static str {
        match self {
            ListingType::Rent => "For Rent",
            ListingType::Sale => "For Sale",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Marketplace status of a listing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Available,
    Pending,
    Rented,
    Sold,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Available => "Available",
            Status::Pending => "Pending",
            Status::Rented => "Rented",
            Status::Sold => "Sold",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Location information for a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Physical features of a property
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub bedrooms: u32,
    /// Half steps allowed (1.5 = one full and one half bath)
    pub bathrooms: f32,
    pub square_feet: u32,
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<i32>,
    /// Number of parking spaces, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<u32>,
    #[serde(default)]
    pub furnished: bool,
}

impl Features {
    /// At least one parking space
    pub fn has_parking(&self) -> bool {
        self.parking.unwrap_or(0) > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    pub public_id: String,
}

/// Core property data model, a read-only copy of the backend's listing.
///
/// The listing type is carried by the [`Price`] variant, so a sale can never
/// hold a rental frequency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "record::PropertyRecord", into = "record::PropertyRecord")]
pub struct Property {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: Price,
    pub location: Location,
    pub features: Features,
    pub amenities: Vec<String>,
    /// First element is the cover image
    pub images: Vec<Image>,
    pub landlord_id: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn listing_type(&self) -> ListingType {
        self.price.listing_type()
    }

    pub fn cover_image(&self) -> Option<&Image> {
        self.images.first()
    }
}

/// A payload that parsed as JSON but does not describe a valid property
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("price amount must be a non-negative number, got {0}")]
    InvalidAmount(f64),
    #[error("bathroom count must be a non-negative number, got {0}")]
    InvalidBathrooms(f32),
    #[error("property id must not be empty")]
    MissingId,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    /// A rental listing with the given id, monthly price and creation day (June 2024)
    pub fn rental(id: &str, amount: f64, day: u32) -> Property {
        let created_at = Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap();
        Property {
            id: id.to_string(),
            title: format!("Listing {}", id),
            description: "Bright apartment close to transit.".to_string(),
            price: Price::Rent {
                amount,
                frequency: Frequency::Monthly,
                terms: PriceTerms::Fixed,
            },
            location: Location {
                address: "12 Elm Street".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62704".to_string(),
                coordinates: None,
            },
            features: Features {
                bedrooms: 2,
                bathrooms: 1.5,
                square_feet: 850,
                property_type: "apartment".to_string(),
                year_built: Some(1998),
                parking: Some(1),
                furnished: false,
            },
            amenities: vec!["Laundry".to_string()],
            images: vec![],
            landlord_id: None,
            status: Status::Available,
            created_at,
            updated_at: created_at,
        }
    }
}
