//! Wire shape of a property as the backend sends it.

use super::{
    Features, Frequency, Image, ListingType, Location, ModelError, Price, PriceTerms, Property,
    Status,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRecord {
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(rename = "type", default)]
    pub terms: PriceTerms,
}

impl From<Price> for PriceRecord {
    fn from(price: Price) -> Self {
        Self {
            amount: price.amount(),
            frequency: price.frequency(),
            terms: price.terms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    // Prototype payloads used `id`
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub listing_type: ListingType,
    pub price: PriceRecord,
    pub location: Location,
    pub features: Features,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landlord_id: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PropertyRecord> for Property {
    type Error = ModelError;

    fn try_from(record: PropertyRecord) -> Result<Self, Self::Error> {
        if record.id.trim().is_empty() {
            return Err(ModelError::MissingId);
        }

        let amount = record.price.amount;
        if !amount.is_finite() || amount < 0.0 {
            return Err(ModelError::InvalidAmount(amount));
        }

        let bathrooms = record.features.bathrooms;
        if !bathrooms.is_finite() || bathrooms < 0.0 {
            return Err(ModelError::InvalidBathrooms(bathrooms));
        }

        // Sale payloads sometimes carry a leftover frequency; it is ignored
        let price = match record.listing_type {
            ListingType::Sale => Price::Sale {
                amount,
                terms: record.price.terms,
            },
            ListingType::Rent => Price::Rent {
                amount,
                frequency: record.price.frequency.unwrap_or_default(),
                terms: record.price.terms,
            },
        };

        Ok(Property {
            id: record.id,
            title: record.title,
            description: record.description,
            price,
            location: record.location,
            features: record.features,
            amenities: record.amenities,
            images: record.images,
            landlord_id: record.landlord_id,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl From<Property> for PropertyRecord {
    fn from(property: Property) -> Self {
        Self {
            listing_type: property.listing_type(),
            price: property.price.into(),
            id: property.id,
            title: property.title,
            description: property.description,
            location: property.location,
            features: property.features,
            amenities: property.amenities,
            images: property.images,
            landlord_id: property.landlord_id,
            status: property.status,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}
