use crate::models::{Features, ListingType, Location, Price, Property};
use std::fmt;
use std::str::FromStr;

/// Listing type constraint; `All` sends no constraint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListingFilter {
    #[default]
    All,
    Rent,
    Sale,
}

impl ListingFilter {
    pub fn as_listing_type(&self) -> Option<ListingType> {
        match self {
            ListingFilter::All => None,
            ListingFilter::Rent => Some(ListingType::Rent),
            ListingFilter::Sale => Some(ListingType::Sale),
        }
    }
}

impl FromStr for ListingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(ListingFilter::All),
            "rent" => Ok(ListingFilter::Rent),
            "sale" => Ok(ListingFilter::Sale),
            other => Err(format!("unknown listing type '{}' (expected all, rent or sale)", other)),
        }
    }
}

impl fmt::Display for ListingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_listing_type() {
            Some(listing_type) => write!(f, "{}", listing_type),
            None => f.write_str("all"),
        }
    }
}

/// Filter criteria for one browse session.
///
/// Sent to the backend as flat query parameters; empty fields are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub listing_type: ListingFilter,
    /// Free-text location substring
    pub location: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Exact bedroom count
    pub bedrooms: Option<u32>,
    pub property_type: Option<String>,
    pub furnished: Option<bool>,
    /// `true` means at least one parking space
    pub parking: Option<bool>,
}

impl FilterCriteria {
    /// No constraint on any field
    pub fn is_unfiltered(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Advisory check; the backend stays the source of truth for results
    pub fn price_range_inverted(&self) -> bool {
        matches!((self.min_price, self.max_price), (Some(min), Some(max)) if min > max)
    }

    /// Query parameters in a fixed order, omitting absent and empty fields
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(listing_type) = self.listing_type.as_listing_type() {
            pairs.push(("listingType", listing_type.to_string()));
        }

        let location = self.location.trim();
        if !location.is_empty() {
            pairs.push(("location", location.to_string()));
        }

        if let Some(min) = self.min_price.filter(|p| valid_price(*p)) {
            pairs.push(("minPrice", format_amount(min)));
        }
        if let Some(max) = self.max_price.filter(|p| valid_price(*p)) {
            pairs.push(("maxPrice", format_amount(max)));
        }

        if let Some(bedrooms) = self.bedrooms {
            pairs.push(("bedrooms", bedrooms.to_string()));
        }

        if let Some(property_type) = self.property_type.as_deref().map(str::trim) {
            if !property_type.is_empty() {
                pairs.push(("propertyType", property_type.to_string()));
            }
        }

        if let Some(furnished) = self.furnished {
            pairs.push(("furnished", furnished.to_string()));
        }
        if let Some(parking) = self.parking {
            pairs.push(("parking", parking.to_string()));
        }

        pairs
    }
}

/// Editable fields of a listing, sent as `PUT /properties/{id}`.
///
/// Images are not part of an update.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyUpdate {
    pub title: String,
    pub description: String,
    /// Also decides the listing type
    pub price: Price,
    pub location: Location,
    pub features: Features,
    pub amenities: Vec<String>,
}

impl PropertyUpdate {
    /// Multipart text parts; structured fields are JSON-encoded
    pub fn form_fields(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        Ok(vec![
            ("title", self.title.clone()),
            ("description", self.description.clone()),
            ("listingType", self.price.listing_type().to_string()),
            ("price", serde_json::to_string(&self.price)?),
            ("location", serde_json::to_string(&self.location)?),
            ("features", serde_json::to_string(&self.features)?),
            ("amenities", serde_json::to_string(&self.amenities)?),
        ])
    }
}

impl From<&Property> for PropertyUpdate {
    fn from(property: &Property) -> Self {
        Self {
            title: property.title.clone(),
            description: property.description.clone(),
            price: property.price,
            location: property.location.clone(),
            features: property.features.clone(),
            amenities: property.amenities.clone(),
        }
    }
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// `1000.0` becomes `1000`; fractional prices keep their decimals
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount < 1e15 {
        format!("{}", amount as u64)
    } else {
        amount.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_parameters() {
        let criteria = FilterCriteria::default();
        assert!(criteria.query_pairs().is_empty());
        assert!(criteria.is_unfiltered());
    }

    #[test]
    fn test_rent_price_range_pairs() {
        let criteria = FilterCriteria {
            listing_type: ListingFilter::Rent,
            min_price: Some(1000.0),
            max_price: Some(2000.0),
            ..Default::default()
        };

        assert_eq!(
            criteria.query_pairs(),
            vec![
                ("listingType", "rent".to_string()),
                ("minPrice", "1000".to_string()),
                ("maxPrice", "2000".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_text_fields_are_omitted() {
        let criteria = FilterCriteria {
            location: "   ".to_string(),
            property_type: Some(String::new()),
            ..Default::default()
        };
        assert!(criteria.is_unfiltered());
    }

    #[test]
    fn test_all_fields_in_order() {
        let criteria = FilterCriteria {
            listing_type: ListingFilter::Sale,
            location: " Austin ".to_string(),
            min_price: Some(250000.5),
            max_price: None,
            bedrooms: Some(3),
            property_type: Some("house".to_string()),
            furnished: Some(false),
            parking: Some(true),
        };

        let keys: Vec<&str> = criteria.query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["listingType", "location", "minPrice", "bedrooms", "propertyType", "furnished", "parking"]
        );
        assert_eq!(criteria.query_pairs()[1].1, "Austin");
        assert_eq!(criteria.query_pairs()[2].1, "250000.5");
    }

    #[test]
    fn test_negative_price_is_not_sent() {
        let criteria = FilterCriteria {
            min_price: Some(-10.0),
            ..Default::default()
        };
        assert!(criteria.query_pairs().is_empty());
    }

    #[test]
    fn test_price_range_inverted() {
        let mut criteria = FilterCriteria {
            min_price: Some(3000.0),
            max_price: Some(1000.0),
            ..Default::default()
        };
        assert!(criteria.price_range_inverted());

        criteria.max_price = None;
        assert!(!criteria.price_range_inverted());
    }

    #[test]
    fn test_update_form_fields() {
        let mut property = crate::models::fixtures::rental("u1", 1800.0, 2);
        property.amenities = vec!["Pool".to_string(), "Gym".to_string()];
        let update = PropertyUpdate::from(&property);

        let fields = update.form_fields().unwrap();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["title", "description", "listingType", "price", "location", "features", "amenities"]
        );
        assert_eq!(fields[2].1, "rent");
        assert_eq!(fields[3].1, r#"{"amount":1800.0,"frequency":"monthly","type":"fixed"}"#);
        assert_eq!(fields[6].1, r#"["Pool","Gym"]"#);

        let location: serde_json::Value = serde_json::from_str(&fields[4].1).unwrap();
        assert_eq!(location["zipCode"], "62704");
        let features: serde_json::Value = serde_json::from_str(&fields[5].1).unwrap();
        assert_eq!(features["squareFeet"], 850);
    }

    #[test]
    fn test_sale_update_has_no_frequency() {
        let mut update = PropertyUpdate::from(&crate::models::fixtures::rental("u2", 1.0, 2));
        update.price = Price::Sale {
            amount: 350000.0,
            terms: crate::models::PriceTerms::Negotiable,
        };

        let fields = update.form_fields().unwrap();
        assert_eq!(fields[2].1, "sale");
        assert_eq!(fields[3].1, r#"{"amount":350000.0,"type":"negotiable"}"#);
    }

    #[test]
    fn test_listing_filter_parsing() {
        assert_eq!("Rent".parse::<ListingFilter>().unwrap(), ListingFilter::Rent);
        assert_eq!("all".parse::<ListingFilter>().unwrap(), ListingFilter::All);
        assert!("lease".parse::<ListingFilter>().is_err());
    }
}
