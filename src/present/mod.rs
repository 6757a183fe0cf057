use crate::models::{Price, Property};
use std::fmt::Write as _;
use std::str::FromStr;

pub const PLACEHOLDER_IMAGE: &str = "/placeholder-property.jpg";

/// How a list of cards is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayVariant {
    #[default]
    Grid,
    List,
}

impl FromStr for DisplayVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(DisplayVariant::Grid),
            "list" => Ok(DisplayVariant::List),
            other => Err(format!("unknown display variant '{}' (expected grid or list)", other)),
        }
    }
}

/// Display-ready summary of one listing
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyCard {
    pub title: String,
    pub full_address: String,
    pub city_line: String,
    pub price_label: String,
    pub listing_badge: &'static str,
    pub status_badge: &'static str,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    /// Only set when there is at least one space
    pub parking: Option<u32>,
    pub furnished: bool,
    pub cover_image: String,
    pub detail_path: String,
}

impl PropertyCard {
    pub fn from_property(property: &Property) -> Self {
        let location = &property.location;
        Self {
            title: property.title.clone(),
            full_address: format!(
                "{}, {}, {} {}",
                location.address, location.city, location.state, location.zip_code
            ),
            city_line: format!("{}, {}", location.city, location.state),
            price_label: price_label(&property.price),
            listing_badge: property.listing_type().badge(),
            status_badge: property.status.label(),
            bedrooms: property.features.bedrooms,
            bathrooms: property.features.bathrooms,
            square_feet: property.features.square_feet,
            parking: property.features.parking.filter(|p| *p > 0),
            furnished: property.features.furnished,
            cover_image: property
                .cover_image()
                .map(|image| image.url.clone())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            detail_path: format!("/properties/{}", property.id),
        }
    }

    fn counts(&self) -> String {
        let mut counts = format!(
            "{} bd · {} ba · {} sqft",
            self.bedrooms, self.bathrooms, self.square_feet
        );
        if let Some(parking) = self.parking {
            let _ = write!(counts, " · {} parking", parking);
        }
        if self.furnished {
            counts.push_str(" · Furnished");
        }
        counts
    }

    pub fn render(&self, variant: DisplayVariant) -> String {
        match variant {
            DisplayVariant::Grid => format!(
                "{}  [{}] [{}]\n{}\n{}\n{}\nImage: {}\nDetails: {}",
                self.title,
                self.status_badge,
                self.listing_badge,
                self.full_address,
                self.price_label,
                self.counts(),
                self.cover_image,
                self.detail_path
            ),
            DisplayVariant::List => format!(
                "{} | {} | {} | {} | {} | {}",
                self.title,
                self.city_line,
                self.price_label,
                self.counts(),
                self.status_badge,
                self.detail_path
            ),
        }
    }
}

/// Rent carries `/mo` or `/yr`; sale prices never do
pub fn price_label(price: &Price) -> String {
    let mut label = format_usd(price.amount());
    if let Price::Rent { frequency, .. } = price {
        label.push_str(frequency.suffix());
    }
    if price.is_negotiable() {
        label.push_str(" (Negotiable)");
    }
    label
}

/// Whole dollars with thousands separators, e.g. `$12,500`
pub fn format_usd(amount: f64) -> String {
    // Formatting the f64 directly keeps amounts past u64::MAX exact
    let digits = format!("{:.0}", amount.max(0.0));
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return format!("${}", digits);
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Render every card, blank-line separated in grid form
pub fn render_cards(properties: &[Property], variant: DisplayVariant) -> String {
    let separator = match variant {
        DisplayVariant::Grid => "\n\n",
        DisplayVariant::List => "\n",
    };
    properties
        .iter()
        .map(|p| PropertyCard::from_property(p).render(variant))
        .collect::<Vec<_>>()
        .join(separator)
}
