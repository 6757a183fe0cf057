use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rental_scout::browse::{BrowseSession, SortKey};
use rental_scout::config::AppConfig;
use rental_scout::models::{PriceTerms, Property};
use rental_scout::present::{render_cards, DisplayVariant, PropertyCard};
use rental_scout::sources::{
    FetchError, FilterCriteria, ListingFilter, PropertyApi, PropertySource, PropertyUpdate,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rental-scout")]
#[command(about = "Browse rental and sale listings from the property API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search listings and print them as cards
    Browse(BrowseArgs),

    /// Show one listing
    Show {
        /// Property id
        id: String,
    },

    /// Save a listing to your favourites
    Save { id: String },

    /// Remove a listing from your favourites
    Unsave { id: String },

    /// Edit a listing you own; unset flags keep their current value
    Edit(EditArgs),

    /// Delete a listing you own
    Delete { id: String },
}

#[derive(Args)]
struct EditArgs {
    /// Property id
    id: String,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    description: Option<String>,

    /// New asking price; listing type and frequency stay as they are
    #[arg(long)]
    price: Option<f64>,

    #[arg(long)]
    negotiable: Option<bool>,

    #[arg(long)]
    furnished: Option<bool>,

    /// Replaces the amenity list (repeat for several)
    #[arg(long = "amenity")]
    amenities: Vec<String>,
}

impl EditArgs {
    fn apply(&self, update: &mut PropertyUpdate) -> Result<()> {
        if let Some(title) = &self.title {
            update.title = title.clone();
        }
        if let Some(description) = &self.description {
            update.description = description.clone();
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                anyhow::bail!("Price must be a non-negative number, got {}", price);
            }
            update.price = update.price.with_amount(price);
        }
        if let Some(negotiable) = self.negotiable {
            let terms = if negotiable {
                PriceTerms::Negotiable
            } else {
                PriceTerms::Fixed
            };
            update.price = update.price.with_terms(terms);
        }
        if let Some(furnished) = self.furnished {
            update.features.furnished = furnished;
        }
        if !self.amenities.is_empty() {
            update.amenities = self.amenities.clone();
        }
        Ok(())
    }
}

#[derive(Args)]
struct BrowseArgs {
    /// all, rent or sale
    #[arg(long, default_value = "all")]
    listing_type: ListingFilter,

    /// Location substring (address, city, state or zip)
    #[arg(long, default_value = "")]
    location: String,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    #[arg(long)]
    bedrooms: Option<u32>,

    #[arg(long)]
    property_type: Option<String>,

    #[arg(long)]
    furnished: Option<bool>,

    /// Only listings with (true) or without (false) parking
    #[arg(long)]
    parking: Option<bool>,

    /// newest, price-asc or price-desc
    #[arg(long, default_value = "newest")]
    sort: SortKey,

    /// grid or list
    #[arg(long, default_value = "grid")]
    variant: DisplayVariant,

    /// Save the sorted result as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl BrowseArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            listing_type: self.listing_type,
            location: self.location.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            bedrooms: self.bedrooms,
            property_type: self.property_type.clone(),
            furnished: self.furnished,
            parking: self.parking,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let api = Arc::new(PropertyApi::new(config.request, config.timeout)?);

    match cli.command {
        Commands::Browse(args) => browse(api, args).await,
        Commands::Show { id } => show(&api, &id).await,
        Commands::Save { id } => {
            api.save_property(&id)
                .await
                .map_err(user_error)
                .with_context(|| format!("Could not save {}", id))?;
            info!("⭐ Saved {}", id);
            Ok(())
        }
        Commands::Unsave { id } => {
            api.unsave_property(&id)
                .await
                .map_err(user_error)
                .with_context(|| format!("Could not unsave {}", id))?;
            info!("Removed {} from saved properties", id);
            Ok(())
        }
        Commands::Edit(args) => edit(&api, args).await,
        Commands::Delete { id } => {
            api.delete_property(&id)
                .await
                .map_err(user_error)
                .with_context(|| format!("Could not delete {}", id))?;
            info!("🗑️  Deleted {}", id);
            Ok(())
        }
    }
}

async fn browse(api: Arc<PropertyApi>, args: BrowseArgs) -> Result<()> {
    info!("🏠 Rental Scout - browsing via {}", api.source_name());
    info!("API: {}", api.context().base_url());

    let mut session = BrowseSession::new(api);
    session.set_sort(args.sort);
    session.set_criteria(args.criteria());
    session.settle().await;

    let properties = browse_result(&session)?;
    println!("{} properties found (sorted by {})\n", properties.len(), session.sort_key());
    if !properties.is_empty() {
        println!("{}", render_cards(&properties, args.variant));
    }

    if let Some(path) = args.output {
        save_json(&path, &properties).await?;
    }

    Ok(())
}

/// The sorted list, or an error so the process exits non-zero
fn browse_result<S: PropertySource + 'static>(session: &BrowseSession<S>) -> Result<Vec<Property>> {
    if let Some(message) = session.error() {
        println!("⚠️  {}", message);
        anyhow::bail!("Browsing failed: {}", message);
    }
    Ok(session.sorted())
}

async fn show(api: &PropertyApi, id: &str) -> Result<()> {
    let property = api
        .get_property(id)
        .await
        .map_err(user_error)
        .with_context(|| format!("Could not load property {}", id))?;

    let card = PropertyCard::from_property(&property);
    println!("{}", card.render(DisplayVariant::Grid));
    if !property.description.is_empty() {
        println!("\n{}", property.description);
    }
    if !property.amenities.is_empty() {
        println!("Amenities: {}", property.amenities.join(", "));
    }
    if let Some(year) = property.features.year_built {
        println!("Built: {}", year);
    }
    if api.context().is_authenticated() && api.is_saved(id).await {
        println!("⭐ Saved");
    }

    Ok(())
}

async fn edit(api: &PropertyApi, args: EditArgs) -> Result<()> {
    let current = api
        .get_property(&args.id)
        .await
        .map_err(user_error)
        .with_context(|| format!("Could not load property {}", args.id))?;

    let mut update = PropertyUpdate::from(&current);
    args.apply(&mut update)?;
    if update == PropertyUpdate::from(&current) {
        info!("Nothing to change for {}", args.id);
        return Ok(());
    }

    let updated = api
        .update_property(&args.id, &update)
        .await
        .map_err(user_error)
        .with_context(|| format!("Could not update {}", args.id))?;
    info!("✏️  Updated {}", args.id);
    println!("{}", PropertyCard::from_property(&updated).render(DisplayVariant::Grid));
    Ok(())
}

async fn save_json(path: &Path, properties: &[Property]) -> Result<()> {
    let json = serde_json::to_string_pretty(properties)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Saved {} properties to {}", properties.len(), path.display());
    Ok(())
}

/// Log the full cause, surface the user-facing message
fn user_error(e: FetchError) -> anyhow::Error {
    warn!("{}", e);
    anyhow::anyhow!(e.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_scout::models::Price;

    fn edit_args(argv: &[&str]) -> EditArgs {
        let mut full = vec!["rental-scout", "edit"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Edit(args) => args,
            _ => panic!("expected edit"),
        }
    }

    fn current() -> PropertyUpdate {
        PropertyUpdate {
            title: "Old title".to_string(),
            description: "Old description".to_string(),
            price: Price::Sale {
                amount: 300000.0,
                terms: PriceTerms::Fixed,
            },
            location: serde_json::from_value(serde_json::json!({
                "address": "5 Bay Rd", "city": "Tampa", "state": "FL", "zipCode": "33602"
            }))
            .unwrap(),
            features: serde_json::from_value(serde_json::json!({
                "bedrooms": 3, "bathrooms": 2, "squareFeet": 1400, "propertyType": "house"
            }))
            .unwrap(),
            amenities: vec!["Garden".to_string()],
        }
    }

    #[test]
    fn test_edit_flags_override_only_what_is_set() {
        let args = edit_args(&[
            "p1", "--price", "285000", "--negotiable", "true", "--amenity", "Pool", "--amenity", "Garage",
        ]);
        let mut update = current();
        args.apply(&mut update).unwrap();

        assert_eq!(
            update.price,
            Price::Sale {
                amount: 285000.0,
                terms: PriceTerms::Negotiable,
            }
        );
        assert_eq!(update.amenities, vec!["Pool", "Garage"]);
        assert_eq!(update.title, "Old title");
        assert!(!update.features.furnished);
    }

    struct DownSource;

    #[async_trait::async_trait]
    impl PropertySource for DownSource {
        async fn fetch_properties(&self, _criteria: &FilterCriteria) -> Result<Vec<Property>, FetchError> {
            Err(FetchError::from_status(503, r#"{"message":"Maintenance window"}"#))
        }

        fn source_name(&self) -> &'static str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_failed_browse_is_an_error() {
        let mut session = BrowseSession::new(Arc::new(DownSource));
        session.mount();
        session.settle().await;

        let err = browse_result(&session).unwrap_err();
        assert!(err.to_string().contains("Maintenance window"), "{}", err);
    }

    #[test]
    fn test_edit_rejects_negative_price() {
        let args = edit_args(&["p1", "--price=-5"]);
        assert!(args.apply(&mut current()).is_err());
    }
}
