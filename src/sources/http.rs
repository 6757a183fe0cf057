use crate::models::Property;
use crate::sources::error::FetchError;
use crate::sources::traits::PropertySource;
use crate::sources::types::{FilterCriteria, PropertyUpdate};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, Method, Request, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Where requests go and who they are sent as.
///
/// Passed explicitly to the client instead of being read from global state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    base_url: Url,
    token: Option<String>,
}

impl RequestContext {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot have paths appended: {}", base_url);
        }
        Ok(Self {
            base_url,
            token: None,
        })
    }

    /// Attach a bearer token; blank tokens are ignored
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Base URL with the given path segments appended (each one percent-encoded)
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[derive(Debug, Deserialize)]
struct SavedResponse {
    saved: bool,
}

/// REST client for the property collaborator
pub struct PropertyApi {
    client: Client,
    context: RequestContext,
}

impl PropertyApi {
    pub fn new(context: RequestContext, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rental-scout/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, context })
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.client.request(method, self.context.endpoint(segments));
        match &self.context.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// `GET /properties` with the criteria as query parameters
    pub fn search_request(&self, criteria: &FilterCriteria) -> RequestBuilder {
        self.request(Method::GET, &["properties"])
            .query(&criteria.query_pairs())
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Response, FetchError> {
        let request: Request = builder.build()?;
        debug!("{} {}", request.method(), request.url());
        Ok(self.client.execute(request).await?)
    }

    /// Fetch every property matching the criteria
    pub async fn get_properties(&self, criteria: &FilterCriteria) -> Result<Vec<Property>, FetchError> {
        let response = self.execute(self.search_request(criteria)).await?;
        let properties: Vec<Property> = read_json(response).await?;
        debug!("Received {} properties", properties.len());
        Ok(properties)
    }

    /// Fetch a single property by id
    pub async fn get_property(&self, id: &str) -> Result<Property, FetchError> {
        let response = self
            .execute(self.request(Method::GET, &["properties", id]))
            .await?;
        read_json(response).await
    }

    pub async fn save_property(&self, id: &str) -> Result<(), FetchError> {
        let response = self
            .execute(self.request(Method::POST, &["properties", id, "save"]))
            .await?;
        expect_success(response).await
    }

    pub async fn unsave_property(&self, id: &str) -> Result<(), FetchError> {
        let response = self
            .execute(self.request(Method::DELETE, &["properties", id, "save"]))
            .await?;
        expect_success(response).await
    }

    /// Whether the current user saved this property; any failure reads as not saved
    pub async fn is_saved(&self, id: &str) -> bool {
        match self.fetch_saved(id).await {
            Ok(saved) => saved.saved,
            Err(e) => {
                debug!("Saved-state lookup for {} failed: {}", id, e);
                false
            }
        }
    }

    async fn fetch_saved(&self, id: &str) -> Result<SavedResponse, FetchError> {
        let response = self
            .execute(self.request(Method::GET, &["properties", id, "saved"]))
            .await?;
        read_json(response).await
    }

    /// `PUT /properties/{id}` as multipart text parts
    pub fn update_request(&self, id: &str, update: &PropertyUpdate) -> Result<RequestBuilder, FetchError> {
        let form = update
            .form_fields()?
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        Ok(self.request(Method::PUT, &["properties", id]).multipart(form))
    }

    /// Replace the editable fields of a listing; returns the stored property
    pub async fn update_property(&self, id: &str, update: &PropertyUpdate) -> Result<Property, FetchError> {
        let response = self.execute(self.update_request(id, update)?).await?;
        read_json(response).await
    }

    pub async fn delete_property(&self, id: &str) -> Result<(), FetchError> {
        let response = self
            .execute(self.request(Method::DELETE, &["properties", id]))
            .await?;
        expect_success(response).await
    }
}

#[async_trait]
impl PropertySource for PropertyApi {
    async fn fetch_properties(&self, criteria: &FilterCriteria) -> Result<Vec<Property>, FetchError> {
        self.get_properties(criteria).await
    }

    fn source_name(&self) -> &'static str {
        "REST API"
    }
}

/// The body is read in full before parsing, so a response is accepted whole or not at all
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Property service returned status: {}", status);
        return Err(FetchError::from_status(status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| {
        warn!("Could not parse property service response: {}", e);
        FetchError::Malformed(e)
    })
}

async fn expect_success(response: Response) -> Result<(), FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    warn!("Property service returned status: {}", status);
    let body = response.text().await.unwrap_or_default();
    Err(FetchError::from_status(status.as_u16(), &body))
}
