//! HTTP client for `api.php`: one GET at a time with a fixed User-Agent,
//! bodies decoded as JSON.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use wikiharvest_shared::{Result, ScrapeConfig, WikiHarvestError};

use crate::WikiApi;
use crate::types::{Continuation, MemberPage, RawMemberListing, RawRender, RenderResponse};

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Where the wiki lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct WikiEndpoint {
    /// Wiki origin, e.g. `https://deadbydaylight.wiki.gg`.
    pub base_url: Url,
    /// Path of `api.php` relative to the origin.
    pub api_path: String,
    /// User-Agent header; must be non-empty.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl From<&ScrapeConfig> for WikiEndpoint {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_path: config.api_path.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
        }
    }
}

// ---------------------------------------------------------------------------
// WikiClient
// ---------------------------------------------------------------------------

/// `reqwest`-backed [`WikiApi`] implementation.
#[derive(Debug, Clone)]
pub struct WikiClient {
    client: Client,
    base_url: Url,
    api_url: Url,
}

impl WikiClient {
    /// Build a client for the given endpoint.
    pub fn new(endpoint: &WikiEndpoint) -> Result<Self> {
        if endpoint.user_agent.trim().is_empty() {
            return Err(WikiHarvestError::validation(
                "refusing to build an HTTP client with an empty User-Agent",
            ));
        }

        let api_url = endpoint.base_url.join(&endpoint.api_path).map_err(|e| {
            WikiHarvestError::validation(format!(
                "cannot join api path '{}' onto {}: {e}",
                endpoint.api_path, endpoint.base_url
            ))
        })?;

        let client = Client::builder()
            .user_agent(endpoint.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(endpoint.timeout)
            .build()
            .map_err(|e| WikiHarvestError::transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: endpoint.base_url.clone(),
            api_url,
        })
    }

    /// Full request URL for a parameter set.
    fn request_url<'a>(&self, params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut().extend_pairs(params);
        url
    }

    /// GET `api.php` with the given query and return the raw body.
    pub async fn get_bytes<'a>(
        &self,
        params: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Vec<u8>> {
        let url = self.request_url(params);
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| WikiHarvestError::transport(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WikiHarvestError::transport(format!("{url}: HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| WikiHarvestError::transport(format!("{url}: failed to read body: {e}")))?;

        Ok(body.to_vec())
    }

    /// GET `api.php` and decode the body as JSON.
    pub async fn get_json<'a, T: DeserializeOwned>(
        &self,
        params: impl IntoIterator<Item = (&'a str, &'a str)> + Clone,
    ) -> Result<T> {
        let body = self.get_bytes(params.clone()).await?;
        serde_json::from_slice(&body).map_err(|e| {
            WikiHarvestError::transport(format!(
                "failed to decode JSON for {}: {e}",
                self.request_url(params)
            ))
        })
    }
}

impl WikiApi for WikiClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[instrument(skip_all, fields(category = %category))]
    async fn category_members(
        &self,
        category: &str,
        continuation: Option<&Continuation>,
    ) -> Result<MemberPage> {
        let mut params: Vec<(&str, &str)> = vec![
            ("action", "query"),
            ("list", "categorymembers"),
            ("cmtitle", category),
            ("cmtype", "page|subcat"),
            ("cmlimit", "max"),
            ("format", "json"),
        ];
        if let Some(cont) = continuation {
            params.extend(cont.params());
        }

        let raw: RawMemberListing = self.get_json(params.iter().copied()).await?;
        if let Some(err) = &raw.error {
            warn!(
                code = err.code.as_deref().unwrap_or(""),
                info = err.info.as_deref().unwrap_or(""),
                "API reported an error for category listing"
            );
        }

        Ok(MemberPage::from(raw))
    }

    #[instrument(skip_all, fields(title = %title))]
    async fn render_page(&self, title: &str) -> Result<RenderResponse> {
        let params = [
            ("action", "parse"),
            ("page", title),
            ("prop", "text|categories"),
            ("format", "json"),
        ];
        let raw: RawRender = self.get_json(params).await?;
        Ok(RenderResponse::from(raw))
    }
}
