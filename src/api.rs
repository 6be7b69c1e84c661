//! HTTP client for the revisions lookup API.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::{ReportError, TransportError};

const REVISIONS_PATH: &str = "/api/revisions";

/// Issues one revisions lookup for an already-built query string and
/// returns the raw response body.
#[allow(async_fn_in_trait)]
pub trait RevisionApi {
    async fn get_revisions(&self, query: &str) -> Result<String, TransportError>;
}

impl<A: RevisionApi + ?Sized> RevisionApi for &A {
    async fn get_revisions(&self, query: &str) -> Result<String, TransportError> {
        (**self).get_revisions(query).await
    }
}

pub struct ApiClient {
    client: Client,
    revisions_url: Url,
    api_key: String,
}

impl ApiClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, ReportError> {
        let invalid = |source| ReportError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            source,
        };
        let server = Url::parse(endpoint).map_err(invalid)?;
        let revisions_url = server.join(REVISIONS_PATH).map_err(invalid)?;
        if api_key.is_empty() {
            tracing::warn!("no API key configured; revisions requests will be unauthenticated");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("revision-report/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ReportError::HttpClient)?;

        Ok(Self {
            client,
            revisions_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn revisions_url(&self) -> &Url {
        &self.revisions_url
    }
}

impl RevisionApi for ApiClient {
    async fn get_revisions(&self, query: &str) -> Result<String, TransportError> {
        // The query is pre-escaped; set it verbatim so indices and escapes survive.
        let mut url = self.revisions_url.clone();
        url.set_query(Some(query));

        tracing::debug!(%url, "requesting revisions");
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("token {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        Ok(response.text().await?)
    }
}
