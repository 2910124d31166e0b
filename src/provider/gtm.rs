use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::edgegrid::EdgegridSigner;
use super::{Datacenter, Domain, GtmApi, Property, ResponseStatus};
use crate::config::EdgegridSection;

const GTM_MEDIA_TYPE: &str = "application/vnd.config-gtm.v1.4+json";
const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Client for the GTM config API (v1.4).
pub struct GtmClient {
    client: Client,
    base: Url,
    signer: EdgegridSigner,
}

impl GtmClient {
    pub fn new(section: &EdgegridSection) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;
        let base = Url::parse(&format!("https://{}", section.host.trim_end_matches('/')))
            .with_context(|| format!("Invalid API host: {}", section.host))?;

        Ok(Self {
            client,
            base,
            signer: EdgegridSigner::new(section),
        })
    }

    fn domain_url(&self, domain: &str, rest: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API host cannot be used as a base URL"))?
            .extend(["config-gtm", "v1", "domains", domain])
            .extend(rest);
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<Vec<u8>>) -> Result<reqwest::Response> {
        let payload = body.as_deref().unwrap_or_default();
        let authorization = self.signer.authorization(method.as_str(), &url, payload)?;
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(header::AUTHORIZATION, authorization)
            .header(header::ACCEPT, GTM_MEDIA_TYPE);
        if let Some(body) = body {
            request = request.header(header::CONTENT_TYPE, GTM_MEDIA_TYPE).body(body);
        }

        request
            .send()
            .await
            .with_context(|| format!("Failed to send {} request to {}", method, url))
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("GTM API error ({}): {}", status.as_u16(), problem_detail(&text));
        }

        response
            .json()
            .await
            .context("Failed to parse GTM API response")
    }
}

#[async_trait]
impl GtmApi for GtmClient {
    async fn get_domain(&self, name: &str) -> Result<Option<Domain>> {
        let url = self.domain_url(name, &[])?;
        let response = self.send(Method::GET, url, None).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Self::read_json(response).await.map(Some)
    }

    async fn update_property(&self, domain: &str, property: &Property) -> Result<ResponseStatus> {
        let url = self.domain_url(domain, &["properties", property.name.as_str()])?;
        let body = serde_json::to_vec(property).context("Failed to encode property")?;
        let response = self.send(Method::PUT, url, Some(body)).await?;

        let envelope: PropertyResponse = Self::read_json(response).await?;
        Ok(envelope.status)
    }

    async fn get_domain_status(&self, domain: &str) -> Result<ResponseStatus> {
        let url = self.domain_url(domain, &["status", "current"])?;
        let response = self.send(Method::GET, url, None).await?;
        Self::read_json(response).await
    }

    async fn list_datacenters(&self, domain: &str) -> Result<Vec<Datacenter>> {
        let url = self.domain_url(domain, &["datacenters"])?;
        let response = self.send(Method::GET, url, None).await?;

        let list: DatacenterList = Self::read_json(response).await?;
        Ok(list.items)
    }
}

/// Pull the human readable part out of an API problem document.
fn problem_detail(body: &str) -> String {
    match serde_json::from_str::<Problem>(body) {
        Ok(Problem { detail: Some(detail), .. }) => detail,
        Ok(Problem { title: Some(title), .. }) => title,
        _ if body.is_empty() => "empty response body".to_string(),
        _ => body.to_string(),
    }
}

// GTM API types

#[derive(Debug, Deserialize)]
struct PropertyResponse {
    status: ResponseStatus,
}

#[derive(Debug, Deserialize)]
struct DatacenterList {
    #[serde(default)]
    items: Vec<Datacenter>,
}

#[derive(Debug, Deserialize)]
struct Problem {
    title: Option<String>,
    detail: Option<String>,
}
