use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::auth::{self, Credentials};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::types::{image_url, Page, Record};

const CHARACTERS_PATH: &str = "/v1/public/characters";

pub struct MarvelCatalog {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl std::fmt::Debug for MarvelCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarvelCatalog")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MarvelCatalog {
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.api.timeout())
            .build()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        Ok(Self::with_client(client, config.base_url(), credentials))
    }

    fn with_client(client: Client, base_url: &str, credentials: Credentials) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_characters(&self, offset: u32, limit: u32) -> Result<MvResponse> {
        let ts = auth::timestamp();
        let hash = self.credentials.sign(&ts);
        let limit = limit.to_string();
        let offset = offset.to_string();

        let response = self
            .client
            .get(self.api_url(CHARACTERS_PATH))
            .query(&[
                ("ts", ts.as_str()),
                ("apikey", self.credentials.public_key.as_str()),
                ("hash", hash.as_str()),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(CatalogError::Status { status, body });
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

// Marvel API response types

#[derive(Deserialize)]
struct MvResponse {
    data: MvData,
}

#[derive(Deserialize)]
struct MvData {
    results: Vec<MvCharacter>,
}

#[derive(Deserialize)]
struct MvCharacter {
    id: u64,
    name: String,
    description: Option<String>,
    thumbnail: MvThumbnail,
}

#[derive(Deserialize)]
struct MvThumbnail {
    path: String,
    extension: String,
}

impl From<MvCharacter> for Record {
    fn from(c: MvCharacter) -> Self {
        Record {
            id: c.id,
            name: c.name,
            image_url: image_url(&c.thumbnail.path, &c.thumbnail.extension),
            description: c.description.unwrap_or_default(),
        }
    }
}

fn parse_response(body: &str) -> Result<MvResponse> {
    serde_json::from_str(body).map_err(|e| CatalogError::Parse(e.to_string()))
}

#[async_trait]
impl Catalog for MarvelCatalog {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Page> {
        if limit == 0 {
            return Err(CatalogError::InvalidRequest(
                "page limit must be positive".to_string(),
            ));
        }

        let response = self.get_characters(offset, limit).await?;
        let records: Vec<Record> = response
            .data
            .results
            .into_iter()
            .map(Record::from)
            .collect();

        debug!(offset, count = records.len(), "loaded characters page");

        Ok(Page { offset, records })
    }
}
