use crate::generator::traits::MockDataSource;
use crate::models::MockData;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fetches pools from a JSON mock server
pub struct HttpMockSource {
    client: Client,
    url: String,
}

impl HttpMockSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl MockDataSource for HttpMockSource {
    async fn load(&self) -> Result<MockData> {
        info!("Fetching mock data from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch mock data from {}", self.url))?;

        if !response.status().is_success() {
            warn!("Mock server returned status: {}", response.status());
            anyhow::bail!("Failed to fetch mock data: {}", response.status());
        }

        let data = response
            .json::<MockData>()
            .await
            .context("Failed to decode mock data JSON")?;

        debug!("Loaded {} titles from mock server", data.titles.len());
        Ok(data)
    }

    fn source_name(&self) -> &'static str {
        "mock-server"
    }
}

/// Reads pools from a JSON file on disk
pub struct FileMockSource {
    path: PathBuf,
}

impl FileMockSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MockDataSource for FileMockSource {
    async fn load(&self) -> Result<MockData> {
        debug!("Reading mock data from {}", self.path.display());

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse mock data in {}", self.path.display()))
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}

/// Serves the compiled-in sample pools
#[derive(Default)]
pub struct BuiltinMockSource;

#[async_trait]
impl MockDataSource for BuiltinMockSource {
    async fn load(&self) -> Result<MockData> {
        info!("📋 Using built-in sample mock data");
        Ok(MockData::sample())
    }

    fn source_name(&self) -> &'static str {
        "builtin"
    }
}

/// Pick a source from a CLI argument: URLs go over HTTP, anything else is a file path
pub fn source_for(location: Option<&str>) -> Result<Box<dyn MockDataSource>> {
    match location {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
            Ok(Box::new(HttpMockSource::new(url)?))
        }
        Some(path) => Ok(Box::new(FileMockSource::new(path))),
        None => Ok(Box::new(BuiltinMockSource)),
    }
}
