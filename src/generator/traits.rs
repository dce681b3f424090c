use crate::error::GeneratorError;
use crate::models::MockData;
use anyhow::Result;
use async_trait::async_trait;

/// Produces one encoded mock offer line per call
pub trait OfferGenerator {
    fn generate(&mut self) -> Result<String, GeneratorError>;
}

/// Common trait for everything that can supply generator pools
/// (the mock JSON server, a local file, the built-in sample set)
#[async_trait]
pub trait MockDataSource: Send + Sync {
    /// Load the pools from the source
    async fn load(&self) -> Result<MockData>;

    /// Get the name of the source, for logs
    fn source_name(&self) -> &'static str;
}
