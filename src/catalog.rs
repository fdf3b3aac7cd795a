use async_trait::async_trait;

use crate::error::Result;
use crate::types::Page;

/// A remote catalog that serves records in offset/limit windows.
///
/// Implementations issue exactly one request per call and never page
/// internally; walking the catalog is the controller's job.
#[async_trait]
pub trait Catalog: Send + Sync + std::fmt::Debug {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<Page>;
}
