use crate::error::CatalogError;
use crate::types::Page;

#[derive(Debug, Clone)]
pub enum Action {
    // Presentation signals
    Attach,
    NearEnd(usize),
    Dispose,

    // Fetch results, tagged with the load they answer
    PageLoaded(Page, u64),
    PageFailed(String, u64),
}

impl Action {
    pub fn failed(err: CatalogError, load_id: u64) -> Self {
        Action::PageFailed(err.to_string(), load_id)
    }
}
