use crate::types::Record;

/// Read-only snapshot of the list for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub records: Vec<Record>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Projection {
    pub fn last_index(&self) -> Option<usize> {
        self.records.len().checked_sub(1)
    }
}
