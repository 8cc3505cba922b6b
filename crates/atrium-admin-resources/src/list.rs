//! Shared pagination query model.

use atrium_api_client::Query;

/// Pagination parameters accepted by every list operation.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub(crate) fn to_query(&self) -> Query {
        Query::new()
            .with("page", self.page)
            .with("per_page", self.per_page)
    }
}
