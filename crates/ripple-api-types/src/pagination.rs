use serde::{Deserialize, Serialize};

/// Page-based pagination parameters shared by every listing endpoint.
///
/// Pages start at 1. Both fields are optional on the wire; endpoints
/// clamp `limit` to their own maximum before touching the database.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u64 = 20;
    pub const MAX_LIMIT: u64 = 50;

    /// Effective page size after clamping to [`Self::MAX_LIMIT`].
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    /// Row offset for the requested page.
    ///
    /// `page` comes straight off the query string, so the arithmetic
    /// saturates instead of overflowing on absurd page numbers.
    #[must_use]
    pub fn offset(&self) -> u64 {
        let page = self.page.unwrap_or(1).max(1);
        page.saturating_sub(1).saturating_mul(self.limit())
    }
}
