//! Link entity representing a shortened URL owned by a seller.

use chrono::{DateTime, Utc};

/// A shortened URL link.
///
/// Links are immutable once created. `(original_url, seller_id)` acts as a
/// dedup key at the service level only; there is no storage constraint on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub seller_id: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        seller_id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            seller_id,
            created_at,
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: String,
    pub seller_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "https://example.com".to_string(),
            "abc123".to_string(),
            "s1".to_string(),
            now,
        );

        assert_eq!(link.id, 1);
        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.seller_id, "s1");
        assert_eq!(link.created_at, now);
    }
}
