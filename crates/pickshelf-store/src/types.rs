use chrono::{DateTime, Utc};
use serde::Serialize;

/// Archive-state filter for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveState {
    Active,
    Archived,
    #[default]
    All,
}

impl ArchiveState {
    /// Parses the `state` query value used by the admin UI. Unknown values
    /// mean no filter.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "active" => ArchiveState::Active,
            "archived" => ArchiveState::Archived,
            _ => ArchiveState::All,
        }
    }
}

/// Filters for [`crate::StoreClient::list_products`].
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    pub state: ArchiveState,
    /// Free-text term matched against titles, descriptions, category, and
    /// product number.
    pub q: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    pub approved: Option<bool>,
    pub limit: Option<u32>,
}

/// Row inserted into `shop_products` by a picks refresh.
#[derive(Debug, Clone, Serialize)]
pub struct NewHomePick {
    pub product_num: String,
    pub created_at: DateTime<Utc>,
}

/// Tables allowed in backup exports. Everything else is rejected before any
/// request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupTable {
    Products,
    ShopProducts,
    Categories,
}

impl BackupTable {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "products" => Some(BackupTable::Products),
            "shop_products" => Some(BackupTable::ShopProducts),
            "categories" => Some(BackupTable::Categories),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BackupTable::Products => "products",
            BackupTable::ShopProducts => "shop_products",
            BackupTable::Categories => "categories",
        }
    }
}
