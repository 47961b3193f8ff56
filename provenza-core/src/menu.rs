//! Menu catalog
//!
//! The catalog is static: loaded once, validated, never mutated. Items keep
//! the natural (file) order, which is also the display order for filtering.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

/// Default menu shipped with the crate.
const DEFAULT_MENU_JSON: &str = include_str!("../data/menu.json");

/// Menu category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Appetizer,
    Main,
    Dessert,
    Wine,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Appetizer => write!(f, "APPETIZER"),
            Category::Main => write!(f, "MAIN"),
            Category::Dessert => write!(f, "DESSERT"),
            Category::Wine => write!(f, "WINE"),
        }
    }
}

/// Catalog filter selection
///
/// `All` is the "show everything" tab; `Only` matches one category exactly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

/// Wine-specific details, present only on wine-category items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WineInfo {
    pub volume: String,
    pub region: String,
    /// Vintage year
    pub year: i32,
}

/// Immutable catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Price in whole currency units (rubles), always positive
    pub price: i64,
    pub category: Category,
    /// Image asset path, referenced but never fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wine: Option<WineInfo>,
}

/// Static, read-only list of orderable menu items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    items: Vec<MenuItem>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// Validation: ids must be unique, prices positive, and wine details
    /// may only appear on wine-category items.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<MenuItem> = serde_json::from_str(json)?;
        Self::from_items(items)
    }

    /// Build a catalog from already-constructed items, with validation.
    pub fn from_items(items: Vec<MenuItem>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(CatalogError::DuplicateItemId(item.id));
            }
            if item.price <= 0 {
                return Err(CatalogError::InvalidPrice {
                    id: item.id,
                    price: item.price,
                });
            }
            if item.wine.is_some() && item.category != Category::Wine {
                return Err(CatalogError::UnexpectedWineInfo(item.id));
            }
        }
        tracing::debug!(items = items.len(), "Catalog loaded");
        Ok(Self { items })
    }

    /// The built-in five-item menu of the restaurant.
    ///
    /// The embedded JSON is validated at load; a parse failure here is a
    /// packaging defect, so this panics rather than returning a Result.
    pub fn default_menu() -> Self {
        match Self::from_json(DEFAULT_MENU_JSON) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("embedded menu.json is invalid: {e}"),
        }
    }

    /// Look up an item by id.
    pub fn get(&self, id: u32) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Filter items by category, preserving catalog order.
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| match filter {
                CategoryFilter::All => true,
                CategoryFilter::Only(category) => item.category == category,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_menu_loads() {
        let catalog = Catalog::default_menu();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get(1).unwrap().price, 2800);
        assert_eq!(catalog.get(4).unwrap().category, Category::Wine);
        assert!(catalog.get(4).unwrap().wine.is_some());
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn test_filter_all_returns_full_catalog_in_order() {
        let catalog = Catalog::default_menu();
        let all = catalog.filter(CategoryFilter::All);
        assert_eq!(all.len(), 5);
        let ids: Vec<u32> = all.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_filter_wine_only() {
        let catalog = Catalog::default_menu();
        let wines = catalog.filter(CategoryFilter::Only(Category::Wine));
        assert_eq!(wines.len(), 2);
        assert!(wines.iter().all(|i| i.category == Category::Wine));
        let ids: Vec<u32> = wines.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![4, 5]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let json = r#"[
            {"id": 1, "name": "A", "description": "", "price": 100, "category": "MAIN"},
            {"id": 1, "name": "B", "description": "", "price": 200, "category": "DESSERT"}
        ]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateItemId(1)));
    }

    #[test]
    fn test_nonpositive_price_rejected() {
        let json = r#"[
            {"id": 1, "name": "A", "description": "", "price": 0, "category": "MAIN"}
        ]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPrice { id: 1, price: 0 }));
    }

    #[test]
    fn test_wine_info_on_non_wine_item_rejected() {
        let json = r#"[
            {"id": 7, "name": "A", "description": "", "price": 100, "category": "MAIN",
             "wine": {"volume": "750мл", "region": "Пьемонт", "year": 2019}}
        ]"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::UnexpectedWineInfo(7)));
    }

    #[test]
    fn test_category_serde_wire_form() {
        let json = serde_json::to_string(&Category::Appetizer).unwrap();
        assert_eq!(json, "\"APPETIZER\"");
        assert_eq!(Category::Wine.to_string(), "WINE");
    }
}
