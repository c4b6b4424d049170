use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub created_at: chrono::NaiveDateTime,
}

/// Raw query-string parameters for the product listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductParams {
    pub name: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub order_by: Option<String>,
    pub sort_in: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductItem {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
}

impl From<Product> for ProductItem {
    fn from(p: Product) -> Self {
        ProductItem {
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductList {
    pub items: Vec<ProductItem>,
}
