//! Turns untrusted listing parameters into a [`QuerySpec`].
//!
//! Nothing here touches storage. Sort field and direction are closed enums,
//! so the only text that ever reaches an ORDER BY clause is one of the
//! column names below.

use crate::error::QueryError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
    #[default]
    CreatedAt,
}

impl SortField {
    /// Unknown or empty input falls back to `CreatedAt`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "name" => SortField::Name,
            "price" | "price_cents" => SortField::Price,
            _ => SortField::CreatedAt,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price_cents",
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-sensitive; anything but `desc` is ascending.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "desc" => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// ASCII-lowercased substring, folded the same way as SQLite's `LOWER`.
    /// Empty matches every product.
    pub name_contains: String,
    pub min_price: i64,
    pub max_price: i64,
    pub order_by: SortField,
    pub direction: SortDirection,
}

impl Default for QuerySpec {
    fn default() -> Self {
        QuerySpec {
            name_contains: String::new(),
            min_price: i64::MIN,
            max_price: i64::MAX,
            order_by: SortField::default(),
            direction: SortDirection::default(),
        }
    }
}

/// `min_price > max_price` is accepted and simply matches nothing.
pub fn build_query(
    name: Option<&str>,
    min_price: Option<&str>,
    max_price: Option<&str>,
    order_by: Option<&str>,
    sort_in: Option<&str>,
) -> Result<QuerySpec, QueryError> {
    Ok(QuerySpec {
        name_contains: name.unwrap_or_default().to_ascii_lowercase(),
        min_price: parse_bound(min_price, i64::MIN, "minPrice")?,
        max_price: parse_bound(max_price, i64::MAX, "maxPrice")?,
        order_by: SortField::parse(order_by.unwrap_or_default()),
        direction: SortDirection::parse(sort_in.unwrap_or_default()),
    })
}

fn parse_bound(raw: Option<&str>, default: i64, field: &'static str) -> Result<i64, QueryError> {
    match raw {
        None | Some("") => Ok(default),
        Some(v) => v.parse().map_err(|_| QueryError::InvalidInput(field)),
    }
}
