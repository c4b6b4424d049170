use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{error::StoreError, models::product::Product, query::QuerySpec};

/// Used by seeding and admin tooling; the listing path only reads.
pub async fn insert_product(
    db: &SqlitePool,
    name: &str,
    price_cents: i64,
) -> Result<i64, StoreError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO products (name, price_cents) VALUES (?, ?) RETURNING id",
    )
    .bind(name)
    .bind(price_cents)
    .fetch_one(db)
    .await?;

    Ok(id)
}

pub async fn fetch_products(db: &SqlitePool, spec: &QuerySpec) -> Result<Vec<Product>, StoreError> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, name, price_cents, created_at FROM products WHERE instr(LOWER(name), ",
    );
    query
        .push_bind(spec.name_contains.clone())
        .push(") > 0 AND price_cents >= ")
        .push_bind(spec.min_price)
        .push(" AND price_cents <= ")
        .push_bind(spec.max_price);

    // id breaks ties so equal keys keep insertion order.
    let direction = spec.direction.keyword();
    query
        .push(" ORDER BY ")
        .push(spec.order_by.column())
        .push(" ")
        .push(direction)
        .push(", id ")
        .push(direction);

    let products = query.build_query_as::<Product>().fetch_all(db).await?;
    Ok(products)
}
