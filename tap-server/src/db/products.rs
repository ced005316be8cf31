use rust_decimal::Decimal;
use shared::models::{Product, ProductType};
use sqlx::PgExecutor;

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    system_id: i64,
    product_id: String,
    name: String,
    price: Decimal,
    product_type: String,
    position: i32,
}

impl ProductRow {
    fn into_model(self) -> Option<Product> {
        let Some(product_type) = ProductType::from_db(&self.product_type) else {
            tracing::warn!(
                product_id = %self.product_id,
                product_type = %self.product_type,
                "unknown product type in storage, row skipped"
            );
            return None;
        };
        Some(Product {
            id: self.id,
            system_id: self.system_id,
            product_id: self.product_id,
            name: self.name,
            price: self.price,
            product_type,
            position: self.position,
        })
    }
}

/// All products of a system in display order.
pub async fn list_by_system(
    ex: impl PgExecutor<'_>,
    system_id: i64,
) -> Result<Vec<Product>, sqlx::Error> {
    let rows: Vec<ProductRow> =
        sqlx::query_as("SELECT * FROM products WHERE system_id = $1 ORDER BY position, id")
            .bind(system_id)
            .fetch_all(ex)
            .await?;
    Ok(rows.into_iter().filter_map(ProductRow::into_model).collect())
}

/// Delete every product of the system whose stable identifier is not
/// in `keep_ids`.
pub async fn delete_absent(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    keep_ids: &[String],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM products WHERE system_id = $1 AND NOT (product_id = ANY($2))",
    )
    .bind(system_id)
    .bind(keep_ids)
    .execute(ex)
    .await?;
    Ok(result.rows_affected())
}

/// Insert or update by stable identifier. The owning system of an
/// existing row never changes.
pub async fn upsert(
    ex: impl PgExecutor<'_>,
    system_id: i64,
    product_id: &str,
    name: &str,
    price: Decimal,
    product_type: ProductType,
    position: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO products (system_id, product_id, name, price, product_type, position)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (product_id) DO UPDATE
         SET name = EXCLUDED.name,
             price = EXCLUDED.price,
             product_type = EXCLUDED.product_type,
             position = EXCLUDED.position",
    )
    .bind(system_id)
    .bind(product_id)
    .bind(name)
    .bind(price)
    .bind(product_type.as_db())
    .bind(position)
    .execute(ex)
    .await?;
    Ok(())
}
