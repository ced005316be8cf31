use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use shared::models::{Product, ProductType};

use crate::db;
use crate::error::{AppError, AppResponse, AppResult, ok};
use crate::state::AppState;

/// One catalog entry as the admin screen edits it. `product_id` is
/// None for a product created client-side that has no identifier yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub product_id: Option<String>,
    pub name: String,
    pub price: Decimal,
    pub product_type: ProductType,
    pub position: i32,
}

impl From<Product> for ProductEntry {
    fn from(product: Product) -> Self {
        Self {
            product_id: Some(product.product_id),
            name: product.name,
            price: product.price,
            product_type: product.product_type,
            position: product.position,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductSettings {
    pub drinks: Vec<ProductEntry>,
    pub foods: Vec<ProductEntry>,
}

fn partition(products: Vec<Product>) -> ProductSettings {
    let (drinks, foods): (Vec<_>, Vec<_>) = products
        .into_iter()
        .partition(|p| p.product_type == ProductType::Drink);
    ProductSettings {
        drinks: drinks.into_iter().map(Into::into).collect(),
        foods: foods.into_iter().map(Into::into).collect(),
    }
}

/// Catalog of one system, partitioned by type. System id 0 is the
/// admin screen's placeholder for "nothing selected yet".
pub async fn get_products(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<ProductSettings>>> {
    if id == 0 {
        return Ok(ok(ProductSettings {
            drinks: Vec::new(),
            foods: Vec::new(),
        }));
    }
    let products = db::products::list_by_system(&state.pool, id).await?;
    Ok(ok(partition(products)))
}

#[derive(Debug, Deserialize)]
pub struct SaveProductsRequest {
    #[serde(default)]
    pub drinks: Vec<ProductEntry>,
    #[serde(default)]
    pub foods: Vec<ProductEntry>,
}

#[derive(Debug, Serialize)]
pub struct SaveProductsOutcome {
    pub saved: usize,
    pub skipped: usize,
    pub deleted: u64,
}

/// How one incoming entry's identifier resolves on save.
#[derive(Debug, PartialEq, Eq)]
enum ResolvedId {
    /// Existing identifier, upsert by it.
    Keep(String),
    /// No identifier supplied; a fresh one is minted.
    Generated(String),
    /// Empty or whitespace identifier; the entry is dropped with a
    /// warning instead of failing the whole save.
    Skip,
}

fn resolve_product_id(product_id: Option<&str>) -> ResolvedId {
    match product_id {
        None => ResolvedId::Generated(Uuid::new_v4().to_string()),
        Some(pid) if pid.trim().is_empty() => ResolvedId::Skip,
        Some(pid) => ResolvedId::Keep(pid.to_string()),
    }
}

/// Atomic catalog replace: delete rows absent from the incoming set,
/// then upsert the rest by stable identifier. An entry without an
/// identifier gets a generated one; an entry with an empty identifier
/// is skipped with a warning rather than failing the whole save.
pub async fn save_products(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SaveProductsRequest>,
) -> AppResult<Json<AppResponse<SaveProductsOutcome>>> {
    db::systems::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("System {id} not found")))?;

    let incoming: Vec<ProductEntry> = payload
        .drinks
        .into_iter()
        .chain(payload.foods)
        .collect();

    let keep_ids: Vec<String> = incoming
        .iter()
        .filter_map(|p| p.product_id.clone())
        .filter(|pid| !pid.trim().is_empty())
        .collect();

    let mut tx = state.pool.begin().await?;

    let deleted = db::products::delete_absent(&mut *tx, id, &keep_ids).await?;

    let mut saved = 0;
    let mut skipped = 0;
    for entry in &incoming {
        let product_id = match resolve_product_id(entry.product_id.as_deref()) {
            ResolvedId::Skip => {
                warn!(name = %entry.name, "product with empty identifier skipped");
                skipped += 1;
                continue;
            }
            ResolvedId::Keep(pid) | ResolvedId::Generated(pid) => pid,
        };
        db::products::upsert(
            &mut *tx,
            id,
            &product_id,
            &entry.name,
            entry.price,
            entry.product_type,
            entry.position,
        )
        .await?;
        saved += 1;
    }

    tx.commit().await?;

    state.products.invalidate(id);
    info!(system_id = id, saved, skipped, deleted, "catalog saved");

    Ok(ok(SaveProductsOutcome {
        saved,
        skipped,
        deleted,
    }))
}

#[derive(Debug, Serialize)]
pub struct OrderProducts {
    pub id: i64,
    pub name: String,
    pub drinks: Vec<ProductEntry>,
    pub foods: Vec<ProductEntry>,
}

/// Patron-facing catalog of the live system.
pub async fn order_products(
    State(state): State<AppState>,
) -> AppResult<Json<AppResponse<OrderProducts>>> {
    let system = state.require_live_system().await?;
    let products = state.catalog(system.id).await?;

    let settings = partition(products.as_ref().clone());
    Ok(ok(OrderProducts {
        id: system.id,
        name: system.name,
        drinks: settings.drinks,
        foods: settings.foods,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(product_id: &str, product_type: ProductType, position: i32) -> Product {
        Product {
            id: 1,
            system_id: 1,
            product_id: product_id.to_string(),
            name: product_id.to_uppercase(),
            price: Decimal::new(300, 2),
            product_type,
            position,
        }
    }

    #[test]
    fn partition_splits_by_type_and_keeps_order() {
        let settings = partition(vec![
            product("bier", ProductType::Drink, 0),
            product("frites", ProductType::Food, 0),
            product("cola", ProductType::Drink, 1),
        ]);

        let drink_ids: Vec<_> = settings
            .drinks
            .iter()
            .map(|p| p.product_id.as_deref().unwrap())
            .collect();
        assert_eq!(drink_ids, vec!["bier", "cola"]);
        assert_eq!(settings.foods.len(), 1);
    }

    #[test]
    fn existing_identifier_is_kept_verbatim() {
        assert_eq!(
            resolve_product_id(Some("p-bier")),
            ResolvedId::Keep("p-bier".to_string())
        );
        // Surrounding whitespace alone does not disqualify an id.
        assert_eq!(
            resolve_product_id(Some(" p-bier ")),
            ResolvedId::Keep(" p-bier ".to_string())
        );
    }

    #[test]
    fn missing_identifier_gets_a_generated_uuid() {
        let ResolvedId::Generated(pid) = resolve_product_id(None) else {
            panic!("missing id must generate one");
        };
        assert!(Uuid::parse_str(&pid).is_ok());

        let ResolvedId::Generated(other) = resolve_product_id(None) else {
            panic!("missing id must generate one");
        };
        assert_ne!(pid, other);
    }

    #[test]
    fn empty_and_whitespace_identifiers_are_skipped() {
        assert_eq!(resolve_product_id(Some("")), ResolvedId::Skip);
        assert_eq!(resolve_product_id(Some("   ")), ResolvedId::Skip);
        assert_eq!(resolve_product_id(Some("\t\n")), ResolvedId::Skip);
    }
}
