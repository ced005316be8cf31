//! Basket splitting
//!
//! The pure half of order placement: validate basket keys against the
//! catalog, parse requested quantities, drop zero lines and partition
//! the rest into drink and food line-item sets. Persistence and
//! routing live in the server crate.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::models::{OrderLine, Product, ProductType};

/// A basket as submitted by the ordering form: stable product id to
/// quantity string. Quantities arrive as strings straight from form
/// inputs; anything non-numeric counts as zero.
pub type Basket = HashMap<String, String>;

/// Result of partitioning a basket against the catalog.
#[derive(Debug, Clone, Default)]
pub struct SplitBasket {
    pub drinks: Vec<OrderLine>,
    pub foods: Vec<OrderLine>,
}

impl SplitBasket {
    pub fn drink_total(&self) -> Decimal {
        self.drinks.iter().map(OrderLine::line_total).sum()
    }

    pub fn food_total(&self) -> Decimal {
        self.foods.iter().map(OrderLine::line_total).sum()
    }

    /// Combined total across both partitions, for the patron receipt.
    /// The two persisted orders each carry only their own partition's
    /// total; this sum is never stored.
    pub fn combined_total(&self) -> Decimal {
        self.drink_total() + self.food_total()
    }

    pub fn is_empty(&self) -> bool {
        self.drinks.is_empty() && self.foods.is_empty()
    }
}

/// Basket keys that do not match any catalog product. A non-empty
/// result rejects the whole order.
pub fn unknown_product_ids(products: &[Product], basket: &Basket) -> Vec<String> {
    basket
        .keys()
        .filter(|id| !products.iter().any(|p| &p.product_id == *id))
        .cloned()
        .collect()
}

/// Parse a requested quantity. Absent, blank or non-numeric input is
/// zero, never an error; negative numbers fail the unsigned parse and
/// also land on zero. No upper bound is enforced here.
fn parse_quantity(raw: Option<&String>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok()).unwrap_or(0)
}

/// Walk the catalog in its stored order, snapshot every product with a
/// non-zero requested quantity and partition the lines by type.
pub fn split_basket(products: &[Product], basket: &Basket) -> SplitBasket {
    let mut split = SplitBasket::default();

    for product in products {
        let quantity = parse_quantity(basket.get(&product.product_id));
        if quantity == 0 {
            continue;
        }

        let line = OrderLine {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            product_type: product.product_type,
            quantity,
        };

        match product.product_type {
            ProductType::Drink => split.drinks.push(line),
            ProductType::Food => split.foods.push(line),
        }
    }

    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(product_id: &str, name: &str, price: &str, product_type: ProductType) -> Product {
        Product {
            id: 0,
            system_id: 1,
            product_id: product_id.to_string(),
            name: name.to_string(),
            price: price.parse::<Decimal>().unwrap(),
            product_type,
            position: 0,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("p-bier", "Bier", "3.00", ProductType::Drink),
            product("p-rose", "Rosé Bier", "3.50", ProductType::Drink),
            product("p-fries", "Friet", "2.50", ProductType::Food),
            product("p-snack", "Bitterballen", "4.00", ProductType::Food),
        ]
    }

    #[test]
    fn partitions_mixed_basket_without_loss() {
        let basket = Basket::from([
            ("p-bier".to_string(), "2".to_string()),
            ("p-fries".to_string(), "1".to_string()),
        ]);

        let split = split_basket(&catalog(), &basket);

        assert_eq!(split.drinks.len(), 1);
        assert_eq!(split.foods.len(), 1);
        assert_eq!(split.drinks[0].product_id, "p-bier");
        assert_eq!(split.drinks[0].quantity, 2);
        assert_eq!(split.foods[0].product_id, "p-fries");

        // No line in both partitions, none dropped.
        assert!(split.drinks.iter().all(|l| l.product_type == ProductType::Drink));
        assert!(split.foods.iter().all(|l| l.product_type == ProductType::Food));
    }

    #[test]
    fn zero_missing_and_garbage_quantities_are_excluded() {
        let basket = Basket::from([
            ("p-bier".to_string(), "0".to_string()),
            ("p-rose".to_string(), "".to_string()),
            ("p-fries".to_string(), "three".to_string()),
            ("p-snack".to_string(), "-2".to_string()),
        ]);

        let split = split_basket(&catalog(), &basket);
        assert!(split.is_empty());
        assert_eq!(split.combined_total(), Decimal::ZERO);
    }

    #[test]
    fn totals_are_per_partition_and_combined() {
        let basket = Basket::from([
            ("p-bier".to_string(), "2".to_string()),
            ("p-rose".to_string(), "1".to_string()),
            ("p-snack".to_string(), "3".to_string()),
        ]);

        let split = split_basket(&catalog(), &basket);
        assert_eq!(split.drink_total(), "9.50".parse::<Decimal>().unwrap());
        assert_eq!(split.food_total(), "12.00".parse::<Decimal>().unwrap());
        assert_eq!(split.combined_total(), "21.50".parse::<Decimal>().unwrap());
    }

    #[test]
    fn quantities_above_the_ui_range_are_accepted() {
        // The 1..=5 limit is a form constraint only.
        let basket = Basket::from([("p-bier".to_string(), "40".to_string())]);
        let split = split_basket(&catalog(), &basket);
        assert_eq!(split.drinks[0].quantity, 40);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let basket = Basket::from([
            ("p-bier".to_string(), "1".to_string()),
            ("p-nope".to_string(), "1".to_string()),
        ]);

        let unknown = unknown_product_ids(&catalog(), &basket);
        assert_eq!(unknown, vec!["p-nope".to_string()]);
    }

    #[test]
    fn line_snapshot_keeps_unit_price() {
        let basket = Basket::from([("p-rose".to_string(), "4".to_string())]);
        let split = split_basket(&catalog(), &basket);
        let line = &split.drinks[0];
        assert_eq!(line.unit_price, "3.50".parse::<Decimal>().unwrap());
        assert_eq!(line.line_total(), "14.00".parse::<Decimal>().unwrap());
    }
}
