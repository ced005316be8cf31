//! Statistics aggregation
//!
//! Pure functions over the live system's order set, computed on demand.
//! The output shape feeds the stats dashboard charts directly.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::{Order, OrderLine, OrderStatus};

/// Line names with this prefix are pitchers: one pitcher counts as
/// five single servings on the beer leaderboards.
const PITCHER_PREFIX: &str = "pitcher";
const PITCHER_SERVINGS: u64 = 5;

const LEADERBOARD_SIZE: usize = 5;

/// Total quantity of one product across all completed orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuantity {
    pub product_id: String,
    pub name: String,
    pub quantity: u64,
}

/// A table with an aggregate quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableQuantity {
    pub table: i32,
    pub quantity: u64,
}

/// Winning table for one food name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopFoodEntry {
    pub food: String,
    pub table_number: i32,
    pub quantity: u64,
}

/// Aggregated statistics for the stats view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Status → order count, over every order of the system.
    pub order_counts: BTreeMap<OrderStatus, u64>,
    /// Top 5 tables by completed-order count.
    pub top_tables: BTreeMap<i32, u64>,
    pub ordered_drinks: Vec<ProductQuantity>,
    pub ordered_foods: Vec<ProductQuantity>,
    /// Top 5 beer tables, in single-serving equivalents.
    pub ordered_beers: Vec<(i32, u64)>,
    pub ordered_rose_beers: Vec<(i32, u64)>,
    pub most_snacks_table: TableQuantity,
    pub top_food_by_table: Vec<TopFoodEntry>,
}

fn is_rose_beer(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("rosé bier") || name.contains("rose bier")
}

fn is_beer(name: &str) -> bool {
    name.to_lowercase().contains("bier") && !is_rose_beer(name)
}

/// Serving equivalents of one drink line: pitchers count five-fold.
fn serving_equivalents(line: &OrderLine) -> u64 {
    let multiplier = if line.name.to_lowercase().starts_with(PITCHER_PREFIX) {
        PITCHER_SERVINGS
    } else {
        1
    };
    u64::from(line.quantity) * multiplier
}

/// Keep the N largest entries of a per-table tally, largest first;
/// equal counts order by table number.
fn leaderboard(tally: BTreeMap<i32, u64>, n: usize) -> Vec<(i32, u64)> {
    let mut entries: Vec<(i32, u64)> = tally.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

/// Aggregate statistics from a system's orders. Status counts cover
/// every order; every other metric only looks at COMPLETED orders.
pub fn aggregate(orders: &[Order]) -> Statistics {
    let mut order_counts: BTreeMap<OrderStatus, u64> = BTreeMap::new();
    for order in orders {
        *order_counts.entry(order.status).or_default() += 1;
    }

    let completed: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .collect();

    // Completed-order count per table, top 5.
    let mut table_orders: BTreeMap<i32, u64> = BTreeMap::new();
    for order in &completed {
        *table_orders.entry(order.table_number).or_default() += 1;
    }
    let top_tables: BTreeMap<i32, u64> = leaderboard(table_orders, LEADERBOARD_SIZE)
        .into_iter()
        .collect();

    // Total quantity per product, split by partition.
    let ordered_drinks = product_totals(completed.iter().flat_map(|o| o.drinks.iter()));
    let ordered_foods = product_totals(completed.iter().flat_map(|o| o.foods.iter()));

    // Beer leaderboards in serving equivalents.
    let mut beer_tally: BTreeMap<i32, u64> = BTreeMap::new();
    let mut rose_tally: BTreeMap<i32, u64> = BTreeMap::new();
    for order in &completed {
        for line in &order.drinks {
            let servings = serving_equivalents(line);
            if servings == 0 {
                continue;
            }
            if is_rose_beer(&line.name) {
                *rose_tally.entry(order.table_number).or_default() += servings;
            } else if is_beer(&line.name) {
                *beer_tally.entry(order.table_number).or_default() += servings;
            }
        }
    }

    // Highest total food quantity per table; ties keep the lower
    // table number because the scan is ascending and strictly greater.
    let mut food_per_table: BTreeMap<i32, u64> = BTreeMap::new();
    for order in &completed {
        let quantity: u64 = order.foods.iter().map(|l| u64::from(l.quantity)).sum();
        if quantity > 0 {
            *food_per_table.entry(order.table_number).or_default() += quantity;
        }
    }
    let mut most_snacks_table = TableQuantity {
        table: 0,
        quantity: 0,
    };
    for (&table, &quantity) in &food_per_table {
        if quantity > most_snacks_table.quantity {
            most_snacks_table = TableQuantity { table, quantity };
        }
    }

    // Per food name, the table with the strictly highest quantity.
    let mut food_names: Vec<String> = Vec::new();
    let mut food_tables: HashMap<String, BTreeMap<i32, u64>> = HashMap::new();
    for order in &completed {
        for line in &order.foods {
            if line.quantity == 0 {
                continue;
            }
            if !food_tables.contains_key(&line.name) {
                food_names.push(line.name.clone());
            }
            *food_tables
                .entry(line.name.clone())
                .or_default()
                .entry(order.table_number)
                .or_default() += u64::from(line.quantity);
        }
    }
    let top_food_by_table = food_names
        .iter()
        .map(|name| {
            let mut winner = TopFoodEntry {
                food: name.clone(),
                table_number: 0,
                quantity: 0,
            };
            for (&table, &quantity) in &food_tables[name] {
                if quantity > winner.quantity {
                    winner.table_number = table;
                    winner.quantity = quantity;
                }
            }
            winner
        })
        .collect();

    Statistics {
        order_counts,
        top_tables,
        ordered_drinks,
        ordered_foods,
        ordered_beers: leaderboard(beer_tally, LEADERBOARD_SIZE),
        ordered_rose_beers: leaderboard(rose_tally, LEADERBOARD_SIZE),
        most_snacks_table,
        top_food_by_table,
    }
}

fn product_totals<'a>(lines: impl Iterator<Item = &'a OrderLine>) -> Vec<ProductQuantity> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, ProductQuantity> = HashMap::new();

    for line in lines {
        if line.quantity == 0 {
            continue;
        }
        let entry = totals
            .entry(line.product_id.clone())
            .or_insert_with(|| {
                order.push(line.product_id.clone());
                ProductQuantity {
                    product_id: line.product_id.clone(),
                    name: line.name.clone(),
                    quantity: 0,
                }
            });
        entry.quantity += u64::from(line.quantity);
    }

    let mut result: Vec<ProductQuantity> = order
        .into_iter()
        .map(|id| totals.remove(&id).expect("tracked id"))
        .collect();
    result.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.name.cmp(&b.name)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Order, OrderLine, ProductType};
    use rust_decimal::Decimal;

    fn drink(name: &str, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: format!("p-{}", name.to_lowercase().replace(' ', "-")),
            name: name.to_string(),
            unit_price: Decimal::new(300, 2),
            product_type: ProductType::Drink,
            quantity,
        }
    }

    fn food(name: &str, quantity: u32) -> OrderLine {
        OrderLine {
            product_id: format!("p-{}", name.to_lowercase().replace(' ', "-")),
            name: name.to_string(),
            unit_price: Decimal::new(250, 2),
            product_type: ProductType::Food,
            quantity,
        }
    }

    fn order(
        table_number: i32,
        status: OrderStatus,
        drinks: Vec<OrderLine>,
        foods: Vec<OrderLine>,
    ) -> Order {
        Order {
            id: 0,
            system_id: 1,
            table_id: i64::from(table_number),
            table_number,
            bar_id: None,
            status,
            drinks,
            foods,
            total_price: Decimal::ZERO,
            created_at: 0,
        }
    }

    #[test]
    fn pitcher_counts_five_servings_per_unit() {
        let orders = vec![order(
            3,
            OrderStatus::Completed,
            vec![drink("Pitcher Bier", 2)],
            vec![],
        )];

        let stats = aggregate(&orders);
        assert_eq!(stats.ordered_beers, vec![(3, 10)]);
    }

    #[test]
    fn rose_beer_has_its_own_leaderboard() {
        let orders = vec![order(
            1,
            OrderStatus::Completed,
            vec![drink("Bier", 4), drink("Rosé Bier", 2), drink("Pitcher Rosé Bier", 1)],
            vec![],
        )];

        let stats = aggregate(&orders);
        assert_eq!(stats.ordered_beers, vec![(1, 4)]);
        assert_eq!(stats.ordered_rose_beers, vec![(1, 7)]);
    }

    #[test]
    fn non_beer_drinks_stay_off_the_leaderboards() {
        let orders = vec![order(
            2,
            OrderStatus::Completed,
            vec![drink("Cola", 6)],
            vec![],
        )];

        let stats = aggregate(&orders);
        assert!(stats.ordered_beers.is_empty());
        assert!(stats.ordered_rose_beers.is_empty());
        assert_eq!(stats.ordered_drinks[0].quantity, 6);
    }

    #[test]
    fn pending_orders_count_in_status_map_only() {
        let orders = vec![
            order(1, OrderStatus::Completed, vec![drink("Bier", 1)], vec![]),
            order(1, OrderStatus::Pending, vec![drink("Bier", 9)], vec![]),
        ];

        let stats = aggregate(&orders);
        assert_eq!(stats.order_counts[&OrderStatus::Pending], 1);
        assert_eq!(stats.order_counts[&OrderStatus::Completed], 1);
        assert_eq!(stats.ordered_beers, vec![(1, 1)]);
    }

    #[test]
    fn top_tables_keeps_five_busiest() {
        let mut orders = Vec::new();
        for table in 1..=7 {
            for _ in 0..table {
                orders.push(order(table, OrderStatus::Completed, vec![drink("Bier", 1)], vec![]));
            }
        }

        let stats = aggregate(&orders);
        assert_eq!(stats.top_tables.len(), 5);
        // Tables 1 and 2 fall off.
        assert!(!stats.top_tables.contains_key(&1));
        assert!(!stats.top_tables.contains_key(&2));
        assert_eq!(stats.top_tables[&7], 7);
    }

    #[test]
    fn most_snacks_table_sums_food_quantities() {
        let orders = vec![
            order(4, OrderStatus::Completed, vec![], vec![food("Friet", 2)]),
            order(4, OrderStatus::Completed, vec![], vec![food("Bitterballen", 3)]),
            order(6, OrderStatus::Completed, vec![], vec![food("Friet", 4)]),
        ];

        let stats = aggregate(&orders);
        assert_eq!(
            stats.most_snacks_table,
            TableQuantity { table: 4, quantity: 5 }
        );
    }

    #[test]
    fn food_winner_tie_keeps_earlier_table() {
        let orders = vec![
            order(5, OrderStatus::Completed, vec![], vec![food("Friet", 3)]),
            order(2, OrderStatus::Completed, vec![], vec![food("Friet", 3)]),
        ];

        let stats = aggregate(&orders);
        assert_eq!(
            stats.top_food_by_table,
            vec![TopFoodEntry {
                food: "Friet".to_string(),
                table_number: 2,
                quantity: 3,
            }]
        );
    }

    #[test]
    fn product_totals_accumulate_across_orders() {
        let orders = vec![
            order(1, OrderStatus::Completed, vec![drink("Bier", 2)], vec![food("Friet", 1)]),
            order(2, OrderStatus::Completed, vec![drink("Bier", 3)], vec![]),
        ];

        let stats = aggregate(&orders);
        assert_eq!(stats.ordered_drinks.len(), 1);
        assert_eq!(stats.ordered_drinks[0].quantity, 5);
        assert_eq!(stats.ordered_foods[0].quantity, 1);
    }

    #[test]
    fn output_keys_are_camel_case() {
        let stats = aggregate(&[order(
            1,
            OrderStatus::Completed,
            vec![drink("Bier", 1)],
            vec![food("Friet", 1)],
        )]);

        let value = serde_json::to_value(&stats).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "orderCounts",
            "topTables",
            "orderedDrinks",
            "orderedFoods",
            "orderedBeers",
            "orderedRoseBeers",
            "mostSnacksTable",
            "topFoodByTable",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
    }
}
