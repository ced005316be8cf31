//! Table-to-bar distribution helpers
//!
//! Deterministic redistribution algorithms used by the admin layout
//! screen. They only compute assignments; persisting them goes through
//! the topology save path.

use serde::{Deserialize, Serialize};

/// A bar as referenced by the layout screen. `id` is None for a bar
/// that exists only client-side and has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRef {
    pub bar_number: i32,
    pub id: Option<i64>,
}

/// One computed table assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableAssignment {
    pub table_number: i32,
    pub bar_number: i32,
    pub bar_id: Option<i64>,
}

/// Assign `floor(T/B)` tables to every bar and one extra table to each
/// of the first `T mod B` bars, filling table numbers ascending,
/// bar by bar.
pub fn even_distribution(bars: &[BarRef], total_tables: u32) -> Vec<TableAssignment> {
    if bars.is_empty() || total_tables == 0 {
        return Vec::new();
    }

    let per_bar = total_tables as usize / bars.len();
    let remaining = total_tables as usize % bars.len();

    let mut assignments = Vec::with_capacity(total_tables as usize);
    let mut table_number = 1;

    for (i, bar) in bars.iter().enumerate() {
        let count = per_bar + usize::from(i < remaining);
        for _ in 0..count {
            assignments.push(TableAssignment {
                table_number,
                bar_number: bar.bar_number,
                bar_id: bar.id,
            });
            table_number += 1;
        }
    }

    assignments
}

/// Round-robin: table `i` (0-based) goes to `bars[i mod B]`.
pub fn alternating_distribution(bars: &[BarRef], total_tables: u32) -> Vec<TableAssignment> {
    if bars.is_empty() || total_tables == 0 {
        return Vec::new();
    }

    (0..total_tables as usize)
        .map(|i| {
            let bar = &bars[i % bars.len()];
            TableAssignment {
                table_number: i as i32 + 1,
                bar_number: bar.bar_number,
                bar_id: bar.id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(n: i32) -> Vec<BarRef> {
        (1..=n)
            .map(|i| BarRef {
                bar_number: i,
                id: Some(i as i64 * 10),
            })
            .collect()
    }

    fn numbers_for_bar(assignments: &[TableAssignment], bar_number: i32) -> Vec<i32> {
        assignments
            .iter()
            .filter(|a| a.bar_number == bar_number)
            .map(|a| a.table_number)
            .collect()
    }

    #[test]
    fn even_three_bars_ten_tables() {
        let assignments = even_distribution(&bars(3), 10);

        assert_eq!(assignments.len(), 10);
        assert_eq!(numbers_for_bar(&assignments, 1), vec![1, 2, 3, 4]);
        assert_eq!(numbers_for_bar(&assignments, 2), vec![5, 6, 7]);
        assert_eq!(numbers_for_bar(&assignments, 3), vec![8, 9, 10]);
    }

    #[test]
    fn even_distribution_exact_fit_has_no_remainder_bars() {
        let assignments = even_distribution(&bars(2), 8);
        assert_eq!(numbers_for_bar(&assignments, 1).len(), 4);
        assert_eq!(numbers_for_bar(&assignments, 2).len(), 4);
    }

    #[test]
    fn alternating_two_bars_five_tables() {
        let assignments = alternating_distribution(&bars(2), 5);

        let expected: Vec<(i32, i32)> = vec![(1, 1), (2, 2), (3, 1), (4, 2), (5, 1)];
        let actual: Vec<(i32, i32)> = assignments
            .iter()
            .map(|a| (a.table_number, a.bar_number))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn empty_inputs_yield_no_assignments() {
        assert!(even_distribution(&[], 10).is_empty());
        assert!(even_distribution(&bars(3), 0).is_empty());
        assert!(alternating_distribution(&[], 10).is_empty());
        assert!(alternating_distribution(&bars(3), 0).is_empty());
    }

    #[test]
    fn assignments_carry_bar_ids() {
        let assignments = alternating_distribution(&bars(2), 2);
        assert_eq!(assignments[0].bar_id, Some(10));
        assert_eq!(assignments[1].bar_id, Some(20));
    }
}
