use std::collections::{HashMap, HashSet};

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use shared::models::{Bar, BarType};
use shared::topology::{BarRef, alternating_distribution, even_distribution};

use crate::db;
use crate::error::{AppError, AppResponse, AppResult, ok};
use crate::state::AppState;

/// One bar or kitchen as the admin layout screen edits it. `id` is
/// None for a row that has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarEntry {
    pub id: Option<i64>,
    pub bar_number: i32,
    pub name: String,
    pub bar_type: BarType,
}

#[derive(Debug, Serialize)]
pub struct AssignmentView {
    pub table_id: i64,
    pub table_number: i32,
    pub bar_id: i64,
    pub bar_number: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct TopologySettings {
    pub bars: Vec<Bar>,
    pub total_tables: i64,
    pub assignments: Vec<AssignmentView>,
}

/// Layout of one system: bars and kitchens, table count and the
/// current table-to-bar assignments.
pub async fn get_topology(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<TopologySettings>>> {
    if id == 0 {
        return Ok(ok(TopologySettings {
            bars: Vec::new(),
            total_tables: 0,
            assignments: Vec::new(),
        }));
    }

    let bars = db::bars::list_by_system(&state.pool, id).await?;
    let tables = db::tables::list_by_system(&state.pool, id).await?;
    let relations = db::relations::list_by_system(&state.pool, id).await?;

    let bar_numbers: HashMap<i64, i32> = bars.iter().map(|b| (b.id, b.bar_number)).collect();
    let table_numbers: HashMap<i64, i32> =
        tables.iter().map(|t| (t.id, t.table_number)).collect();

    let mut assignments: Vec<AssignmentView> = relations
        .iter()
        .filter_map(|r| {
            let table_number = *table_numbers.get(&r.table_id)?;
            Some(AssignmentView {
                table_id: r.table_id,
                table_number,
                bar_id: r.bar_id,
                bar_number: bar_numbers.get(&r.bar_id).copied(),
            })
        })
        .collect();
    assignments.sort_by_key(|a| a.table_number);

    Ok(ok(TopologySettings {
        bars,
        total_tables: tables.len() as i64,
        assignments,
    }))
}

/// Desired assignment of one table. Entries are positional: entry at
/// index i with no table id falls back to table number i + 1.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentEntry {
    pub table_id: Option<i64>,
    pub bar_id: Option<i64>,
}

/// Server-side redistribution mode. When set, the explicit assignment
/// list is ignored and assignments are computed over the drink bars.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    Even,
    Alternating,
}

#[derive(Debug, Deserialize)]
pub struct SaveTopologyRequest {
    pub total_tables: u32,
    #[serde(default)]
    pub bars: Vec<BarEntry>,
    #[serde(default)]
    pub kitchens: Vec<BarEntry>,
    #[serde(default)]
    pub assignments: Vec<AssignmentEntry>,
    pub distribution: Option<Distribution>,
}

#[derive(Debug, Serialize)]
pub struct SaveTopologyOutcome {
    pub bars: usize,
    pub tables_created: usize,
    pub relations_created: usize,
    pub relations_deleted: usize,
}

/// Reconcile the whole layout in one transaction: bars and kitchens
/// first, then the 1..N table sequence, then the relation set. A stale
/// relation that leaves its table or bar without any relation also
/// removes the orphaned row.
pub async fn save_topology(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SaveTopologyRequest>,
) -> AppResult<Json<AppResponse<SaveTopologyOutcome>>> {
    db::systems::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("System {id} not found")))?;

    let mut tx = state.pool.begin().await?;

    // Bars and kitchens share one roster: delete absent, upsert the rest.
    let roster: Vec<BarEntry> = payload
        .bars
        .into_iter()
        .chain(payload.kitchens)
        .collect();
    let keep_ids: Vec<i64> = roster.iter().filter_map(|b| b.id).collect();
    db::bars::delete_absent(&mut *tx, id, &keep_ids).await?;

    let mut persisted_bars: Vec<Bar> = Vec::with_capacity(roster.len());
    for entry in &roster {
        let bar_id = match entry.id {
            Some(bar_id) => {
                db::bars::update(&mut *tx, bar_id, entry.bar_number, &entry.name, entry.bar_type)
                    .await?;
                bar_id
            }
            None => {
                db::bars::insert(&mut *tx, id, entry.bar_number, &entry.name, entry.bar_type)
                    .await?
            }
        };
        persisted_bars.push(Bar {
            id: bar_id,
            system_id: id,
            bar_number: entry.bar_number,
            name: entry.name.clone(),
            bar_type: entry.bar_type,
        });
    }

    // Tables 1..N: create missing numbers, leave existing rows alone so
    // relations keep pointing at stable ids.
    let mut table_map: HashMap<i32, i64> = db::tables::list_by_system(&mut *tx, id)
        .await?
        .into_iter()
        .map(|t| (t.table_number, t.id))
        .collect();
    let mut tables_created = 0;
    for table_number in 1..=payload.total_tables as i32 {
        if !table_map.contains_key(&table_number) {
            let table = db::tables::insert(&mut *tx, id, table_number).await?;
            table_map.insert(table.table_number, table.id);
            tables_created += 1;
        }
    }

    let desired = match payload.distribution {
        Some(mode) => distributed_assignments(&persisted_bars, payload.total_tables, mode, &table_map),
        None => explicit_assignments(&payload.assignments, &table_map),
    };

    // Loaded after the bar deletes so cascaded relations are not seen
    // as stale here.
    let existing = db::relations::list_by_system(&mut *tx, id).await?;
    let existing_keys: HashSet<(i64, i64)> =
        existing.iter().map(|r| (r.table_id, r.bar_id)).collect();

    let mut relations_created = 0;
    for &(table_id, bar_id) in &desired {
        if !existing_keys.contains(&(table_id, bar_id)) {
            db::relations::insert(&mut *tx, id, table_id, bar_id).await?;
            relations_created += 1;
        }
    }

    let mut relations_deleted = 0;
    let mut touched_tables: HashSet<i64> = HashSet::new();
    let mut touched_bars: HashSet<i64> = HashSet::new();
    for relation in &existing {
        if !desired.contains(&(relation.table_id, relation.bar_id)) {
            db::relations::delete(&mut *tx, relation.id).await?;
            touched_tables.insert(relation.table_id);
            touched_bars.insert(relation.bar_id);
            relations_deleted += 1;
        }
    }

    // Orphan cleanup: only rows that just lost a relation qualify.
    for table_id in touched_tables {
        if db::relations::count_for_table(&mut *tx, table_id).await? == 0 {
            db::tables::delete(&mut *tx, table_id).await?;
        }
    }
    for bar_id in touched_bars {
        if db::relations::count_for_bar(&mut *tx, bar_id).await? == 0 {
            db::bars::delete(&mut *tx, bar_id).await?;
        }
    }

    tx.commit().await?;

    info!(
        system_id = id,
        bars = persisted_bars.len(),
        tables_created,
        relations_created,
        relations_deleted,
        "topology saved"
    );

    Ok(ok(SaveTopologyOutcome {
        bars: persisted_bars.len(),
        tables_created,
        relations_created,
        relations_deleted,
    }))
}

/// Resolve the explicit assignment list to (table_id, bar_id) pairs.
/// An entry without a bar id is skipped; an entry without a table id
/// resolves positionally against the 1..N table sequence.
fn explicit_assignments(
    entries: &[AssignmentEntry],
    table_map: &HashMap<i32, i64>,
) -> HashSet<(i64, i64)> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let bar_id = entry.bar_id?;
            let table_id = entry
                .table_id
                .or_else(|| table_map.get(&(index as i32 + 1)).copied())?;
            Some((table_id, bar_id))
        })
        .collect()
}

/// Compute assignments over the drink bars with one of the
/// redistribution helpers, then resolve table numbers to ids.
fn distributed_assignments(
    bars: &[Bar],
    total_tables: u32,
    mode: Distribution,
    table_map: &HashMap<i32, i64>,
) -> HashSet<(i64, i64)> {
    let mut refs: Vec<BarRef> = bars
        .iter()
        .filter(|b| b.bar_type == BarType::Bar)
        .map(|b| BarRef {
            bar_number: b.bar_number,
            id: Some(b.id),
        })
        .collect();
    refs.sort_by_key(|b| b.bar_number);

    let assignments = match mode {
        Distribution::Even => even_distribution(&refs, total_tables),
        Distribution::Alternating => alternating_distribution(&refs, total_tables),
    };

    assignments
        .into_iter()
        .filter_map(|a| {
            let table_id = table_map.get(&a.table_number).copied()?;
            Some((table_id, a.bar_id?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_map(n: i32) -> HashMap<i32, i64> {
        (1..=n).map(|i| (i, 100 + i as i64)).collect()
    }

    #[test]
    fn explicit_entries_resolve_positionally() {
        let entries = vec![
            AssignmentEntry {
                table_id: None,
                bar_id: Some(5),
            },
            AssignmentEntry {
                table_id: Some(42),
                bar_id: Some(6),
            },
            AssignmentEntry {
                table_id: None,
                bar_id: None,
            },
        ];

        let desired = explicit_assignments(&entries, &table_map(3));

        // Entry 0 falls back to table number 1; entry 2 has no bar and
        // is skipped.
        assert_eq!(desired.len(), 2);
        assert!(desired.contains(&(101, 5)));
        assert!(desired.contains(&(42, 6)));
    }

    #[test]
    fn explicit_entry_beyond_table_sequence_is_skipped() {
        let entries = vec![
            AssignmentEntry {
                table_id: None,
                bar_id: Some(5),
            },
            AssignmentEntry {
                table_id: None,
                bar_id: Some(5),
            },
        ];

        let desired = explicit_assignments(&entries, &table_map(1));
        assert_eq!(desired.len(), 1);
        assert!(desired.contains(&(101, 5)));
    }

    #[test]
    fn distribution_ignores_kitchens_and_orders_by_bar_number() {
        let bars = vec![
            Bar {
                id: 10,
                system_id: 1,
                bar_number: 2,
                name: "South".into(),
                bar_type: BarType::Bar,
            },
            Bar {
                id: 20,
                system_id: 1,
                bar_number: 1,
                name: "North".into(),
                bar_type: BarType::Bar,
            },
            Bar {
                id: 30,
                system_id: 1,
                bar_number: 1,
                name: "Kitchen".into(),
                bar_type: BarType::Kitchen,
            },
        ];

        let desired =
            distributed_assignments(&bars, 3, Distribution::Alternating, &table_map(3));

        // bar_number 1 (id 20) leads the round-robin.
        assert_eq!(desired.len(), 3);
        assert!(desired.contains(&(101, 20)));
        assert!(desired.contains(&(102, 10)));
        assert!(desired.contains(&(103, 20)));
    }
}
