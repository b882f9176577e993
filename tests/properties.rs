//! Property-based coverage of the table-level invariants in the
//! specification's testable-properties section: P1 (read-your-writes),
//! P2 (live iff present), P5 (RID stability), and P8 (range scan
//! equivalence to a filtered full scan).

use oursql::table::Table;
use oursql::value::{ColumnDef, ColumnType, Row, Schema, Value};
use proptest::prelude::*;
use std::collections::HashSet;
use tempfile::tempdir;

fn schema() -> Schema {
    Schema::new(vec![
        ColumnDef { name: "id".into(), col_type: ColumnType::Int },
        ColumnDef { name: "val".into(), col_type: ColumnType::Text },
    ])
    .unwrap()
}

fn row(id: i64) -> Row {
    Row::new(vec![
        ("id".into(), Value::Integer(id)),
        ("val".into(), Value::Text(format!("v{id}"))),
    ])
}

fn pk_of(row: &Row) -> i64 {
    row.pk_value(&schema()).unwrap()
}

proptest! {
    #[test]
    fn p1_read_your_writes(pks in prop::collection::vec(-200i64..200, 1..80)) {
        let distinct: Vec<i64> = pks.into_iter().collect::<HashSet<_>>().into_iter().collect();
        let dir = tempdir().unwrap();
        let mut table = Table::open(dir.path(), schema(), 4).unwrap();
        for &pk in &distinct {
            table.insert(row(pk)).unwrap();
        }
        for &pk in &distinct {
            prop_assert_eq!(table.select_by_pk(pk).unwrap(), Some(row(pk)));
        }
    }

    #[test]
    fn p2_live_iff_present(
        ops in prop::collection::vec((-100i64..100, any::<bool>()), 1..200)
    ) {
        let dir = tempdir().unwrap();
        let mut table = Table::open(dir.path(), schema(), 4).unwrap();
        let mut live = HashSet::new();
        for (pk, do_insert) in ops {
            if do_insert {
                if table.insert(row(pk)).is_ok() {
                    live.insert(pk);
                }
            } else if table.delete_by_pk(pk).unwrap() {
                live.remove(&pk);
            }
        }
        for pk in -100..100 {
            let found = table.select_by_pk(pk).unwrap();
            if live.contains(&pk) {
                prop_assert_eq!(found, Some(row(pk)));
            } else {
                prop_assert_eq!(found, None);
            }
        }
    }

    #[test]
    fn p5_rids_stable_across_unrelated_mutations(
        pks in prop::collection::vec(0i64..300, 3..60)
    ) {
        let distinct: Vec<i64> = {
            let mut seen = HashSet::new();
            pks.into_iter().filter(|p| seen.insert(*p)).collect()
        };
        prop_assume!(distinct.len() >= 3);
        let dir = tempdir().unwrap();
        let mut table = Table::open(dir.path(), schema(), 4).unwrap();

        let watched_pk = distinct[0];
        let watched_rid = table.insert(row(watched_pk)).unwrap();
        for &pk in &distinct[1..] {
            table.insert(row(pk)).unwrap();
        }

        // Mutate every other row; the watched row's payload must be
        // unaffected and still reachable through its original rid.
        for &pk in &distinct[1..] {
            table
                .update_by_pk(pk, &[("val".into(), Value::Text("changed".into()))])
                .unwrap();
        }
        for &pk in distinct[1..].iter().step_by(2) {
            table.delete_by_pk(pk).unwrap();
        }

        prop_assert_eq!(table.select_by_pk(watched_pk).unwrap(), Some(row(watched_pk)));
        prop_assert_eq!(table.get_by_rid(watched_rid).unwrap(), row(watched_pk));
    }

    #[test]
    fn p8_range_scan_matches_filtered_full_scan(
        pks in prop::collection::vec(0i64..200, 1..100),
        lo in 0i64..200,
        hi in 0i64..200,
    ) {
        let distinct: Vec<i64> = {
            let mut seen = HashSet::new();
            pks.into_iter().filter(|p| seen.insert(*p)).collect()
        };
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let dir = tempdir().unwrap();
        let mut table = Table::open(dir.path(), schema(), 4).unwrap();
        for &pk in &distinct {
            table.insert(row(pk)).unwrap();
        }

        let mut from_range: Vec<i64> = table
            .range_by_pk(Some(lo), Some(hi), true, true)
            .unwrap()
            .iter()
            .map(pk_of)
            .collect();
        let mut from_scan: Vec<i64> = table
            .select_all()
            .unwrap()
            .into_iter()
            .map(|r| pk_of(&r))
            .filter(|&pk| pk >= lo && pk <= hi)
            .collect();
        from_range.sort();
        from_scan.sort();
        prop_assert_eq!(from_range, from_scan);
    }
}
