//! RecordStore integration tests — filtering, mutation, reset, seed snapshot

use serde_json::{json, Value};

use savings_mockbase::filter::{matches_all, Filter, FilterOp, Record};
use savings_mockbase::schema::{self, ALL_TABLES, TABLE_GOALS, TABLE_TRANSACTIONS};
use savings_mockbase::seed::{SeedData, ACTIVE_USER_ID, POWER_USER_ID};
use savings_mockbase::store::{QueryOptions, RecordStore, TableSet};

fn rec(v: Value) -> Record {
    v.as_object().cloned().unwrap()
}

fn seeded_store() -> RecordStore {
    RecordStore::new(SeedData::generate().to_tables().unwrap())
}

#[test]
fn test_seeded_store_has_every_table() {
    let store = seeded_store();
    assert_eq!(store.table_names(), ALL_TABLES.map(String::from).to_vec());
    assert_eq!(store.get_table(TABLE_GOALS).len(), 8);
}

#[test]
fn test_query_is_conjunction_of_filters() {
    let store = seeded_store();
    let filters = [
        Filter::eq("user_id", POWER_USER_ID),
        Filter::new("current_amount", FilterOp::Gte, 100_000),
    ];

    let rows = store.query(TABLE_GOALS, &filters, &QueryOptions::default());
    let expected: Vec<Record> = store
        .get_table(TABLE_GOALS)
        .into_iter()
        .filter(|r| matches_all(r, &filters))
        .collect();

    assert_eq!(rows, expected);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["user_id"] == POWER_USER_ID));
}

#[test]
fn test_query_result_ignores_insertion_order() {
    let a = RecordStore::new(TableSet::new());
    let b = RecordStore::new(TableSet::new());
    for n in [1, 2, 3, 4] {
        a.insert("t", rec(json!({"n": n, "even": n % 2 == 0})));
    }
    for n in [4, 3, 2, 1] {
        b.insert("t", rec(json!({"n": n, "even": n % 2 == 0})));
    }

    let filters = [Filter::eq("even", true)];
    let pick = |store: &RecordStore| {
        let mut ns: Vec<i64> = store
            .query("t", &filters, &QueryOptions::default())
            .iter()
            .filter_map(|r| r["n"].as_i64())
            .collect();
        ns.sort();
        ns
    };
    assert_eq!(pick(&a), vec![2, 4]);
    assert_eq!(pick(&a), pick(&b));
}

#[test]
fn test_update_touches_only_matched_rows() {
    let store = seeded_store();
    let before = store.get_table(TABLE_GOALS);
    let filters = [Filter::eq("user_id", ACTIVE_USER_ID)];

    let updated = store.update(TABLE_GOALS, &filters, &rec(json!({"status": "paused"})));
    assert_eq!(updated.len(), 3);

    for row in store.query(TABLE_GOALS, &filters, &QueryOptions::default()) {
        assert_eq!(row["status"], "paused");
        assert!(row.contains_key("title"));
    }

    let after = store.get_table(TABLE_GOALS);
    for (old, new) in before.iter().zip(&after) {
        if old["user_id"] != ACTIVE_USER_ID {
            assert_eq!(old, new);
        }
    }
}

#[test]
fn test_delete_removes_exact_subset() {
    let store = seeded_store();
    let total = store.get_table(TABLE_TRANSACTIONS).len();
    let filters = [Filter::eq("user_id", ACTIVE_USER_ID)];

    let removed = store.delete(TABLE_TRANSACTIONS, &filters);
    assert!(!removed.is_empty());
    assert!(store
        .query(TABLE_TRANSACTIONS, &filters, &QueryOptions::default())
        .is_empty());
    assert_eq!(store.get_table(TABLE_TRANSACTIONS).len(), total - removed.len());
}

#[test]
fn test_reset_restores_initial_state() {
    let store = seeded_store();
    let initial = store.get_state();

    store.insert(TABLE_GOALS, rec(json!({"title": "Rent"})));
    store.update(TABLE_GOALS, &[], &rec(json!({"current_amount": 0})));
    store.delete(TABLE_TRANSACTIONS, &[]);
    store.insert("scratch", Record::new());
    assert_ne!(store.get_state(), initial);

    store.reset();
    assert_eq!(store.get_state(), initial);
}

#[test]
fn test_state_is_a_snapshot() {
    let store = seeded_store();
    let mut snapshot = store.get_state();
    snapshot.shift_remove(TABLE_GOALS);
    assert_eq!(store.get_table(TABLE_GOALS).len(), 8);

    let mut rows = store.get_table(TABLE_GOALS);
    rows[0].insert("title".into(), json!("changed"));
    assert_ne!(store.get_table(TABLE_GOALS)[0]["title"], "changed");
}

#[test]
fn test_insert_assigns_unique_ids_per_table() {
    let store = seeded_store();
    let ids: Vec<String> = (0..50)
        .map(|i| {
            store.insert(TABLE_GOALS, rec(json!({"title": format!("goal {i}")})))["id"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.iter().all(|id| id.starts_with("goals-")));
}

#[test]
fn test_seed_rows_decode_into_typed_schema() {
    let store = seeded_store();
    for row in store.get_table(TABLE_GOALS) {
        let goal: schema::Goal = schema::from_record(&row).unwrap();
        assert!(goal.target_amount > 0.0);
    }
}

#[test]
fn test_sort_places_missing_values_last() {
    let store = RecordStore::new(TableSet::new());
    store.insert("t", rec(json!({"name": "b", "rank": 2})));
    store.insert("t", rec(json!({"name": "none"})));
    store.insert("t", rec(json!({"name": "a", "rank": 1})));

    let names = |ascending| -> Vec<String> {
        store
            .query("t", &[], &QueryOptions::sorted("rank", ascending))
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(names(true), vec!["a", "b", "none"]);
    assert_eq!(names(false), vec!["none", "b", "a"]);
}
