//! RecordStore — in-memory multi-table record repository
//!
//! Tables are ordered sequences of schema-less records, created lazily on
//! first insert. Every operation takes the store-wide lock for its whole
//! synchronous phase, so mutations are atomic with respect to each other.
//!
//! # Example
//!
//! ```rust
//! use savings_mockbase::filter::Filter;
//! use savings_mockbase::store::{QueryOptions, RecordStore, TableSet};
//! use serde_json::json;
//!
//! let store = RecordStore::new(TableSet::new());
//! let goal = store.insert("goals", json!({"title": "Rent"}).as_object().cloned().unwrap());
//!
//! let found = store.query("goals", &[Filter::eq("title", "Rent")], &QueryOptions::default());
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0]["id"], goal["id"]);
//! ```

use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::Mutex;
use rand::Rng;
use serde_json::Value;
use tracing::debug;

use crate::filter::{matches_all, sort_cmp, Filter, Record};

/// Full table set: table name → ordered records
pub type TableSet = IndexMap<String, Vec<Record>>;

/// Projection marker meaning "all columns"
pub const WILDCARD: &str = "*";

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Sort, limit, and projection applied after filtering
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub sort_column: Option<String>,
    pub ascending: bool,
    pub limit: Option<usize>,
    pub columns: Option<Vec<String>>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            sort_column: None,
            ascending: true,
            limit: None,
            columns: None,
        }
    }
}

impl QueryOptions {
    pub fn sorted(column: impl Into<String>, ascending: bool) -> Self {
        Self {
            sort_column: Some(column.into()),
            ascending,
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}

/// In-memory record store seeded from an immutable snapshot
///
/// Thread-safe: share across tokio tasks via `Arc<RecordStore>`.
#[derive(Debug)]
pub struct RecordStore {
    seed: TableSet,
    tables: Mutex<TableSet>,
    last_millis: AtomicI64,
}

impl RecordStore {
    /// Create a store whose initial and reset state is `seed`
    pub fn new(seed: TableSet) -> Self {
        let tables = seed.clone();
        Self {
            seed,
            tables: Mutex::new(tables),
            last_millis: AtomicI64::new(0),
        }
    }

    /// Current records of `table`; empty if the table was never created
    pub fn get_table(&self, table: &str) -> Vec<Record> {
        self.tables.lock().get(table).cloned().unwrap_or_default()
    }

    /// Names of all tables that currently exist
    pub fn table_names(&self) -> Vec<String> {
        self.tables.lock().keys().cloned().collect()
    }

    /// Insert one record, assigning a fresh `id` (any caller-supplied id is overwritten)
    pub fn insert(&self, table: &str, record: Record) -> Record {
        let mut tables = self.tables.lock();
        self.insert_locked(&mut tables, table, record)
    }

    /// Insert a batch of records under a single lock acquisition
    pub fn insert_many(&self, table: &str, records: Vec<Record>) -> Vec<Record> {
        let mut tables = self.tables.lock();
        records
            .into_iter()
            .map(|record| self.insert_locked(&mut tables, table, record))
            .collect()
    }

    fn insert_locked(&self, tables: &mut TableSet, table: &str, mut record: Record) -> Record {
        let rows = tables.entry(table.to_string()).or_default();
        let id = loop {
            let candidate = self.generate_id(table);
            if !rows.iter().any(|r| r.get("id").and_then(Value::as_str) == Some(candidate.as_str())) {
                break candidate;
            }
        };
        record.insert("id".to_string(), Value::String(id));
        rows.push(record.clone());
        debug!(table, "Inserted record");
        record
    }

    /// Shallow-merge `patch` into every record matching `filters`.
    ///
    /// Returns the matched records after mutation; empty when nothing matches.
    pub fn update(&self, table: &str, filters: &[Filter], patch: &Record) -> Vec<Record> {
        let mut tables = self.tables.lock();
        let Some(rows) = tables.get_mut(table) else {
            return Vec::new();
        };

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|r| matches_all(r, filters)) {
            for (key, value) in patch {
                row.insert(key.clone(), value.clone());
            }
            updated.push(row.clone());
        }
        debug!(table, count = updated.len(), "Updated records");
        updated
    }

    /// Remove every record matching `filters`, returning the removed records
    pub fn delete(&self, table: &str, filters: &[Filter]) -> Vec<Record> {
        let mut tables = self.tables.lock();
        let Some(rows) = tables.get_mut(table) else {
            return Vec::new();
        };

        let (removed, kept): (Vec<Record>, Vec<Record>) = std::mem::take(rows)
            .into_iter()
            .partition(|r| matches_all(r, filters));
        *rows = kept;
        debug!(table, count = removed.len(), "Deleted records");
        removed
    }

    /// Evaluate filter → sort → limit → projection, in that order
    pub fn query(&self, table: &str, filters: &[Filter], options: &QueryOptions) -> Vec<Record> {
        let mut results: Vec<Record> = {
            let tables = self.tables.lock();
            tables
                .get(table)
                .map(|rows| {
                    rows.iter()
                        .filter(|r| matches_all(r, filters))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some(column) = &options.sort_column {
            // `sort_by` is stable: ties keep insertion order
            results.sort_by(|a, b| {
                let ord = sort_cmp(a.get(column), b.get(column));
                if options.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        if let Some(limit) = options.limit {
            results.truncate(limit);
        }

        match &options.columns {
            Some(columns) if !columns.is_empty() && !columns.iter().any(|c| c == WILDCARD) => {
                results.iter().map(|r| project(r, columns)).collect()
            }
            _ => results,
        }
    }

    /// Restore every table to a fresh copy of the seed snapshot
    pub fn reset(&self) {
        *self.tables.lock() = self.seed.clone();
        debug!("Store reset to seed snapshot");
    }

    /// Deep copy of the whole current table set
    pub fn get_state(&self) -> TableSet {
        self.tables.lock().clone()
    }

    /// `<table>-<millis>-<suffix>`; millis never go backwards within one store
    fn generate_id(&self, table: &str) -> String {
        let now = Utc::now().timestamp_millis();
        let prev = self.last_millis.fetch_max(now, AtomicOrdering::SeqCst);
        let millis = prev.max(now);

        let mut rng = rand::rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
            .collect();
        format!("{table}-{millis}-{suffix}")
    }
}

fn project(record: &Record, columns: &[String]) -> Record {
    let mut out = Record::new();
    if let Some(id) = record.get("id") {
        out.insert("id".to_string(), id.clone());
    }
    for column in columns {
        if let Some(value) = record.get(column) {
            out.insert(column.clone(), value.clone());
        }
    }
    out
}
