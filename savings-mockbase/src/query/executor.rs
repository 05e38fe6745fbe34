//! Execution seam between the builder and a backend
//!
//! [`QueryBuilder`](super::QueryBuilder) is backend-agnostic: it records a
//! [`QueryPlan`] and hands it to a [`QueryExecutor`] on a terminal call. The
//! mock executor below runs plans against the in-process [`RecordStore`];
//! a remote backend supplies its own executor.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ErrorCode, MockbaseError};
use crate::filter::Record;
use crate::latency::Latency;
use crate::store::RecordStore;

use super::plan::{Mutation, QueryPlan};

type ExecResult<T> = std::result::Result<T, ApiError>;

/// Runs builder plans. Failures come back as [`ApiError`], never as panics.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Insert every payload row into `table`, returning the stored records
    async fn insert(&self, table: &str, rows: Vec<Value>) -> ExecResult<Vec<Record>>;

    /// Run a select, update, or delete plan, returning the affected rows
    async fn execute(&self, plan: &QueryPlan) -> ExecResult<Vec<Record>>;
}

/// Executes plans against a shared [`RecordStore`] after the simulated latency
#[derive(Debug, Clone)]
pub struct MockExecutor {
    store: Arc<RecordStore>,
    latency: Latency,
    logging: bool,
}

impl MockExecutor {
    pub fn new(store: Arc<RecordStore>, latency: Latency, logging: bool) -> Self {
        Self {
            store,
            latency,
            logging,
        }
    }

    fn log(&self, op: &str, table: &str, count: usize) {
        if self.logging {
            info!(op, table, count, "Mock query executed");
        }
    }

    fn run_plan(&self, plan: &QueryPlan) -> crate::error::Result<Vec<Record>> {
        let rows = match &plan.mutation {
            Some(Mutation::Delete) => self.store.delete(&plan.table, &plan.filters),
            Some(Mutation::Update(patch)) => {
                let Value::Object(patch) = patch else {
                    return Err(MockbaseError::InvalidPatch(json_kind(patch)));
                };
                self.store.update(&plan.table, &plan.filters, patch)
            }
            None => self
                .store
                .query(&plan.table, &plan.filters, &plan.query_options()),
        };
        let op = plan.mutation.as_ref().map_or("SELECT", Mutation::op_name);
        self.log(op, &plan.table, rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn insert(&self, table: &str, rows: Vec<Value>) -> ExecResult<Vec<Record>> {
        self.latency.simulate().await;

        let records = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => Ok(map),
                other => Err(MockbaseError::NotAnObject {
                    table: table.to_string(),
                    kind: json_kind(&other),
                }),
            })
            .collect::<crate::error::Result<Vec<Record>>>()
            .map_err(|e| ApiError::from_internal(ErrorCode::Insert, &e))?;

        let inserted = isolate(ErrorCode::Insert, || Ok(self.store.insert_many(table, records)))?;
        self.log("INSERT", table, inserted.len());
        Ok(inserted)
    }

    async fn execute(&self, plan: &QueryPlan) -> ExecResult<Vec<Record>> {
        self.latency.simulate().await;
        isolate(ErrorCode::Query, || self.run_plan(plan))
    }
}

/// Run a synchronous store phase, turning errors and panics into `code`
fn isolate<T>(
    code: ErrorCode,
    f: impl FnOnce() -> crate::error::Result<T>,
) -> ExecResult<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(ApiError::from_internal(code, &err)),
        Err(panic) => {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "store operation panicked".to_string());
            Err(ApiError::from_internal(code, &MockbaseError::Internal(message)))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TableSet;
    use serde_json::json;

    fn executor() -> MockExecutor {
        MockExecutor::new(Arc::new(RecordStore::new(TableSet::new())), Latency::none(), false)
    }

    #[tokio::test]
    async fn test_non_object_row_is_insert_error() {
        let exec = executor();
        let err = exec
            .insert("goals", vec![json!({"title": "ok"}), json!(42)])
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Insert);
        // Batch rejected as a whole
        assert!(exec.store.get_table("goals").is_empty());
    }

    #[tokio::test]
    async fn test_non_object_patch_is_query_error() {
        let exec = executor();
        let mut plan = QueryPlan::new("goals");
        plan.set_mutation(Mutation::Update(json!("title")));
        let err = exec.execute(&plan).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Query);
    }

    #[test]
    fn test_isolate_converts_panics() {
        let err = isolate::<()>(ErrorCode::Query, || panic!("corrupt table")).unwrap_err();
        assert_eq!(err.code, ErrorCode::Query);
        assert!(err.message.contains("corrupt table"));
    }
}
