//! Chainable query builder
//!
//! ```rust,ignore
//! let goals = client
//!     .from("goals")
//!     .select("id, title, current_amount")
//!     .eq("user_id", "active-user-001")
//!     .order("created_at", OrderOptions::desc())
//!     .limit(5)
//!     .await;
//! ```

use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::error::ApiError;
use crate::filter::{FilterOp, Record};
use crate::response::{Inserted, Response};

use super::executor::QueryExecutor;
use super::plan::{Mutation, OrderOptions, QueryPlan};

/// Accumulates filters, ordering, projection and a mutation for one table.
///
/// Chain methods consume and return the builder. Nothing touches the store
/// until a terminal call: [`insert`](Self::insert), [`single`](Self::single),
/// [`maybe_single`](Self::maybe_single), [`execute`](Self::execute), or
/// awaiting the builder directly.
pub struct QueryBuilder {
    executor: Arc<dyn QueryExecutor>,
    plan: QueryPlan,
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            plan: QueryPlan::new(table),
        }
    }

    pub fn plan(&self) -> &QueryPlan {
        &self.plan
    }

    // ─── Chain methods ───

    /// Comma-separated projection; `"*"` or `""` keeps every column
    pub fn select(mut self, columns: &str) -> Self {
        self.plan.set_columns(columns);
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn neq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Neq, value)
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Gt, value)
    }

    pub fn gte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    pub fn lt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Lt, value)
    }

    pub fn lte(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter(column, FilterOp::Lte, value)
    }

    /// Append an arbitrary filter; every filter must match (AND)
    pub fn filter(mut self, column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        self.plan.push_filter(column.into(), op, value.into());
        self
    }

    pub fn order(mut self, column: impl Into<String>, options: OrderOptions) -> Self {
        self.plan.order = Some((column.into(), options));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.plan.limit = Some(count);
        self
    }

    /// Mark as an update; the patch must be a JSON object
    pub fn update(mut self, patch: impl Into<Value>) -> Self {
        self.plan.set_mutation(Mutation::Update(patch.into()));
        self
    }

    pub fn delete(mut self) -> Self {
        self.plan.set_mutation(Mutation::Delete);
        self
    }

    // ─── Terminals ───

    /// Insert one object or an array of objects. Filters on the chain are ignored.
    pub async fn insert(self, data: impl Into<Value>) -> Response<Inserted> {
        let (rows, batch) = match data.into() {
            Value::Array(rows) => (rows, true),
            other => (vec![other], false),
        };

        match self.executor.insert(&self.plan.table, rows).await {
            Ok(records) if batch => Response::ok(Inserted::Many(records)),
            Ok(records) => match records.into_iter().next() {
                Some(record) => Response::ok(Inserted::One(record)),
                None => Response::empty(),
            },
            Err(err) => Response::err(err),
        }
    }

    /// Exactly one row, otherwise a `PGRST116` error.
    ///
    /// An update or delete still applies when the cardinality check fails.
    pub async fn single(self) -> Response<Record> {
        match self.run_single().await {
            Ok(Some(record)) => Response::ok(record),
            Ok(None) => Response::err(ApiError::not_found()),
            Err(err) => Response::err(err),
        }
    }

    /// Zero or one row; zero yields `{data: None, error: None}`
    pub async fn maybe_single(self) -> Response<Record> {
        match self.run_single().await {
            Ok(Some(record)) => Response::ok(record),
            Ok(None) => Response::empty(),
            Err(err) => Response::err(err),
        }
    }

    /// All matching rows (selected, updated, or deleted)
    pub async fn execute(self) -> Response<Vec<Record>> {
        match self.executor.execute(&self.plan).await {
            Ok(rows) => Response::ok(rows),
            Err(err) => Response::err(err),
        }
    }

    async fn run_single(self) -> std::result::Result<Option<Record>, ApiError> {
        let mut rows = self.executor.execute(&self.plan).await?;
        if rows.len() > 1 {
            return Err(ApiError::multiple_found());
        }
        Ok(rows.pop())
    }
}

impl IntoFuture for QueryBuilder {
    type Output = Response<Vec<Record>>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.execute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::Latency;
    use crate::query::MockExecutor;
    use crate::store::{RecordStore, TableSet};
    use serde_json::json;

    fn builder(table: &str) -> QueryBuilder {
        let store = Arc::new(RecordStore::new(TableSet::new()));
        QueryBuilder::new(table, Arc::new(MockExecutor::new(store, Latency::none(), false)))
    }

    #[test]
    fn test_chain_records_plan() {
        let qb = builder("goals")
            .select("id,title")
            .eq("user_id", "u1")
            .gte("current_amount", 10)
            .order("created_at", OrderOptions::desc())
            .limit(3);

        let plan = qb.plan();
        assert_eq!(plan.table, "goals");
        assert_eq!(plan.filters.len(), 2);
        assert_eq!(plan.filters[1].op, FilterOp::Gte);
        assert_eq!(plan.order, Some(("created_at".to_string(), OrderOptions::desc())));
        assert_eq!(plan.limit, Some(3));
        assert!(plan.mutation.is_none());
    }

    #[tokio::test]
    async fn test_insert_shape_follows_payload() {
        let one = builder("goals").insert(json!({"title": "Rent"})).await;
        assert!(matches!(one.data, Some(Inserted::One(_))));

        let many = builder("goals").insert(json!([{"a": 1}, {"a": 2}])).await;
        assert!(matches!(many.data, Some(Inserted::Many(ref rows)) if rows.len() == 2));
    }

    #[tokio::test]
    async fn test_single_on_empty_table() {
        let resp = builder("goals").single().await;
        assert_eq!(resp.error, Some(ApiError::not_found()));

        let resp = builder("goals").maybe_single().await;
        assert!(resp.data.is_none() && resp.error.is_none());
    }

    #[tokio::test]
    async fn test_awaiting_builder_executes() {
        let resp = builder("goals").select("*").await;
        assert_eq!(resp.data, Some(vec![]));
    }
}
