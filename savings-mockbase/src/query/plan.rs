//! Accumulated query intent, handed to an executor on a terminal call

use serde_json::Value;

use crate::filter::{Filter, FilterOp};
use crate::store::{QueryOptions, WILDCARD};

/// Sort direction for `order()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderOptions {
    pub ascending: bool,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self { ascending: true }
    }
}

impl OrderOptions {
    pub fn asc() -> Self {
        Self { ascending: true }
    }

    pub fn desc() -> Self {
        Self { ascending: false }
    }
}

/// Mutation marked on a builder.
///
/// Calling both `update()` and `delete()` in one chain is a caller error;
/// `Delete` wins regardless of call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Update(Value),
    Delete,
}

impl Mutation {
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::Update(_) => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// Everything a builder chain has recorded for one table
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub table: String,
    pub filters: Vec<Filter>,
    pub columns: Option<Vec<String>>,
    pub order: Option<(String, OrderOptions)>,
    pub limit: Option<usize>,
    pub mutation: Option<Mutation>,
}

impl QueryPlan {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            columns: None,
            order: None,
            limit: None,
            mutation: None,
        }
    }

    pub(crate) fn push_filter(&mut self, column: String, op: FilterOp, value: Value) {
        self.filters.push(Filter { column, op, value });
    }

    /// `"id, title"` → `["id", "title"]`; empty input selects all columns
    pub(crate) fn set_columns(&mut self, columns: &str) {
        let parsed: Vec<String> = columns
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect();
        self.columns = Some(if parsed.is_empty() {
            vec![WILDCARD.to_string()]
        } else {
            parsed
        });
    }

    pub(crate) fn set_mutation(&mut self, mutation: Mutation) {
        if self.mutation != Some(Mutation::Delete) {
            self.mutation = Some(mutation);
        }
    }

    /// Sort/limit/projection portion in store form
    pub fn query_options(&self) -> QueryOptions {
        let (sort_column, ascending) = match &self.order {
            Some((column, opts)) => (Some(column.clone()), opts.ascending),
            None => (None, true),
        };
        QueryOptions {
            sort_column,
            ascending,
            limit: self.limit,
            columns: self.columns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_trimmed() {
        let mut plan = QueryPlan::new("goals");
        plan.set_columns(" id ,title,, color ");
        assert_eq!(
            plan.columns,
            Some(vec!["id".to_string(), "title".to_string(), "color".to_string()])
        );

        plan.set_columns("");
        assert_eq!(plan.columns, Some(vec![WILDCARD.to_string()]));
    }

    #[test]
    fn test_delete_takes_precedence() {
        let mut plan = QueryPlan::new("goals");
        plan.set_mutation(Mutation::Delete);
        plan.set_mutation(Mutation::Update(serde_json::json!({"title": "x"})));
        assert_eq!(plan.mutation, Some(Mutation::Delete));
    }
}
