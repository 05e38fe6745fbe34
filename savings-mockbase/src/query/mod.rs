//! Query facade: chainable builder, plan, and execution seam

mod builder;
mod executor;
mod plan;

pub use builder::QueryBuilder;
pub use executor::{MockExecutor, QueryExecutor};
pub use plan::{Mutation, OrderOptions, QueryPlan};
