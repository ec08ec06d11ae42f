pub mod executor;
pub mod mutator;
pub mod query_builder;

pub use executor::{ExecutorStats, InMemoryExecutor, MutationExecutor, MutationResult, StoredCell};
pub use mutator::{BatchMutator, Mutator};
pub use query_builder::QueryBuilder;
