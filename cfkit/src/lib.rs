//! Typed row updates for column-family stores.
//!
//! A [`ColumnFamilyTemplate`] owns a mutation batch for one column family.
//! Callers pick a row key and issue typed column writes through a
//! [`ColumnFamilyUpdater`] (or the stateless [`ColumnWriter`]), which turns
//! each write into a serialized insertion or deletion on the batch. Batches
//! are handed to a [`MutationExecutor`] when the template flushes.

pub mod config;
pub mod errors;
pub mod metrics;
pub mod mutation;
pub mod serializers;
pub mod template;
pub mod types;

pub use errors::CfError;
pub use mutation::{BatchMutator, InMemoryExecutor, MutationExecutor, MutationResult, Mutator};
pub use serializers::{HasSerializer, Serializer, SharedSerializer};
pub use template::{ColumnFamilyTemplate, ColumnFamilyUpdater, ColumnWriter, RowUpdater};
pub use types::{ByteColumn, Column, ComparatorType, Mutation, MutationBatch, MutationOp};
