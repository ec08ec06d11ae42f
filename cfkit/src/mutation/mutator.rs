use tracing::{debug, warn};

use crate::errors::CfError;
use crate::metrics;
use crate::serializers::SharedSerializer;
use crate::types::{Column, Mutation, MutationBatch, MutationOp};

/// Accumulates insertions and deletions to be submitted together
pub trait Mutator<K, N> {
    fn add_insertion<V>(
        &mut self,
        key: K,
        column_family: &str,
        column: Column<N, V>,
    ) -> Result<(), CfError>;

    fn add_deletion(
        &mut self,
        key: K,
        column_family: &str,
        column_name: N,
        name_serializer: &SharedSerializer<N>,
        clock: i64,
    ) -> Result<(), CfError>;

    fn add_row_deletion(&mut self, key: K, column_family: &str, clock: i64)
        -> Result<(), CfError>;
}

/// Serializes each mutation as it is queued and keeps them in call order
pub struct BatchMutator<K> {
    key_serializer: SharedSerializer<K>,
    mutations: Vec<Mutation>,
    max_batch_size: Option<usize>,
    metrics_enabled: bool,
}

impl<K> BatchMutator<K> {
    pub fn new(key_serializer: SharedSerializer<K>) -> Self {
        Self {
            key_serializer,
            mutations: Vec::new(),
            max_batch_size: None,
            metrics_enabled: true,
        }
    }

    pub fn with_max_batch_size(mut self, limit: Option<usize>) -> Self {
        self.max_batch_size = limit;
        self
    }

    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.metrics_enabled = enabled;
        self
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled
    }

    pub fn key_serializer(&self) -> &SharedSerializer<K> {
        &self.key_serializer
    }

    pub fn pending(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn discard(&mut self) {
        if !self.mutations.is_empty() {
            debug!("Discarding {} pending mutations", self.mutations.len());
        }
        self.mutations.clear();
    }

    /// Drop everything queued after the first `len` mutations
    pub fn truncate(&mut self, len: usize) {
        self.mutations.truncate(len);
    }

    /// Take all pending mutations, leaving the mutator empty
    pub fn take_batch(&mut self) -> MutationBatch {
        MutationBatch {
            mutations: std::mem::take(&mut self.mutations),
        }
    }

    fn push(&mut self, key: &K, column_family: &str, op: MutationOp) -> Result<(), CfError> {
        if let Some(limit) = self.max_batch_size {
            if self.mutations.len() >= limit {
                warn!("Mutation batch for {} is full ({} mutations)", column_family, limit);
                return Err(CfError::BatchFull { limit });
            }
        }

        let key = self.key_serializer.to_bytes(key)?;
        debug!(
            column_family,
            op = op.label(),
            key_len = key.len(),
            "Queued mutation"
        );
        if self.metrics_enabled {
            metrics::record_mutation(column_family, op.label());
        }

        self.mutations.push(Mutation {
            key,
            column_family: column_family.to_string(),
            op,
        });
        Ok(())
    }
}

impl<K, N> Mutator<K, N> for BatchMutator<K> {
    fn add_insertion<V>(
        &mut self,
        key: K,
        column_family: &str,
        column: Column<N, V>,
    ) -> Result<(), CfError> {
        let column = column.to_bytes()?;
        self.push(&key, column_family, MutationOp::Insert(column))
    }

    fn add_deletion(
        &mut self,
        key: K,
        column_family: &str,
        column_name: N,
        name_serializer: &SharedSerializer<N>,
        clock: i64,
    ) -> Result<(), CfError> {
        let name = name_serializer.to_bytes(&column_name)?;
        self.push(&key, column_family, MutationOp::DeleteColumn { name, clock })
    }

    fn add_row_deletion(
        &mut self,
        key: K,
        column_family: &str,
        clock: i64,
    ) -> Result<(), CfError> {
        self.push(&key, column_family, MutationOp::DeleteRow { clock })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializers::{IntegerSerializer, LongSerializer, Serializer, StringSerializer};
    use crate::types::ComparatorType;

    fn column(name: &str, value: i64, clock: i64) -> Column<String, i64> {
        Column {
            name: name.to_string(),
            value,
            name_serializer: StringSerializer::get(),
            value_serializer: LongSerializer::get(),
            clock,
            ttl: None,
        }
    }

    #[test]
    fn test_insertion_is_serialized_in_order() {
        let mut mutator = BatchMutator::new(StringSerializer::get());
        mutator
            .add_insertion("row1".to_string(), "Users", column("age", 30, 10))
            .unwrap();
        mutator
            .add_insertion("row2".to_string(), "Users", column("age", 31, 11))
            .unwrap();

        assert_eq!(mutator.pending(), 2);
        let first = &mutator.mutations()[0];
        assert_eq!(first.key, b"row1".to_vec());
        assert_eq!(first.column_family, "Users");
        match &first.op {
            MutationOp::Insert(col) => {
                assert_eq!(col.name, b"age".to_vec());
                assert_eq!(col.value, 30i64.to_be_bytes().to_vec());
                assert_eq!(col.clock, 10);
                assert_eq!(col.value_type, ComparatorType::LongType);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn test_deletions() {
        let mut mutator = BatchMutator::new(IntegerSerializer::get());
        let names: SharedSerializer<String> = StringSerializer::get();
        mutator
            .add_deletion(7, "Users", "email".to_string(), &names, 5)
            .unwrap();
        Mutator::<i32, String>::add_row_deletion(&mut mutator, 8, "Users", 6).unwrap();

        let batch = mutator.take_batch();
        assert!(mutator.is_empty());
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.mutations[0].key, IntegerSerializer.to_bytes(&7).unwrap());
        assert_eq!(
            batch.mutations[0].op,
            MutationOp::DeleteColumn {
                name: b"email".to_vec(),
                clock: 5
            }
        );
        assert_eq!(batch.mutations[1].op, MutationOp::DeleteRow { clock: 6 });
    }

    #[test]
    fn test_batch_limit() {
        let mut mutator = BatchMutator::new(StringSerializer::get()).with_max_batch_size(Some(1));
        mutator
            .add_insertion("a".to_string(), "Users", column("x", 1, 1))
            .unwrap();
        let err = mutator
            .add_insertion("a".to_string(), "Users", column("y", 2, 1))
            .unwrap_err();

        assert_eq!(err, CfError::BatchFull { limit: 1 });
        assert_eq!(mutator.pending(), 1);
    }

    fn queued_counter(column_family: &str, op: &str) -> u64 {
        metrics::MUTATION_COUNTER
            .with_label_values(&[column_family, op])
            .get()
    }

    #[test]
    fn test_mutation_counter_respects_metrics_flag() {
        let mut counted = BatchMutator::new(StringSerializer::get());
        counted
            .add_insertion("a".to_string(), "CountedUsers", column("x", 1, 1))
            .unwrap();
        assert_eq!(queued_counter("CountedUsers", "insert"), 1);

        let mut silent = BatchMutator::new(StringSerializer::get()).with_metrics(false);
        assert!(!silent.metrics_enabled());
        silent
            .add_insertion("a".to_string(), "SilentUsers", column("x", 1, 1))
            .unwrap();
        Mutator::<String, String>::add_row_deletion(&mut silent, "a".to_string(), "SilentUsers", 2)
            .unwrap();

        assert_eq!(silent.pending(), 2);
        assert_eq!(queued_counter("SilentUsers", "insert"), 0);
        assert_eq!(queued_counter("SilentUsers", "delete_row"), 0);
    }

    #[test]
    fn test_discard_and_truncate() {
        let mut mutator = BatchMutator::new(StringSerializer::get());
        for i in 0..3 {
            mutator
                .add_insertion("a".to_string(), "Users", column("x", i, i))
                .unwrap();
        }
        mutator.truncate(1);
        assert_eq!(mutator.pending(), 1);
        mutator.discard();
        assert!(mutator.is_empty());
        assert!(mutator.take_batch().is_empty());
    }
}
