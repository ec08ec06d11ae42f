use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::errors::CfError;
use crate::mutation::{BatchMutator, Mutator};
use crate::serializers::{HasSerializer, SharedSerializer};
use crate::template::factory::{ColumnFactory, DefaultColumnFactory};
use crate::template::writer::ColumnWriter;

/// Updates a row, most likely with the contents of an object.
///
/// Keys are appended with [`add_key`](Self::add_key) and every setter writes
/// to the most recently added key. Columns are built by the writer's factory
/// and queued on a mutator borrowed from the owning template, so nothing is
/// executed here. The updater holds a mutable borrow for its whole life and
/// cannot be shared; use [`ColumnWriter`] directly for explicit-key writes.
pub struct ColumnFamilyUpdater<'a, K, N, M = BatchMutator<K>, F = DefaultColumnFactory> {
    writer: ColumnWriter<'a, N, F>,
    mutator: &'a mut M,
    keys: Vec<K>,
}

impl<'a, K, N, M, F> ColumnFamilyUpdater<'a, K, N, M, F>
where
    K: Clone,
    M: Mutator<K, N>,
    F: ColumnFactory,
{
    pub fn new(writer: ColumnWriter<'a, N, F>, mutator: &'a mut M) -> Self {
        Self {
            writer,
            mutator,
            keys: Vec::new(),
        }
    }

    pub fn add_key(&mut self, key: K) -> &mut Self {
        self.keys.push(key);
        self
    }

    /// The most recently added key
    pub fn current_key(&self) -> Option<&K> {
        self.keys.last()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn column_family(&self) -> &'a str {
        self.writer.column_family()
    }

    fn target(&self) -> Result<K, CfError> {
        match self.keys.last() {
            Some(key) => Ok(key.clone()),
            None => {
                warn!(
                    "Column write on {} before any row key was added",
                    self.writer.column_family()
                );
                Err(CfError::NoCurrentKey)
            }
        }
    }

    pub fn set<V: HasSerializer>(&mut self, name: N, value: V) -> Result<(), CfError> {
        self.set_with(name, value, V::serializer())
    }

    pub fn set_with<V>(
        &mut self,
        name: N,
        value: V,
        serializer: SharedSerializer<V>,
    ) -> Result<(), CfError> {
        let key = self.target()?;
        self.writer.insert(&mut *self.mutator, key, name, value, serializer)
    }

    pub fn delete_column(&mut self, name: N) -> Result<(), CfError> {
        let key = self.target()?;
        self.writer.delete_column(&mut *self.mutator, key, name)
    }

    pub fn set_string(&mut self, name: N, value: impl Into<String>) -> Result<(), CfError> {
        self.set(name, value.into())
    }

    pub fn set_uuid(&mut self, name: N, value: Uuid) -> Result<(), CfError> {
        self.set(name, value)
    }

    pub fn set_long(&mut self, name: N, value: i64) -> Result<(), CfError> {
        self.set(name, value)
    }

    pub fn set_integer(&mut self, name: N, value: i32) -> Result<(), CfError> {
        self.set(name, value)
    }

    pub fn set_boolean(&mut self, name: N, value: bool) -> Result<(), CfError> {
        self.set(name, value)
    }

    pub fn set_byte_array(&mut self, name: N, value: impl Into<Vec<u8>>) -> Result<(), CfError> {
        self.set(name, value.into())
    }

    pub fn set_date(&mut self, name: N, value: DateTime<Utc>) -> Result<(), CfError> {
        self.set(name, value)
    }
}

/// Hook run by the template against a fresh updater.
///
/// The default does nothing.
pub trait RowUpdater<K, N, F = DefaultColumnFactory> {
    fn update(
        &self,
        _updater: &mut ColumnFamilyUpdater<'_, K, N, BatchMutator<K>, F>,
    ) -> Result<(), CfError> {
        Ok(())
    }
}
