use crate::errors::CfError;
use crate::mutation::Mutator;
use crate::serializers::{HasSerializer, SharedSerializer};
use crate::template::factory::{ColumnFactory, DefaultColumnFactory};

/// Stateless column writes against one column family.
///
/// Every call names its target row key, so one writer can be shared between
/// threads as long as each drives its own mutator.
pub struct ColumnWriter<'a, N, F = DefaultColumnFactory> {
    column_family: &'a str,
    top_serializer: &'a SharedSerializer<N>,
    factory: &'a F,
}

impl<N, F> Clone for ColumnWriter<'_, N, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N, F> Copy for ColumnWriter<'_, N, F> {}

impl<'a, N, F: ColumnFactory> ColumnWriter<'a, N, F> {
    pub fn new(
        column_family: &'a str,
        top_serializer: &'a SharedSerializer<N>,
        factory: &'a F,
    ) -> Self {
        Self {
            column_family,
            top_serializer,
            factory,
        }
    }

    pub fn column_family(&self) -> &'a str {
        self.column_family
    }

    pub fn top_serializer(&self) -> &'a SharedSerializer<N> {
        self.top_serializer
    }

    pub fn insert<K, V, M>(
        &self,
        mutator: &mut M,
        key: K,
        name: N,
        value: V,
        value_serializer: SharedSerializer<V>,
    ) -> Result<(), CfError>
    where
        M: Mutator<K, N>,
    {
        let column =
            self.factory
                .create_column(name, value, self.top_serializer.clone(), value_serializer);
        mutator.add_insertion(key, self.column_family, column)
    }

    /// Insert using the value type's default serializer
    pub fn set<K, V, M>(&self, mutator: &mut M, key: K, name: N, value: V) -> Result<(), CfError>
    where
        V: HasSerializer,
        M: Mutator<K, N>,
    {
        self.insert(mutator, key, name, value, V::serializer())
    }

    pub fn delete_column<K, M>(&self, mutator: &mut M, key: K, name: N) -> Result<(), CfError>
    where
        M: Mutator<K, N>,
    {
        mutator.add_deletion(
            key,
            self.column_family,
            name,
            self.top_serializer,
            self.factory.clock(),
        )
    }

    pub fn delete_row<K, M>(&self, mutator: &mut M, key: K) -> Result<(), CfError>
    where
        M: Mutator<K, N>,
    {
        mutator.add_row_deletion(key, self.column_family, self.factory.clock())
    }
}
