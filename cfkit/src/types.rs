use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::CfError;
use crate::serializers::Serializer;

/// Cassandra validator class an encoding corresponds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparatorType {
    UTF8Type,
    UUIDType,
    LongType,
    Int32Type,
    BooleanType,
    BytesType,
    DateType,
}

impl ComparatorType {
    pub fn class_name(&self) -> &'static str {
        match self {
            ComparatorType::UTF8Type => "org.apache.cassandra.db.marshal.UTF8Type",
            ComparatorType::UUIDType => "org.apache.cassandra.db.marshal.UUIDType",
            ComparatorType::LongType => "org.apache.cassandra.db.marshal.LongType",
            ComparatorType::Int32Type => "org.apache.cassandra.db.marshal.Int32Type",
            ComparatorType::BooleanType => "org.apache.cassandra.db.marshal.BooleanType",
            ComparatorType::BytesType => "org.apache.cassandra.db.marshal.BytesType",
            ComparatorType::DateType => "org.apache.cassandra.db.marshal.DateType",
        }
    }
}

impl fmt::Display for ComparatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.class_name().rsplit('.').next().unwrap_or_default();
        f.write_str(short)
    }
}

/// A typed column together with the serializers for its name and value
pub struct Column<N, V> {
    pub name: N,
    pub value: V,
    pub name_serializer: Arc<dyn Serializer<N>>,
    pub value_serializer: Arc<dyn Serializer<V>>,
    /// Write timestamp in microseconds since the Unix epoch
    pub clock: i64,
    pub ttl: Option<i32>,
}

impl<N, V> Column<N, V> {
    pub fn name_bytes(&self) -> Result<Vec<u8>, CfError> {
        self.name_serializer.to_bytes(&self.name)
    }

    pub fn value_bytes(&self) -> Result<Vec<u8>, CfError> {
        self.value_serializer.to_bytes(&self.value)
    }

    pub fn to_bytes(&self) -> Result<ByteColumn, CfError> {
        Ok(ByteColumn {
            name: self.name_bytes()?,
            value: self.value_bytes()?,
            clock: self.clock,
            ttl: self.ttl,
            name_type: self.name_serializer.comparator_type(),
            value_type: self.value_serializer.comparator_type(),
        })
    }
}

impl<N: fmt::Debug, V: fmt::Debug> fmt::Debug for Column<N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("name_type", &self.name_serializer.comparator_type())
            .field("value_type", &self.value_serializer.comparator_type())
            .field("clock", &self.clock)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Serialized form of a [`Column`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteColumn {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
    pub clock: i64,
    pub ttl: Option<i32>,
    pub name_type: ComparatorType,
    pub value_type: ComparatorType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOp {
    Insert(ByteColumn),
    DeleteColumn { name: Vec<u8>, clock: i64 },
    DeleteRow { clock: i64 },
}

impl MutationOp {
    pub fn label(&self) -> &'static str {
        match self {
            MutationOp::Insert(_) => "insert",
            MutationOp::DeleteColumn { .. } => "delete_column",
            MutationOp::DeleteRow { .. } => "delete_row",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub key: Vec<u8>,
    pub column_family: String,
    pub op: MutationOp,
}

/// Mutations drained from a mutator, in the order they were queued
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationBatch {
    pub mutations: Vec<Mutation>,
}

impl MutationBatch {
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Number of distinct (column family, key) rows touched
    pub fn row_count(&self) -> usize {
        self.mutations
            .iter()
            .map(|m| (m.column_family.as_str(), m.key.as_slice()))
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn column_families(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for mutation in &self.mutations {
            if !seen.contains(&mutation.column_family.as_str()) {
                seen.push(mutation.column_family.as_str());
            }
        }
        seen
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mutation> {
        self.mutations.iter()
    }
}
