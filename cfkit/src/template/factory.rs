use chrono::Utc;

use crate::serializers::SharedSerializer;
use crate::types::Column;

/// Builds columns from a name, a value and their serializers
pub trait ColumnFactory: Send + Sync {
    fn create_column<N, V>(
        &self,
        name: N,
        value: V,
        name_serializer: SharedSerializer<N>,
        value_serializer: SharedSerializer<V>,
    ) -> Column<N, V>;

    /// Clock used for deletions issued alongside created columns
    fn clock(&self) -> i64;
}

/// Stamps columns with the current time in microseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultColumnFactory {
    ttl: Option<i32>,
}

impl DefaultColumnFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Option<i32>) -> Self {
        Self { ttl }
    }
}

impl ColumnFactory for DefaultColumnFactory {
    fn create_column<N, V>(
        &self,
        name: N,
        value: V,
        name_serializer: SharedSerializer<N>,
        value_serializer: SharedSerializer<V>,
    ) -> Column<N, V> {
        Column {
            name,
            value,
            name_serializer,
            value_serializer,
            clock: self.clock(),
            ttl: self.ttl,
        }
    }

    fn clock(&self) -> i64 {
        Utc::now().timestamp_micros()
    }
}

/// Stamps every column with the same clock
#[derive(Debug, Clone, Copy)]
pub struct FixedClockColumnFactory {
    pub clock: i64,
    pub ttl: Option<i32>,
}

impl FixedClockColumnFactory {
    pub fn new(clock: i64) -> Self {
        Self { clock, ttl: None }
    }
}

impl ColumnFactory for FixedClockColumnFactory {
    fn create_column<N, V>(
        &self,
        name: N,
        value: V,
        name_serializer: SharedSerializer<N>,
        value_serializer: SharedSerializer<V>,
    ) -> Column<N, V> {
        Column {
            name,
            value,
            name_serializer,
            value_serializer,
            clock: self.clock,
            ttl: self.ttl,
        }
    }

    fn clock(&self) -> i64 {
        self.clock
    }
}
