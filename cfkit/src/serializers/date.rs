use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;

use super::{fixed_width, Serializer, SharedSerializer};
use crate::errors::CfError;
use crate::types::ComparatorType;

lazy_static! {
    static ref INSTANCE: SharedSerializer<DateTime<Utc>> = std::sync::Arc::new(DateSerializer);
}

/// Milliseconds since the Unix epoch as an 8-byte big-endian long.
/// Sub-millisecond precision is dropped on encode.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateSerializer;

impl DateSerializer {
    pub fn get() -> SharedSerializer<DateTime<Utc>> {
        INSTANCE.clone()
    }
}

impl Serializer<DateTime<Utc>> for DateSerializer {
    fn to_bytes(&self, value: &DateTime<Utc>) -> Result<Vec<u8>, CfError> {
        Ok(value.timestamp_millis().to_be_bytes().to_vec())
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<DateTime<Utc>, CfError> {
        let millis = i64::from_be_bytes(fixed_width::<8>("Date", bytes)?);
        Utc.timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| CfError::Serialization(format!("Date out of range: {}ms", millis)))
    }

    fn comparator_type(&self) -> ComparatorType {
        ComparatorType::DateType
    }
}
