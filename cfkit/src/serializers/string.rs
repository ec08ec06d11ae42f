use lazy_static::lazy_static;

use super::{Serializer, SharedSerializer};
use crate::errors::CfError;
use crate::types::ComparatorType;

lazy_static! {
    static ref INSTANCE: SharedSerializer<String> = std::sync::Arc::new(StringSerializer);
}

/// UTF-8 text
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSerializer;

impl StringSerializer {
    pub fn get() -> SharedSerializer<String> {
        INSTANCE.clone()
    }
}

impl Serializer<String> for StringSerializer {
    fn to_bytes(&self, value: &String) -> Result<Vec<u8>, CfError> {
        Ok(value.as_bytes().to_vec())
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<String, CfError> {
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    fn comparator_type(&self) -> ComparatorType {
        ComparatorType::UTF8Type
    }
}
