use lazy_static::lazy_static;

use super::{fixed_width, Serializer, SharedSerializer};
use crate::errors::CfError;
use crate::types::ComparatorType;

lazy_static! {
    static ref INSTANCE: SharedSerializer<bool> = std::sync::Arc::new(BooleanSerializer);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanSerializer;

impl BooleanSerializer {
    pub fn get() -> SharedSerializer<bool> {
        INSTANCE.clone()
    }
}

impl Serializer<bool> for BooleanSerializer {
    fn to_bytes(&self, value: &bool) -> Result<Vec<u8>, CfError> {
        Ok(vec![u8::from(*value)])
    }

    // any non-zero byte reads as true
    fn from_bytes(&self, bytes: &[u8]) -> Result<bool, CfError> {
        let [byte] = fixed_width::<1>("Boolean", bytes)?;
        Ok(byte != 0)
    }

    fn comparator_type(&self) -> ComparatorType {
        ComparatorType::BooleanType
    }
}
