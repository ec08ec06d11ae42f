use lazy_static::lazy_static;
use uuid::Uuid;

use super::{fixed_width, Serializer, SharedSerializer};
use crate::errors::CfError;
use crate::types::ComparatorType;

lazy_static! {
    static ref INSTANCE: SharedSerializer<Uuid> = std::sync::Arc::new(UuidSerializer);
}

/// 16 bytes in RFC 4122 order
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSerializer;

impl UuidSerializer {
    pub fn get() -> SharedSerializer<Uuid> {
        INSTANCE.clone()
    }
}

impl Serializer<Uuid> for UuidSerializer {
    fn to_bytes(&self, value: &Uuid) -> Result<Vec<u8>, CfError> {
        Ok(value.as_bytes().to_vec())
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<Uuid, CfError> {
        Ok(Uuid::from_bytes(fixed_width::<16>("UUID", bytes)?))
    }

    fn comparator_type(&self) -> ComparatorType {
        ComparatorType::UUIDType
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_order() {
        let id = Uuid::parse_str("00112233-4455-6677-8899-aabbccddeeff").unwrap();
        let bytes = UuidSerializer.to_bytes(&id).unwrap();
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[15], 0xff);
        assert_eq!(UuidSerializer.from_bytes(&bytes).unwrap(), id);
    }

    #[test]
    fn test_wrong_length() {
        assert!(UuidSerializer.from_bytes(&[0u8; 15]).is_err());
    }
}
