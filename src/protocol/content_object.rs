use crate::protocol::name::Name;
use bytes::Bytes;
use std::fmt;

/// Interpretation of a Content Object payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadType {
    Data,
    Key,
    Link,
}

impl PayloadType {
    pub fn to_byte(self) -> u8 {
        match self {
            PayloadType::Data => 0,
            PayloadType::Key => 1,
            PayloadType::Link => 2,
        }
    }

    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0 => Some(PayloadType::Data),
            1 => Some(PayloadType::Key),
            2 => Some(PayloadType::Link),
            _ => None,
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadType::Data => f.write_str("DATA"),
            PayloadType::Key => f.write_str("KEY"),
            PayloadType::Link => f.write_str("LINK"),
        }
    }
}

/// A CCNx Content Object. Every field is optional on the wire; a nameless
/// object can only be retrieved through a hash restriction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentObject {
    name: Option<Name>,
    payload: Option<Bytes>,
    payload_type: Option<PayloadType>,
    expiry: Option<u64>,
}

impl ContentObject {
    pub fn new(name: Name) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn nameless() -> Self {
        Self::default()
    }

    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_payload_type(mut self, payload_type: PayloadType) -> Self {
        self.payload_type = Some(payload_type);
        self
    }

    /// Expiry time in milliseconds since the UNIX epoch.
    pub fn with_expiry(mut self, expiry_millis: u64) -> Self {
        self.expiry = Some(expiry_millis);
        self
    }

    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    pub fn payload_type(&self) -> Option<PayloadType> {
        self.payload_type
    }

    pub fn expiry(&self) -> Option<u64> {
        self.expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_type_bytes() {
        for kind in [PayloadType::Data, PayloadType::Key, PayloadType::Link] {
            assert_eq!(PayloadType::from_byte(kind.to_byte()), Some(kind));
        }
        assert_eq!(PayloadType::from_byte(3), None);
    }
}
