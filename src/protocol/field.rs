use crate::protocol::content_object::PayloadType;
use crate::protocol::hash_value::HashValue;
use crate::protocol::name::Name;
use crate::protocol::validation::ValidationAlgorithm;
use bytes::Bytes;

/// A decoded field value, as produced and consumed by field codecs.
///
/// Codecs match on the variant they handle and report `TypeMismatch` for any
/// other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Name(Name),
    HashValue(HashValue),
    Payload(Bytes),
    PayloadType(PayloadType),
    /// Milliseconds since the UNIX epoch.
    Timestamp(u64),
    ValidationAlgorithm(ValidationAlgorithm),
}

impl Field {
    /// Variant name, for error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Field::Name(_) => "Name",
            Field::HashValue(_) => "HashValue",
            Field::Payload(_) => "Payload",
            Field::PayloadType(_) => "PayloadType",
            Field::Timestamp(_) => "Timestamp",
            Field::ValidationAlgorithm(_) => "ValidationAlgorithm",
        }
    }
}

impl From<Name> for Field {
    fn from(name: Name) -> Self {
        Field::Name(name)
    }
}

impl From<HashValue> for Field {
    fn from(hash: HashValue) -> Self {
        Field::HashValue(hash)
    }
}

impl From<PayloadType> for Field {
    fn from(kind: PayloadType) -> Self {
        Field::PayloadType(kind)
    }
}

impl From<ValidationAlgorithm> for Field {
    fn from(alg: ValidationAlgorithm) -> Self {
        Field::ValidationAlgorithm(alg)
    }
}
