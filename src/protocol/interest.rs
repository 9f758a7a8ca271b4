use crate::protocol::hash_value::HashValue;
use crate::protocol::name::Name;
use bytes::Bytes;

/// A CCNx Interest: a request for the Content Object matching `name`.
///
/// The optional restrictions narrow the match to a publisher key or to one
/// exact object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interest {
    name: Name,
    payload: Option<Bytes>,
    keyid_restriction: Option<HashValue>,
    hash_restriction: Option<HashValue>,
}

impl Interest {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            payload: None,
            keyid_restriction: None,
            hash_restriction: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn with_keyid_restriction(mut self, restriction: HashValue) -> Self {
        self.keyid_restriction = Some(restriction);
        self
    }

    pub fn with_hash_restriction(mut self, restriction: HashValue) -> Self {
        self.hash_restriction = Some(restriction);
        self
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    pub fn keyid_restriction(&self) -> Option<HashValue> {
        self.keyid_restriction
    }

    pub fn hash_restriction(&self) -> Option<HashValue> {
        self.hash_restriction
    }
}
