use crate::core::schema::{T_INTEREST, T_OBJECT};
use crate::protocol::content_object::ContentObject;
use crate::protocol::interest::Interest;
use crate::protocol::validation::ValidationAlgorithm;

/// Top level CCNx message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Interest(Interest),
    ContentObject(ContentObject),
}

impl Message {
    /// Outer TLV type of this message.
    pub fn tlv_type(&self) -> u16 {
        match self {
            Message::Interest(_) => T_INTEREST,
            Message::ContentObject(_) => T_OBJECT,
        }
    }
}

impl From<Interest> for Message {
    fn from(interest: Interest) -> Self {
        Message::Interest(interest)
    }
}

impl From<ContentObject> for Message {
    fn from(object: ContentObject) -> Self {
        Message::ContentObject(object)
    }
}

/// Message plus its optional validation section.
///
/// When `validation` is present it carries the signature read from the
/// validation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketBody {
    pub message: Message,
    pub validation: Option<ValidationAlgorithm>,
}

impl PacketBody {
    pub fn unsigned(message: impl Into<Message>) -> Self {
        Self {
            message: message.into(),
            validation: None,
        }
    }

    pub fn is_signed(&self) -> bool {
        self.validation
            .as_ref()
            .is_some_and(|alg| alg.signature().is_some())
    }
}
