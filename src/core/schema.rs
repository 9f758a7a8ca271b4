//! # CCNx 1.0 Schema
//!
//! TLV type numbers from the CCNx 1.0 message format and the well-known type
//! identifiers used to look up codecs for them.
//!
//! ## TID Layout
//! ```text
//! 3           packet body
//! 3.1.<type>  Interest fields        (3.1.0 Name, 3.1.1 Payload,
//!                                     3.1.2 KeyIdRestriction, 3.1.3 ObjectHashRestriction)
//! 3.2.<type>  Content Object fields  (3.2.0 Name, 3.2.1 Payload,
//!                                     3.2.5 PayloadType, 3.2.6 Expiry)
//! 3.3.<suite> Validation Algorithm   (3.3.2 CRC32C ... 3.3.8 EC-SECP-384R1)
//! 3.4         Validation Payload
//! 4.<type>    Name segments          (4.1 Name, 4.2 IPID, 4.16 Chunk, 4.19 Version,
//!                                     4.4096 - 4.4099 App0 - App3)
//! ```

use crate::core::tid::TypeIdentifier;
use once_cell::sync::Lazy;

// Top level message types
pub const T_INTEREST: u16 = 0x0001;
pub const T_OBJECT: u16 = 0x0002;
pub const T_VALIDATION_ALG: u16 = 0x0003;
pub const T_VALIDATION_PAYLOAD: u16 = 0x0004;

// Message fields
pub const T_NAME: u16 = 0x0000;
pub const T_PAYLOAD: u16 = 0x0001;
pub const T_KEYID_REST: u16 = 0x0002;
pub const T_HASH_REST: u16 = 0x0003;
pub const T_PAYLDTYPE: u16 = 0x0005;
pub const T_EXPIRY: u16 = 0x0006;

// Validation algorithm dependent data
pub const T_KEYID: u16 = 0x0009;
pub const T_PUBLICKEY: u16 = 0x000B;
pub const T_SIGTIME: u16 = 0x000F;

// Name segments
pub const T_NAMESEGMENT: u16 = 0x0001;
pub const T_IPID: u16 = 0x0002;
pub const T_CHUNK: u16 = 0x0010;
pub const T_VERSION: u16 = 0x0013;
pub const T_APP0: u16 = 0x1000;
pub const T_APP3: u16 = 0x1003;

/// Root of all packet body TIDs.
pub const TID_ROOT_BODY: u32 = 3;
/// Root of the name segment TIDs.
pub const TID_ROOT_NAME_SEGMENT: u32 = 4;

pub static TID_PACKET_BODY: Lazy<TypeIdentifier> = Lazy::new(|| TypeIdentifier::new(TID_ROOT_BODY));

pub static TID_INTEREST: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_PACKET_BODY.child(T_INTEREST as u32));
pub static TID_INTEREST_NAME: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_INTEREST.child(T_NAME as u32));
pub static TID_INTEREST_PAYLOAD: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_INTEREST.child(T_PAYLOAD as u32));
pub static TID_INTEREST_KEYID_REST: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_INTEREST.child(T_KEYID_REST as u32));
pub static TID_INTEREST_HASH_REST: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_INTEREST.child(T_HASH_REST as u32));

pub static TID_OBJECT: Lazy<TypeIdentifier> = Lazy::new(|| TID_PACKET_BODY.child(T_OBJECT as u32));
pub static TID_OBJECT_NAME: Lazy<TypeIdentifier> = Lazy::new(|| TID_OBJECT.child(T_NAME as u32));
pub static TID_OBJECT_PAYLOAD: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_OBJECT.child(T_PAYLOAD as u32));
pub static TID_OBJECT_PAYLOAD_TYPE: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_OBJECT.child(T_PAYLDTYPE as u32));
pub static TID_OBJECT_EXPIRY: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_OBJECT.child(T_EXPIRY as u32));

pub static TID_VALIDATION_ALG: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_PACKET_BODY.child(T_VALIDATION_ALG as u32));
pub static TID_VALIDATION_PAYLOAD: Lazy<TypeIdentifier> =
    Lazy::new(|| TID_PACKET_BODY.child(T_VALIDATION_PAYLOAD as u32));

pub static TID_NAME_SEGMENT: Lazy<TypeIdentifier> =
    Lazy::new(|| TypeIdentifier::new(TID_ROOT_NAME_SEGMENT));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_tids() {
        assert_eq!(TID_INTEREST.to_string(), "3.1");
        assert_eq!(TID_INTEREST_NAME.to_string(), "3.1.0");
        assert_eq!(TID_INTEREST_PAYLOAD.to_string(), "3.1.1");
        assert_eq!(TID_INTEREST_KEYID_REST.to_string(), "3.1.2");
        assert_eq!(TID_INTEREST_HASH_REST.to_string(), "3.1.3");
        assert_eq!(TID_OBJECT_EXPIRY.to_string(), "3.2.6");
        assert_eq!(TID_VALIDATION_ALG.to_string(), "3.3");
        assert_eq!(TID_VALIDATION_PAYLOAD.to_string(), "3.4");
        assert_eq!(TID_NAME_SEGMENT.child(T_CHUNK as u32).to_string(), "4.16");
    }
}
