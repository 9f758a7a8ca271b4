//! Nested-TLV loop shared by the message container codecs.

use crate::codec::registry::CodecRegistry;
use crate::core::tid::TypeIdentifier;
use crate::core::tlv::{write_type_length, TlvReader, TL_SIZE};
use crate::error::{CodecError, Result};
use crate::protocol::field::Field;
use bytes::BytesMut;
use std::collections::BTreeMap;
use tracing::debug;

/// Static description of one container message type.
pub(crate) struct ContainerSpec<'a> {
    pub codec: &'static str,
    pub message_type: u16,
    pub tid: &'a TypeIdentifier,
    /// Nested TLV types this container understands.
    pub fields: &'static [u16],
}

/// Fields decoded from one container, keyed by nested TLV type.
#[derive(Debug)]
pub(crate) struct DecodedFields {
    codec: &'static str,
    fields: BTreeMap<u16, Field>,
}

impl DecodedFields {
    /// Removes the field of `tlv_type`, converting it with `extract`.
    ///
    /// A field of the wrong variant fails with `TypeMismatch`.
    pub fn take<T>(
        &mut self,
        tlv_type: u16,
        extract: fn(Field) -> std::result::Result<T, Field>,
    ) -> Result<Option<T>> {
        match self.fields.remove(&tlv_type) {
            None => Ok(None),
            Some(field) => extract(field).map(Some).map_err(|field| {
                CodecError::TypeMismatch {
                    codec: self.codec,
                    found: field.kind(),
                }
            }),
        }
    }
}

/// Decodes a container TLV starting at the reader's position.
///
/// Returns the nested fields and the total bytes consumed, header included.
pub(crate) fn decode_container(
    reader: &mut TlvReader<'_>,
    registry: &CodecRegistry,
    spec: &ContainerSpec<'_>,
) -> Result<(DecodedFields, usize)> {
    let start = reader.position();
    let (message_type, length) = reader.read_type_length()?;
    if message_type != spec.message_type {
        return Err(CodecError::WrongMessageType {
            expected: spec.message_type,
            found: message_type,
            offset: start,
        });
    }
    let length = usize::from(length);
    if reader.remaining() < length {
        return Err(CodecError::TruncatedInput {
            offset: reader.position(),
            needed: length,
            available: reader.remaining(),
        });
    }

    let mut decoded = DecodedFields {
        codec: spec.codec,
        fields: BTreeMap::new(),
    };
    let mut bytes_read = 0;

    while bytes_read < length {
        let offset = reader.position();
        let (nested_type, nested_length) = reader.peek_type_length()?;
        let nested_tid = spec.tid.child(u32::from(nested_type));

        if bytes_read + usize::from(nested_length) + TL_SIZE > length {
            return Err(CodecError::LengthOverflow {
                tid: nested_tid,
                offset,
                container_length: length,
            });
        }
        if !spec.fields.contains(&nested_type) {
            return Err(CodecError::UnknownField {
                tid: nested_tid,
                offset,
            });
        }
        if decoded.fields.contains_key(&nested_type) {
            return Err(CodecError::DuplicateField {
                tid: nested_tid,
                offset,
            });
        }

        let codec = registry.lookup(&nested_tid)?;
        debug!(tid = %nested_tid, offset, codec = codec.name(), "decoding nested field");

        let (field, consumed) = codec.deserialize(reader, &nested_tid)?;
        decoded.fields.insert(nested_type, field);
        bytes_read += consumed;
    }

    Ok((decoded, TL_SIZE + length))
}

/// Size of one nested field as its registered codec would write it.
pub(crate) fn field_size(
    registry: &CodecRegistry,
    container: &TypeIdentifier,
    nested_type: u16,
    field: &Field,
) -> Result<usize> {
    registry
        .lookup(&container.child(u32::from(nested_type)))?
        .serialized_size(field)
}

/// Writes one nested field through its registered codec.
pub(crate) fn encode_field(
    registry: &CodecRegistry,
    container: &TypeIdentifier,
    nested_type: u16,
    field: &Field,
    out: &mut BytesMut,
) -> Result<usize> {
    registry
        .lookup(&container.child(u32::from(nested_type)))?
        .serialize(field, nested_type, out)
}

/// Writes a container: header first, then each `(type, field)` in order.
///
/// Returns the total bytes written, which always equals
/// [`container_size`] for the same fields.
pub(crate) fn encode_container(
    registry: &CodecRegistry,
    spec: &ContainerSpec<'_>,
    fields: &[(u16, Field)],
    out: &mut BytesMut,
) -> Result<usize> {
    let total = container_size(registry, spec.tid, fields)?;
    out.reserve(total);
    write_type_length(out, spec.message_type, total - TL_SIZE)?;
    let mut written = TL_SIZE;
    for (nested_type, field) in fields {
        written += encode_field(registry, spec.tid, *nested_type, field, out)?;
    }
    debug_assert_eq!(written, total);
    Ok(written)
}

/// Total encoded size of a container holding `fields`.
pub(crate) fn container_size(
    registry: &CodecRegistry,
    container: &TypeIdentifier,
    fields: &[(u16, Field)],
) -> Result<usize> {
    let mut total = TL_SIZE;
    for (nested_type, field) in fields {
        total += field_size(registry, container, *nested_type, field)?;
    }
    Ok(total)
}
