use crate::codec::{type_mismatch, FieldCodec};
use crate::core::schema::TID_NAME_SEGMENT;
use crate::core::tid::TypeIdentifier;
use crate::core::tlv::{write_tlv, write_type_length, TlvReader, TL_SIZE};
use crate::error::{CodecError, Result};
use crate::protocol::field::Field;
use crate::protocol::name::{Name, NameSegment, NameSegmentType};
use bytes::{Bytes, BytesMut};
use std::fmt;
use tracing::trace;

/// Codec for a Name TLV and its nested segment TLVs.
///
/// Segment types are addressed as `4.<type>`; a segment type outside the
/// CCNx 1.0 set fails with `UnknownField`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameCodec;

fn segments_size(name: &Name) -> usize {
    name.segments()
        .iter()
        .map(|segment| TL_SIZE + segment.value().len())
        .sum()
}

impl FieldCodec for NameCodec {
    fn name(&self) -> &'static str {
        "NameCodec"
    }

    fn deserialize(
        &self,
        reader: &mut TlvReader<'_>,
        _tid: &TypeIdentifier,
    ) -> Result<(Field, usize)> {
        let (_, length) = reader.read_type_length()?;
        let length = usize::from(length);
        let mut segments = Vec::new();
        let mut bytes_read = 0;

        while bytes_read < length {
            let offset = reader.position();
            let (segment_type, segment_length) = reader.read_type_length()?;
            let segment_tid = TID_NAME_SEGMENT.child(u32::from(segment_type));
            let segment_length = usize::from(segment_length);

            if bytes_read + TL_SIZE + segment_length > length {
                return Err(CodecError::LengthOverflow {
                    tid: segment_tid,
                    offset,
                    container_length: length,
                });
            }
            let kind = NameSegmentType::from_tlv_type(segment_type).ok_or(
                CodecError::UnknownField {
                    tid: segment_tid,
                    offset,
                },
            )?;
            let value = reader.read_bytes(segment_length)?;
            trace!(offset, segment = %kind, len = segment_length, "name segment");
            segments.push(NameSegment::new(kind, Bytes::copy_from_slice(value)));
            bytes_read += TL_SIZE + segment_length;
        }

        Ok((Field::Name(Name::new(segments)), TL_SIZE + length))
    }

    fn serialize(&self, field: &Field, tlv_type: u16, out: &mut BytesMut) -> Result<usize> {
        let Field::Name(name) = field else {
            return Err(type_mismatch(self.name(), field));
        };
        let inner = segments_size(name);
        write_type_length(out, tlv_type, inner)?;
        for segment in name.segments() {
            write_tlv(out, segment.segment_type().tlv_type(), segment.value())?;
        }
        Ok(TL_SIZE + inner)
    }

    fn serialized_size(&self, field: &Field) -> Result<usize> {
        match field {
            Field::Name(name) => Ok(TL_SIZE + segments_size(name)),
            other => Err(type_mismatch(self.name(), other)),
        }
    }

    fn print(&self, field: &Field, out: &mut dyn fmt::Write) -> Result<()> {
        match field {
            Field::Name(name) => Ok(write!(out, "ccnx:{name}")?),
            other => Err(type_mismatch(self.name(), other)),
        }
    }
}
