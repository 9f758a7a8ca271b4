//! CCNx names: an ordered list of typed segments.
//!
//! The textual form follows the CCNx URI convention. Untyped segments are plain
//! text, typed segments carry a `Label=` prefix:
//! ```text
//! ccnx:/parc/videos/Chunk=7
//! ```
//! Bytes outside the unreserved URI set (including `/`, `=` and `%`) are
//! written as `%XX`, so display followed by [`Name::parse`] gives back the
//! same name.

use crate::core::schema::{T_APP0, T_APP3, T_CHUNK, T_IPID, T_NAMESEGMENT, T_VERSION};
use bytes::Bytes;
use std::fmt;

const URI_SCHEME: &str = "ccnx:";

/// TLV type of a name segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NameSegmentType {
    Name,
    Ipid,
    Chunk,
    Version,
    /// Application segment `App:0` through `App:3`.
    App(u8),
}

impl NameSegmentType {
    pub fn tlv_type(&self) -> u16 {
        match self {
            NameSegmentType::Name => T_NAMESEGMENT,
            NameSegmentType::Ipid => T_IPID,
            NameSegmentType::Chunk => T_CHUNK,
            NameSegmentType::Version => T_VERSION,
            NameSegmentType::App(n) => T_APP0 + u16::from(*n),
        }
    }

    pub fn from_tlv_type(tlv_type: u16) -> Option<Self> {
        match tlv_type {
            T_NAMESEGMENT => Some(NameSegmentType::Name),
            T_IPID => Some(NameSegmentType::Ipid),
            T_CHUNK => Some(NameSegmentType::Chunk),
            T_VERSION => Some(NameSegmentType::Version),
            T_APP0..=T_APP3 => Some(NameSegmentType::App((tlv_type - T_APP0) as u8)),
            _ => None,
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Name" => Some(NameSegmentType::Name),
            "IPID" => Some(NameSegmentType::Ipid),
            "Chunk" => Some(NameSegmentType::Chunk),
            "Version" => Some(NameSegmentType::Version),
            "App:0" => Some(NameSegmentType::App(0)),
            "App:1" => Some(NameSegmentType::App(1)),
            "App:2" => Some(NameSegmentType::App(2)),
            "App:3" => Some(NameSegmentType::App(3)),
            _ => None,
        }
    }
}

impl fmt::Display for NameSegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameSegmentType::Name => f.write_str("Name"),
            NameSegmentType::Ipid => f.write_str("IPID"),
            NameSegmentType::Chunk => f.write_str("Chunk"),
            NameSegmentType::Version => f.write_str("Version"),
            NameSegmentType::App(n) => write!(f, "App:{n}"),
        }
    }
}

/// One typed name segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameSegment {
    segment_type: NameSegmentType,
    value: Bytes,
}

impl NameSegment {
    pub fn new(segment_type: NameSegmentType, value: impl Into<Bytes>) -> Self {
        Self {
            segment_type,
            value: value.into(),
        }
    }

    /// An untyped (`T_NAMESEGMENT`) segment.
    pub fn generic(value: impl Into<Bytes>) -> Self {
        Self::new(NameSegmentType::Name, value)
    }

    pub fn segment_type(&self) -> NameSegmentType {
        self.segment_type
    }

    pub fn value(&self) -> &Bytes {
        &self.value
    }
}

impl fmt::Display for NameSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segment_type != NameSegmentType::Name || self.value.is_empty() {
            write!(f, "{}=", self.segment_type)?;
        }
        for &byte in self.value.iter() {
            if is_unreserved(byte) {
                write!(f, "{}", char::from(byte))?;
            } else {
                write!(f, "%{byte:02X}")?;
            }
        }
        Ok(())
    }
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b':')
}

/// Decodes `%XX` escapes. A malformed escape is kept as literal text.
fn unescape(text: &str) -> Bytes {
    let raw = text.as_bytes();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'%' {
            let decoded = raw
                .get(i + 1..i + 3)
                .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                .and_then(|hex| std::str::from_utf8(hex).ok())
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(raw[i]);
        i += 1;
    }
    Bytes::from(out)
}

/// Hierarchical CCNx name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Name {
    segments: Vec<NameSegment>,
}

impl Name {
    pub fn new(segments: Vec<NameSegment>) -> Self {
        Self { segments }
    }

    /// Parses a URI such as `/a/b` or `ccnx:/a/Chunk=3`.
    ///
    /// Empty segments are skipped and `%XX` escapes are decoded. A `Label=`
    /// prefix that is not a known segment label is kept as part of an
    /// untyped segment.
    pub fn parse(uri: &str) -> Self {
        let path = uri.strip_prefix(URI_SCHEME).unwrap_or(uri);
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.split_once('=') {
                Some((label, value)) => match NameSegmentType::from_label(label) {
                    Some(kind) => NameSegment::new(kind, unescape(value)),
                    None => NameSegment::generic(unescape(s)),
                },
                None => NameSegment::generic(unescape(s)),
            })
            .collect();
        Self { segments }
    }

    pub fn segments(&self) -> &[NameSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True if every segment of `self` matches the start of `other`.
    pub fn is_prefix_of(&self, other: &Name) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Returns a new name with `segment` appended.
    pub fn append(&self, segment: NameSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl From<&str> for Name {
    fn from(uri: &str) -> Self {
        Name::parse(uri)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        let name = Name::parse("/a/b");
        assert_eq!(name.len(), 2);
        assert_eq!(name.segments()[0], NameSegment::generic("a"));
        assert_eq!(name.to_string(), "/a/b");
    }

    #[test]
    fn test_parse_labelled_segments() {
        let name = Name::parse("ccnx:/parc/Chunk=7/App:2=x/key=value");
        let kinds: Vec<_> = name.segments().iter().map(|s| s.segment_type()).collect();
        assert_eq!(
            kinds,
            vec![
                NameSegmentType::Name,
                NameSegmentType::Chunk,
                NameSegmentType::App(2),
                NameSegmentType::Name
            ]
        );
        assert_eq!(name.to_string(), "/parc/Chunk=7/App:2=x/key%3Dvalue");
    }

    #[test]
    fn test_display_escapes_reserved_bytes() {
        let name = Name::new(vec![
            NameSegment::generic("Chunk=7"),
            NameSegment::generic("a/b"),
            NameSegment::new(NameSegmentType::Version, Bytes::from_static(&[0x00, 0xFF])),
            NameSegment::generic("50%"),
            NameSegment::generic(""),
        ]);
        let text = name.to_string();
        assert_eq!(text, "/Chunk%3D7/a%2Fb/Version=%00%FF/50%25/Name=");
        assert_eq!(Name::parse(&text), name);
    }

    #[test]
    fn test_malformed_escape_kept_literally() {
        let name = Name::parse("/a%zz/b%4");
        assert_eq!(name.segments()[0], NameSegment::generic("a%zz"));
        assert_eq!(name.segments()[1], NameSegment::generic("b%4"));
    }

    #[test]
    fn test_segment_type_round_trip() {
        for t in [T_NAMESEGMENT, T_IPID, T_CHUNK, T_VERSION, T_APP0, T_APP3] {
            let kind = NameSegmentType::from_tlv_type(t);
            assert_eq!(kind.map(|k| k.tlv_type()), Some(t));
        }
        assert!(NameSegmentType::from_tlv_type(0x0F00).is_none());
    }

    #[test]
    fn test_prefix() {
        let short = Name::parse("/a");
        let long = short.append(NameSegment::generic("b"));
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert_eq!(Name::default().to_string(), "/");
    }
}
