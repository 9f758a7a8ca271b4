//! # Type Identifiers
//!
//! Hierarchical, SNMP-OID style identifiers that address every codec-relevant
//! element of a CCNx packet. A TID such as `3.1.2` is read as "packet body,
//! Interest, KeyId restriction".
//!
//! TIDs are immutable values. Extending a TID produces a new one and leaves the
//! parent untouched, which makes them cheap to derive while walking nested TLVs.
//!
//! ## Ordering
//! TIDs compare component by component on numeric value. When one TID is a
//! prefix of the other, the shorter one is less:
//! ```text
//! 3.1 < 3.1.0 < 3.1.2 < 3.2 < 4
//! ```

use crate::error::{constants, CodecError, Result};
use std::fmt;
use std::str::FromStr;

/// A single TID component.
pub type Component = u32;

/// Hierarchical type identifier, e.g. `3.1.0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeIdentifier {
    // Never empty. Vec ordering gives the prefix-is-less total order.
    components: Vec<Component>,
}

impl TypeIdentifier {
    /// Creates a root TID with a single component.
    pub fn new(value: Component) -> Self {
        Self {
            components: vec![value],
        }
    }

    /// Creates a TID from a non-empty component slice.
    pub fn from_components(components: &[Component]) -> Result<Self> {
        if components.is_empty() {
            return Err(CodecError::MalformedTid {
                input: String::new(),
                reason: constants::ERR_TID_EMPTY,
            });
        }
        Ok(Self {
            components: components.to_vec(),
        })
    }

    /// Returns a child TID: this TID's components followed by `value`.
    pub fn child(&self, value: Component) -> Self {
        let mut components = Vec::with_capacity(self.components.len() + 1);
        components.extend_from_slice(&self.components);
        components.push(value);
        Self { components }
    }

    /// Returns the parent TID, or `None` for a root.
    pub fn parent(&self) -> Option<Self> {
        if self.components.len() < 2 {
            return None;
        }
        Some(Self {
            components: self.components[..self.components.len() - 1].to_vec(),
        })
    }

    /// Number of components.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Component at `index`.
    ///
    /// # Errors
    /// Returns `CodecError::IndexOutOfRange` if `index >= len()`.
    pub fn component(&self, index: usize) -> Result<Component> {
        self.components
            .get(index)
            .copied()
            .ok_or(CodecError::IndexOutOfRange {
                index,
                size: self.components.len(),
            })
    }

    /// All components in order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Last component, which is the TLV type for nested-field TIDs.
    pub fn last(&self) -> Component {
        // components is never empty
        self.components[self.components.len() - 1]
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &TypeIdentifier) -> bool {
        other.components.starts_with(&self.components)
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.components.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
        }
        for component in iter {
            write!(f, ".{component}")?;
        }
        Ok(())
    }
}

impl FromStr for TypeIdentifier {
    type Err = CodecError;

    /// Parses the dotted form. Components must be plain ASCII decimal digits
    /// that fit in a `u32`; signs, whitespace and empty components are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = |reason| CodecError::MalformedTid {
            input: s.to_string(),
            reason,
        };

        if s.is_empty() {
            return Err(malformed(constants::ERR_TID_EMPTY));
        }

        let mut components = Vec::new();
        for part in s.split('.') {
            if part.is_empty() {
                return Err(malformed(constants::ERR_TID_EMPTY_COMPONENT));
            }
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed(constants::ERR_TID_NOT_NUMERIC));
            }
            let value = part
                .parse::<Component>()
                .map_err(|_| malformed(constants::ERR_TID_OVERFLOW))?;
            components.push(value);
        }

        Ok(Self { components })
    }
}

impl TryFrom<&str> for TypeIdentifier {
    type Error = CodecError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}
