//! Descriptor tree describing the declared shape of a type.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::value::ScalarKind;

/// Declared shape of a type.
#[derive(Clone, Debug, PartialEq)]
pub enum Descriptor {
    /// Anything; data passes through unconverted.
    Any,
    /// A scalar of the given kind.
    Scalar(ScalarKind),
    /// A record with named fields.
    Record(Arc<RecordDescriptor>),
    /// Variable-length sequence with elements of one type.
    Sequence(Box<Descriptor>),
    /// Fixed sequence (`Box<[T]>`) with elements of one type.
    Tuple(Box<Descriptor>),
    /// String-keyed mapping. Keys pass through unchanged.
    Mapping {
        /// Descriptor of the keys.
        key: Box<Descriptor>,
        /// Descriptor of the values.
        value: Box<Descriptor>,
    },
    /// Value that may be null.
    Optional(Box<Descriptor>),
}

impl Descriptor {
    /// Descriptor for `sequence<element>`.
    #[must_use]
    pub fn sequence(element: Self) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// Descriptor for `tuple<element>`.
    #[must_use]
    pub fn tuple(element: Self) -> Self {
        Self::Tuple(Box::new(element))
    }

    /// Descriptor for `mapping<key, value>`.
    #[must_use]
    pub fn mapping(key: Self, value: Self) -> Self {
        Self::Mapping {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Descriptor for `optional<inner>`.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Record(record) => write!(f, "record {}", record.name()),
            Self::Sequence(element) => write!(f, "sequence<{element}>"),
            Self::Tuple(element) => write!(f, "tuple<{element}>"),
            Self::Mapping { key, value } => write!(f, "mapping<{key}, {value}>"),
            Self::Optional(inner) => write!(f, "optional<{inner}>"),
        }
    }
}

/// Declared fields of a record type, with the external-name table used to
/// resolve incoming keys.
#[derive(Debug)]
pub struct RecordDescriptor {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
    by_external: HashMap<&'static str, usize>,
}

impl RecordDescriptor {
    /// Build a descriptor and its external-name table.
    #[must_use]
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        let by_external = fields
            .iter()
            .enumerate()
            .map(|(index, field)| (field.external, index))
            .collect();
        Self {
            name,
            fields,
            by_external,
        }
    }

    /// Name of the record type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Resolve an external (wire) key to its field.
    #[must_use]
    pub fn field_by_external(&self, external: &str) -> Option<&FieldDescriptor> {
        self.by_external
            .get(external)
            .and_then(|index| self.fields.get(*index))
    }

    /// Resolve a field by its internal name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl PartialEq for RecordDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

/// One declared record field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    name: &'static str,
    external: &'static str,
    descriptor: Descriptor,
    required: bool,
}

impl FieldDescriptor {
    /// Describe a field named `name` in Rust and `external` on the wire.
    #[must_use]
    pub const fn new(
        name: &'static str,
        external: &'static str,
        descriptor: Descriptor,
        required: bool,
    ) -> Self {
        Self {
            name,
            external,
            descriptor,
            required,
        }
    }

    /// Field identifier in the record type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Key used in untyped data and on the wire.
    #[must_use]
    pub const fn external(&self) -> &'static str {
        self.external
    }

    /// Declared shape of the field's value.
    #[must_use]
    pub const fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Whether the record fails to build when this field is absent.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

/// Location of a value inside the data being converted, rendered as
/// `$.service.ports[0]`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldPath(String);

impl FieldPath {
    /// The root location, `$`.
    #[must_use]
    pub fn root() -> Self {
        Self("$".to_owned())
    }

    /// Location of mapping key `name` below this one.
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        Self(format!("{}.{name}", self.0))
    }

    /// Location of sequence element `index` below this one.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Rendered location.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
