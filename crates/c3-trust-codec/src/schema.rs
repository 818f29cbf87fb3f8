//! Schema descriptions and the self-describing schema serializer.
//!
//! A [`Schema`] is an ordered list of named [`FieldDescriptor`]s. Field order
//! is wire order, so schemas keep insertion order rather than sorting.
//!
//! Schemas can themselves be serialized (see [`encode_schema`]) using the
//! [`TypeTag`] registry. Tags are append-only: a tag value, once assigned,
//! identifies the same descriptor kind forever, otherwise self-describing
//! blobs already committed on-chain stop decoding.

use crate::error::{CodecError, Result};
use crate::read::take;

/// Default width in bytes of an [`FieldDescriptor::UnsignedInt`] field.
pub const DEFAULT_UINT_WIDTH: u8 = 8;

/// Largest width an unsigned integer field may declare.
pub const MAX_UINT_WIDTH: u8 = 8;

/// Deepest nesting of objects, hashes and arrays a serialized schema may
/// declare.
pub const MAX_SCHEMA_DEPTH: usize = 32;

/// Description of one schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDescriptor {
    /// A 32-byte address or public key.
    FixedAddress,
    /// A single unsigned byte.
    Byte,
    /// An IEEE-754 double, big-endian.
    Double,
    /// One byte, `0` or `1`.
    Boolean,
    /// Always the empty string; occupies no bytes.
    EmptyString,
    /// Raw bytes, fixed-size when `size` is set, otherwise length-prefixed.
    VariableBytes { size: Option<usize> },
    /// UTF-8 text, fixed-size when `size` is set, otherwise length-prefixed.
    Utf8String { size: Option<usize> },
    /// Raw bytes carried as base64 text at the value layer.
    Base64Bytes { size: Option<usize> },
    /// Big-endian unsigned integer of `width` bytes (default 8).
    UnsignedInt { width: Option<u8> },
    /// A nested record.
    Object(Schema),
    /// A count-prefixed sequence of elements.
    Array(Box<FieldDescriptor>),
    /// A 32-byte commitment to a record of the given schema.
    Hash(Schema),
    /// Constant bytes; carries no value.
    FixedLiteral(Vec<u8>),
}

impl FieldDescriptor {
    /// Length-prefixed raw bytes.
    pub fn bytes() -> Self {
        Self::VariableBytes { size: None }
    }

    /// Raw bytes of exactly `size` bytes.
    pub fn sized_bytes(size: usize) -> Self {
        Self::VariableBytes { size: Some(size) }
    }

    /// Length-prefixed UTF-8 text.
    pub fn string() -> Self {
        Self::Utf8String { size: None }
    }

    /// UTF-8 text of exactly `size` bytes.
    pub fn sized_string(size: usize) -> Self {
        Self::Utf8String { size: Some(size) }
    }

    /// Length-prefixed base64 bytes.
    pub fn base64() -> Self {
        Self::Base64Bytes { size: None }
    }

    /// An 8-byte unsigned integer.
    pub fn uint() -> Self {
        Self::UnsignedInt { width: None }
    }

    /// An unsigned integer of `width` bytes.
    pub fn uint_width(width: u8) -> Self {
        Self::UnsignedInt { width: Some(width) }
    }

    /// A nested record.
    pub fn object(schema: Schema) -> Self {
        Self::Object(schema)
    }

    /// An array of `element`.
    pub fn array(element: FieldDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    /// A hash commitment to a record of `schema`.
    pub fn hash(schema: Schema) -> Self {
        Self::Hash(schema)
    }

    /// A constant byte sequence.
    pub fn literal(bytes: impl Into<Vec<u8>>) -> Self {
        Self::FixedLiteral(bytes.into())
    }

    /// The registry tag for this descriptor kind.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::FixedAddress => TypeTag::FixedAddress,
            Self::Byte => TypeTag::Byte,
            Self::Double => TypeTag::Double,
            Self::Boolean => TypeTag::Boolean,
            Self::EmptyString => TypeTag::EmptyString,
            Self::VariableBytes { .. } => TypeTag::VariableBytes,
            Self::Utf8String { .. } => TypeTag::Utf8String,
            Self::Base64Bytes { .. } => TypeTag::Base64Bytes,
            Self::UnsignedInt { .. } => TypeTag::UnsignedInt,
            Self::Object(_) => TypeTag::Object,
            Self::Array(_) => TypeTag::Array,
            Self::Hash(_) => TypeTag::Hash,
            Self::FixedLiteral(_) => TypeTag::FixedLiteral,
        }
    }
}

/// An ordered mapping from field name to descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, FieldDescriptor)>,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Re-adding an existing name replaces its descriptor in
    /// place, keeping its original position.
    pub fn field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = descriptor,
            None => self.fields.push((name, descriptor)),
        }
        self
    }

    /// Look up a field descriptor by name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| d)
    }

    /// Iterate fields in wire order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FieldDescriptor)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, FieldDescriptor)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Schema::new(), |schema, (name, d)| schema.field(name, d))
    }
}

/// Stable tags for descriptor kinds in serialized schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    FixedAddress = 0,
    Byte = 1,
    Double = 2,
    Boolean = 3,
    EmptyString = 4,
    VariableBytes = 5,
    Utf8String = 6,
    Base64Bytes = 7,
    UnsignedInt = 8,
    Object = 9,
    Array = 10,
    Hash = 11,
    FixedLiteral = 12,
}

/// Every assigned tag, indexed by its value. Append only.
pub const TYPE_TAGS: [TypeTag; 13] = [
    TypeTag::FixedAddress,
    TypeTag::Byte,
    TypeTag::Double,
    TypeTag::Boolean,
    TypeTag::EmptyString,
    TypeTag::VariableBytes,
    TypeTag::Utf8String,
    TypeTag::Base64Bytes,
    TypeTag::UnsignedInt,
    TypeTag::Object,
    TypeTag::Array,
    TypeTag::Hash,
    TypeTag::FixedLiteral,
];

impl TypeTag {
    /// Convert to the wire byte.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        TYPE_TAGS.get(value as usize).copied()
    }
}

/// Serialize a schema.
///
/// Layout: field count (1 byte), then per field the name length (1 byte), the
/// name bytes, the type tag (1 byte) and the tag's extra bytes:
///
/// | tag | extras |
/// |---|---|
/// | sized kinds | 2-byte BE size, `0` when unsized |
/// | `UnsignedInt` | 1-byte width, `0` for the default |
/// | `Object`, `Hash` | nested serialized schema |
/// | `Array` | element tag and extras |
/// | `FixedLiteral` | 2-byte BE length, then the literal bytes |
pub fn encode_schema(schema: &Schema) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_schema(&mut buf, schema, "<schema>")?;
    Ok(buf)
}

/// Parse a serialized schema. The whole buffer must be consumed.
pub fn decode_schema(bytes: &[u8]) -> Result<Schema> {
    let (schema, end) = read_schema(bytes, 0, 0)?;
    if end != bytes.len() {
        return Err(CodecError::mismatch(
            "<schema>",
            format!("{} trailing bytes after schema", bytes.len() - end),
        ));
    }
    Ok(schema)
}

fn write_schema(buf: &mut Vec<u8>, schema: &Schema, path: &str) -> Result<()> {
    let count = u8::try_from(schema.len())
        .map_err(|_| CodecError::out_of_range(path, "more than 255 fields"))?;
    buf.push(count);
    for (name, descriptor) in schema.fields() {
        let name_len = u8::try_from(name.len())
            .map_err(|_| CodecError::out_of_range(name, "field name longer than 255 bytes"))?;
        buf.push(name_len);
        buf.extend_from_slice(name.as_bytes());
        write_descriptor(buf, descriptor, name)?;
    }
    Ok(())
}

fn write_descriptor(buf: &mut Vec<u8>, descriptor: &FieldDescriptor, path: &str) -> Result<()> {
    buf.push(descriptor.type_tag().to_u8());
    match descriptor {
        FieldDescriptor::FixedAddress
        | FieldDescriptor::Byte
        | FieldDescriptor::Double
        | FieldDescriptor::Boolean
        | FieldDescriptor::EmptyString => {}
        FieldDescriptor::VariableBytes { size }
        | FieldDescriptor::Utf8String { size }
        | FieldDescriptor::Base64Bytes { size } => {
            let raw = match size {
                Some(0) => return Err(CodecError::mismatch(path, "declared size must be positive")),
                Some(n) => u16::try_from(*n)
                    .map_err(|_| CodecError::out_of_range(path, "declared size exceeds 65535"))?,
                None => 0,
            };
            buf.extend_from_slice(&raw.to_be_bytes());
        }
        FieldDescriptor::UnsignedInt { width } => {
            buf.push(width.unwrap_or(0));
        }
        FieldDescriptor::Object(schema) | FieldDescriptor::Hash(schema) => {
            write_schema(buf, schema, path)?;
        }
        FieldDescriptor::Array(element) => {
            write_descriptor(buf, element, path)?;
        }
        FieldDescriptor::FixedLiteral(bytes) => {
            let len = u16::try_from(bytes.len())
                .map_err(|_| CodecError::out_of_range(path, "literal longer than 65535 bytes"))?;
            buf.extend_from_slice(&len.to_be_bytes());
            buf.extend_from_slice(bytes);
        }
    }
    Ok(())
}

fn read_schema(bytes: &[u8], offset: usize, depth: usize) -> Result<(Schema, usize)> {
    let count = take(bytes, offset, 1)?[0];
    let mut pos = offset + 1;
    let mut schema = Schema::new();
    for _ in 0..count {
        let name_len = take(bytes, pos, 1)?[0] as usize;
        pos += 1;
        let name = std::str::from_utf8(take(bytes, pos, name_len)?)
            .map_err(|_| CodecError::mismatch("<schema>", "field name is not UTF-8"))?
            .to_string();
        pos += name_len;
        if schema.get(&name).is_some() {
            return Err(CodecError::mismatch(&name, "field name repeated in schema"));
        }
        let (descriptor, next) = read_descriptor(bytes, pos, depth)?;
        pos = next;
        schema = schema.field(name, descriptor);
    }
    Ok((schema, pos))
}

fn read_descriptor(bytes: &[u8], offset: usize, depth: usize) -> Result<(FieldDescriptor, usize)> {
    let raw = take(bytes, offset, 1)?[0];
    let tag = TypeTag::from_u8(raw).ok_or(CodecError::UnknownTypeTag(raw))?;
    let pos = offset + 1;

    let read_size = |pos: usize| -> Result<(Option<usize>, usize)> {
        let raw = take(bytes, pos, 2)?;
        let size = u16::from_be_bytes([raw[0], raw[1]]) as usize;
        Ok(((size != 0).then_some(size), pos + 2))
    };

    Ok(match tag {
        TypeTag::FixedAddress => (FieldDescriptor::FixedAddress, pos),
        TypeTag::Byte => (FieldDescriptor::Byte, pos),
        TypeTag::Double => (FieldDescriptor::Double, pos),
        TypeTag::Boolean => (FieldDescriptor::Boolean, pos),
        TypeTag::EmptyString => (FieldDescriptor::EmptyString, pos),
        TypeTag::VariableBytes => {
            let (size, next) = read_size(pos)?;
            (FieldDescriptor::VariableBytes { size }, next)
        }
        TypeTag::Utf8String => {
            let (size, next) = read_size(pos)?;
            (FieldDescriptor::Utf8String { size }, next)
        }
        TypeTag::Base64Bytes => {
            let (size, next) = read_size(pos)?;
            (FieldDescriptor::Base64Bytes { size }, next)
        }
        TypeTag::UnsignedInt => {
            let width = take(bytes, pos, 1)?[0];
            let width = (width != 0).then_some(width);
            (FieldDescriptor::UnsignedInt { width }, pos + 1)
        }
        TypeTag::Object => {
            let (schema, next) = read_schema(bytes, pos, nested(depth)?)?;
            (FieldDescriptor::Object(schema), next)
        }
        TypeTag::Hash => {
            let (schema, next) = read_schema(bytes, pos, nested(depth)?)?;
            (FieldDescriptor::Hash(schema), next)
        }
        TypeTag::Array => {
            let (element, next) = read_descriptor(bytes, pos, nested(depth)?)?;
            (FieldDescriptor::Array(Box::new(element)), next)
        }
        TypeTag::FixedLiteral => {
            let raw = take(bytes, pos, 2)?;
            let len = u16::from_be_bytes([raw[0], raw[1]]) as usize;
            let literal = take(bytes, pos + 2, len)?.to_vec();
            (FieldDescriptor::FixedLiteral(literal), pos + 2 + len)
        }
    })
}

fn nested(depth: usize) -> Result<usize> {
    if depth >= MAX_SCHEMA_DEPTH {
        return Err(CodecError::mismatch(
            "<schema>",
            format!("nesting deeper than {MAX_SCHEMA_DEPTH}"),
        ));
    }
    Ok(depth + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_values_are_frozen() {
        // Previously committed self-describing blobs depend on these values.
        let expected: [(TypeTag, u8); 13] = [
            (TypeTag::FixedAddress, 0),
            (TypeTag::Byte, 1),
            (TypeTag::Double, 2),
            (TypeTag::Boolean, 3),
            (TypeTag::EmptyString, 4),
            (TypeTag::VariableBytes, 5),
            (TypeTag::Utf8String, 6),
            (TypeTag::Base64Bytes, 7),
            (TypeTag::UnsignedInt, 8),
            (TypeTag::Object, 9),
            (TypeTag::Array, 10),
            (TypeTag::Hash, 11),
            (TypeTag::FixedLiteral, 12),
        ];
        for (index, (tag, value)) in expected.iter().enumerate() {
            assert_eq!(tag.to_u8(), *value);
            assert_eq!(TYPE_TAGS[index], *tag);
            assert_eq!(TypeTag::from_u8(*value), Some(*tag));
        }
        assert_eq!(TypeTag::from_u8(13), None);
    }

    #[test]
    fn test_schema_preserves_insertion_order() {
        let schema = Schema::new()
            .field("zeta", FieldDescriptor::Byte)
            .field("alpha", FieldDescriptor::uint())
            .field("mid", FieldDescriptor::Boolean);

        let names: Vec<&str> = schema.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_schema_field_replace_keeps_position() {
        let schema = Schema::new()
            .field("a", FieldDescriptor::Byte)
            .field("b", FieldDescriptor::Byte)
            .field("a", FieldDescriptor::uint());

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.fields().next(), Some(("a", &FieldDescriptor::uint())));
    }

    #[test]
    fn test_encode_schema_layout() {
        let schema = Schema::new()
            .field("n", FieldDescriptor::uint_width(4))
            .field("s", FieldDescriptor::string());

        let bytes = encode_schema(&schema).unwrap();
        assert_eq!(
            bytes,
            vec![
                2, // field count
                1, b'n', 8, 4, // name, UnsignedInt, width 4
                1, b's', 6, 0, 0, // name, Utf8String, unsized
            ]
        );
    }

    #[test]
    fn test_schema_roundtrip_nested() {
        let inner = Schema::new()
            .field("id", FieldDescriptor::FixedAddress)
            .field("memo", FieldDescriptor::sized_string(12));
        let schema = Schema::new()
            .field("tag", FieldDescriptor::literal(vec![0x06]))
            .field("items", FieldDescriptor::array(FieldDescriptor::object(inner.clone())))
            .field("commit", FieldDescriptor::hash(inner))
            .field("ratio", FieldDescriptor::Double)
            .field("blob", FieldDescriptor::base64())
            .field("empty", FieldDescriptor::EmptyString);

        let bytes = encode_schema(&schema).unwrap();
        assert_eq!(decode_schema(&bytes).unwrap(), schema);
    }

    #[test]
    fn test_decode_schema_unknown_tag() {
        let bytes = vec![1, 1, b'x', 0xee];
        assert_eq!(decode_schema(&bytes), Err(CodecError::UnknownTypeTag(0xee)));
    }

    #[test]
    fn test_decode_schema_truncated() {
        let bytes = vec![1, 5, b'x'];
        assert!(matches!(
            decode_schema(&bytes),
            Err(CodecError::InsufficientBytes { .. })
        ));
    }

    #[test]
    fn test_zero_size_rejected() {
        let schema = Schema::new().field("b", FieldDescriptor::sized_bytes(0));
        assert!(matches!(
            encode_schema(&schema),
            Err(CodecError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let mut bytes = vec![1, 1, b'x'];
        bytes.extend(std::iter::repeat(TypeTag::Array.to_u8()).take(100_000));
        bytes.push(TypeTag::Byte.to_u8());
        assert!(matches!(
            decode_schema(&bytes),
            Err(CodecError::SchemaMismatch { .. })
        ));

        let mut element = FieldDescriptor::Byte;
        for _ in 0..MAX_SCHEMA_DEPTH {
            element = FieldDescriptor::array(element);
        }
        let at_limit = Schema::new().field("x", element);
        let bytes = encode_schema(&at_limit).unwrap();
        assert_eq!(decode_schema(&bytes).unwrap(), at_limit);
    }

    #[test]
    fn test_duplicate_field_name_rejected() {
        let bytes = vec![2, 1, b'a', 1, 1, b'a', 8, 2];
        assert!(matches!(
            decode_schema(&bytes),
            Err(CodecError::SchemaMismatch { field, .. }) if field == "a"
        ));
    }
}
