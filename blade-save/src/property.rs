//! Property tree types
//!
//! A save body is an ordered list of [`Property`] values. Each property pairs
//! the tag read from (or written to) the stream with its decoded value.
//! Structs nest further property lists; arrays hold either bare values
//! (dynamic arrays) or complete tagged properties (static arrays, which have
//! no wrapper tag in the stream).

use crate::tree::size;

/// The property kinds the tag grammar knows about.
///
/// Any other type string in a stream is a decode error
/// ([`crate::SaveError::UnknownPropertyType`]); no value of an unknown kind
/// is ever placed in a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Int,
    Float,
    Bool,
    Byte,
    Str,
    Name,
    Struct,
    Array,
}

impl PropertyKind {
    /// Every known kind, in type-string order
    pub const ALL: [PropertyKind; 8] = [
        PropertyKind::Int,
        PropertyKind::Float,
        PropertyKind::Bool,
        PropertyKind::Byte,
        PropertyKind::Str,
        PropertyKind::Name,
        PropertyKind::Struct,
        PropertyKind::Array,
    ];

    /// Type string written in the tag header
    pub fn type_name(self) -> &'static str {
        match self {
            PropertyKind::Int => "IntProperty",
            PropertyKind::Float => "FloatProperty",
            PropertyKind::Bool => "BoolProperty",
            PropertyKind::Byte => "ByteProperty",
            PropertyKind::Str => "StrProperty",
            PropertyKind::Name => "NameProperty",
            PropertyKind::Struct => "StructProperty",
            PropertyKind::Array => "ArrayProperty",
        }
    }

    /// Parse a tag type string
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == type_name)
    }
}

/// Header of one tag in the stream.
///
/// `size` is the declared length of the value body. It is kept verbatim on
/// read and recomputed by the writer, so edited trees never need to fix it
/// up by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTag {
    pub name: String,
    pub kind: PropertyKind,
    pub size: i32,
    pub array_index: i32,
}

/// A tag together with its value
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub tag: PropertyTag,
    pub value: PropertyValue,
}

impl Property {
    /// Build a property at array index 0 with a computed tag size
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self::indexed(name, 0, value)
    }

    /// Build a property at an explicit array index with a computed tag size
    pub fn indexed(name: impl Into<String>, array_index: i32, value: PropertyValue) -> Self {
        let declared = size::declared_size(&value);
        Self {
            tag: PropertyTag {
                name: name.into(),
                kind: value.kind(),
                size: i32::try_from(declared).unwrap_or(i32::MAX),
                array_index,
            },
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.tag.name
    }
}

/// Decoded value of a property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    /// Raw byte (the enum name slot in the stream holds the terminator)
    Byte(u8),
    /// Byte property carrying a symbolic enum value
    Enum { enum_name: String, value: String },
    Str(String),
    Name(String),
    Struct(StructValue),
    Array(ArrayValue),
}

impl PropertyValue {
    /// Kind written in the tag header for this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Int(_) => PropertyKind::Int,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Byte(_) | PropertyValue::Enum { .. } => PropertyKind::Byte,
            PropertyValue::Str(_) => PropertyKind::Str,
            PropertyValue::Name(_) => PropertyKind::Name,
            PropertyValue::Struct(_) => PropertyKind::Struct,
            PropertyValue::Array(_) => PropertyKind::Array,
        }
    }
}

/// Struct body: an ordered list of fields closed by the terminator.
///
/// `type_name` is `None` for struct elements of a dynamic array, which have
/// no name slot in the stream. Standalone structs always carry one, possibly
/// empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    pub type_name: Option<String>,
    pub fields: Vec<Property>,
}

impl StructValue {
    pub fn named(type_name: impl Into<String>, fields: Vec<Property>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            fields,
        }
    }

    /// Struct without a name slot (dynamic array element)
    pub fn element(fields: Vec<Property>) -> Self {
        Self {
            type_name: None,
            fields,
        }
    }

    /// First field with the given name
    pub fn field(&self, name: &str) -> Option<&Property> {
        self.fields.iter().find(|field| field.tag.name == name)
    }
}

/// How an array is laid out in the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayLayout {
    /// Run of consecutive same-named tags, no wrapper and no count
    Static,
    /// Single `ArrayProperty` tag with an entry count
    Dynamic,
}

/// Array value
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    /// Counted array of bare values. Struct elements use
    /// [`StructValue::element`].
    Dynamic {
        element: PropertyKind,
        items: Vec<PropertyValue>,
    },
    /// Run of tagged properties sharing the array's name; each element keeps
    /// its own array index.
    Static {
        element: PropertyKind,
        items: Vec<Property>,
    },
}

impl ArrayValue {
    pub fn element(&self) -> PropertyKind {
        match self {
            ArrayValue::Dynamic { element, .. } | ArrayValue::Static { element, .. } => *element,
        }
    }

    pub fn layout(&self) -> ArrayLayout {
        match self {
            ArrayValue::Dynamic { .. } => ArrayLayout::Dynamic,
            ArrayValue::Static { .. } => ArrayLayout::Static,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayValue::Dynamic { items, .. } => items.len(),
            ArrayValue::Static { items, .. } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name_round_trip() {
        for kind in PropertyKind::ALL {
            assert_eq!(PropertyKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(PropertyKind::from_type_name("ObjectProperty"), None);
        assert_eq!(PropertyKind::from_type_name("intproperty"), None);
    }

    #[test]
    fn test_enum_is_byte_kind() {
        let value = PropertyValue::Enum {
            enum_name: "eFoo".into(),
            value: "Bar".into(),
        };
        assert_eq!(value.kind(), PropertyKind::Byte);
        assert_eq!(PropertyValue::Byte(3).kind(), PropertyKind::Byte);
    }

    #[test]
    fn test_new_computes_size() {
        let gold = Property::new("Gold", PropertyValue::Int(100));
        assert_eq!(gold.tag.kind, PropertyKind::Int);
        assert_eq!(gold.tag.size, 4);
        assert_eq!(gold.tag.array_index, 0);

        let title = Property::new("Title", PropertyValue::Str("abc".into()));
        assert_eq!(title.tag.size, 4 + 3 + 1);

        let flag = Property::indexed("bFlag", 2, PropertyValue::Bool(true));
        assert_eq!(flag.tag.size, 0);
        assert_eq!(flag.tag.array_index, 2);
    }
}
