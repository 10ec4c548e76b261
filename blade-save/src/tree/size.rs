//! Encoded sizes of tree nodes
//!
//! The declared size in a tag does not always cover every byte after the
//! header. The conventions, per value kind:
//!
//! | Value            | Declared size            | Extra body bytes          |
//! |------------------|--------------------------|---------------------------|
//! | Int / Float      | 4                        | -                         |
//! | Bool             | 0                        | 1 (the value)             |
//! | Byte             | 1                        | terminator string         |
//! | Enum byte        | enum value string        | enum name string          |
//! | Str / Name       | the string               | -                         |
//! | Struct           | fields + terminator      | struct type name string   |
//! | Dynamic array    | 4 (count) + elements     | -                         |
//! | Static array     | no wrapper tag           | -                         |

use crate::TERMINATOR;
use crate::property::{ArrayValue, Property, PropertyValue};

/// Width of every fixed-size numeric field
pub const INT_WIDTH: usize = 4;

/// Encoded length of a length-prefixed string
pub fn string_size(value: &str) -> usize {
    if value.is_empty() {
        INT_WIDTH
    } else {
        INT_WIDTH + value.len() + 1
    }
}

/// Tag header: name, type, size and array index
pub fn header_size(name: &str, type_name: &str) -> usize {
    string_size(name) + string_size(type_name) + INT_WIDTH + INT_WIDTH
}

/// Size declared in the tag for `value`
pub fn declared_size(value: &PropertyValue) -> usize {
    match value {
        PropertyValue::Int(_) | PropertyValue::Float(_) => INT_WIDTH,
        PropertyValue::Bool(_) => 0,
        PropertyValue::Byte(_) => 1,
        PropertyValue::Enum { value, .. } => string_size(value),
        PropertyValue::Str(s) | PropertyValue::Name(s) => string_size(s),
        PropertyValue::Struct(s) => fields_size(&s.fields),
        PropertyValue::Array(ArrayValue::Dynamic { items, .. }) => {
            INT_WIDTH + items.iter().map(element_size).sum::<usize>()
        }
        PropertyValue::Array(ArrayValue::Static { .. }) => 0,
    }
}

/// Bytes written after the tag header
pub fn body_size(value: &PropertyValue) -> usize {
    let extra = match value {
        PropertyValue::Bool(_) => 1,
        PropertyValue::Byte(_) => string_size(TERMINATOR),
        PropertyValue::Enum { enum_name, .. } => string_size(enum_name),
        // A tagged struct always carries its type name, empty or not
        PropertyValue::Struct(s) => string_size(s.type_name.as_deref().unwrap_or("")),
        _ => 0,
    };
    declared_size(value) + extra
}

/// Full encoded length of a property, header included.
///
/// A static array has no header of its own; its length is the length of its
/// run of element tags.
pub fn tag_size(property: &Property) -> usize {
    match &property.value {
        PropertyValue::Array(ArrayValue::Static { items, .. }) => items.iter().map(tag_size).sum(),
        value => header_size(&property.tag.name, value.kind().type_name()) + body_size(value),
    }
}

/// Length of a field list including its closing terminator
pub fn fields_size(fields: &[Property]) -> usize {
    fields.iter().map(tag_size).sum::<usize>() + string_size(TERMINATOR)
}

/// Length of one dynamic array element
pub fn element_size(item: &PropertyValue) -> usize {
    match item {
        PropertyValue::Bool(_) | PropertyValue::Byte(_) => 1,
        PropertyValue::Struct(s) => fields_size(&s.fields),
        other => declared_size(other),
    }
}

/// Rewrite every declared size in the tree from its current contents.
///
/// Needed after editing a tree in place; the writer does not rely on it.
pub fn refresh_sizes(properties: &mut [Property]) {
    for property in properties {
        refresh_property(property);
    }
}

fn refresh_property(property: &mut Property) {
    match &mut property.value {
        PropertyValue::Struct(s) => refresh_sizes(&mut s.fields),
        PropertyValue::Array(ArrayValue::Static { items, .. }) => refresh_sizes(items),
        PropertyValue::Array(ArrayValue::Dynamic { items, .. }) => {
            for item in items {
                if let PropertyValue::Struct(s) = item {
                    refresh_sizes(&mut s.fields);
                }
            }
        }
        _ => {}
    }
    property.tag.kind = property.value.kind();
    property.tag.size = i32::try_from(declared_size(&property.value)).unwrap_or(i32::MAX);
}
