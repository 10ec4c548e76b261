//! Tag stream encoding

use crate::TERMINATOR;
use crate::error::{Result, SaveError};
use crate::property::{ArrayValue, Property, PropertyKind, PropertyValue};
use crate::tree::size;
use crate::writer::TagWriter;

/// Encode top-level properties followed by the closing terminator.
///
/// Declared sizes in the tags are ignored; every size field is measured from
/// the bytes actually written and patched in afterwards.
pub fn write_tree(writer: &mut TagWriter, properties: &[Property]) -> Result<()> {
    for property in properties {
        write_property(writer, property)?;
        tracing::debug!(
            "Encoded {} ({}) ending at offset {}",
            property.name(),
            property.value.kind().type_name(),
            writer.position()
        );
    }
    writer.write_string(TERMINATOR)?;
    Ok(())
}

fn write_fields(writer: &mut TagWriter, fields: &[Property]) -> Result<()> {
    for field in fields {
        write_property(writer, field)?;
    }
    writer.write_string(TERMINATOR)?;
    Ok(())
}

fn write_property(writer: &mut TagWriter, property: &Property) -> Result<()> {
    // Static arrays have no tag of their own
    if let PropertyValue::Array(ArrayValue::Static { items, .. }) = &property.value {
        for item in items {
            write_property(writer, item)?;
        }
        return Ok(());
    }

    let name = property.name();
    writer.write_string(name)?;
    writer.write_string(property.value.kind().type_name())?;
    let size_slot = writer.reserve_i32();
    writer.write_i32(property.tag.array_index);

    let declared = write_value(writer, name, &property.value)?;
    debug_assert_eq!(declared, size::declared_size(&property.value), "{name}");
    writer.patch_i32(size_slot, encode_len(name, declared)?);
    Ok(())
}

/// Write a tag body, returning the length the tag must declare
fn write_value(writer: &mut TagWriter, name: &str, value: &PropertyValue) -> Result<usize> {
    match value {
        PropertyValue::Int(v) => measured(writer, |w| {
            w.write_i32(*v);
            Ok(())
        }),
        PropertyValue::Float(v) => measured(writer, |w| {
            w.write_f32(*v);
            Ok(())
        }),
        PropertyValue::Bool(v) => {
            // Not counted in the declared size
            writer.write_bool(*v);
            Ok(0)
        }
        PropertyValue::Byte(v) => {
            writer.write_string(TERMINATOR)?;
            measured(writer, |w| {
                w.write_u8(*v);
                Ok(())
            })
        }
        PropertyValue::Enum { enum_name, value } => {
            writer.write_string(enum_name)?;
            measured(writer, |w| {
                w.write_string(value)?;
                Ok(())
            })
        }
        PropertyValue::Str(s) | PropertyValue::Name(s) => measured(writer, |w| {
            w.write_string(s)?;
            Ok(())
        }),
        PropertyValue::Struct(s) => {
            writer.write_string(s.type_name.as_deref().unwrap_or(""))?;
            measured(writer, |w| write_fields(w, &s.fields))
        }
        PropertyValue::Array(ArrayValue::Dynamic { element, items }) => {
            measured(writer, |w| {
                w.write_i32(encode_len(name, items.len())?);
                for item in items {
                    write_element(w, name, *element, item)?;
                }
                Ok(())
            })
        }
        PropertyValue::Array(ArrayValue::Static { .. }) => Err(SaveError::UnsupportedArrayElement {
            name: name.to_string(),
            element: PropertyKind::Array,
        }),
    }
}

/// One element of a dynamic array: no tag, no length prefix
fn write_element(
    writer: &mut TagWriter,
    name: &str,
    element: PropertyKind,
    item: &PropertyValue,
) -> Result<()> {
    match item {
        PropertyValue::Int(v) => writer.write_i32(*v),
        PropertyValue::Float(v) => writer.write_f32(*v),
        PropertyValue::Bool(v) => writer.write_bool(*v),
        PropertyValue::Byte(v) => writer.write_u8(*v),
        PropertyValue::Str(s) | PropertyValue::Name(s) => writer.write_string(s)?,
        // No type name: elements share the array's struct type
        PropertyValue::Struct(s) => write_fields(writer, &s.fields)?,
        PropertyValue::Enum { .. } | PropertyValue::Array(_) => {
            return Err(SaveError::UnsupportedArrayElement {
                name: name.to_string(),
                element,
            });
        }
    }
    Ok(())
}

fn measured(
    writer: &mut TagWriter,
    body: impl FnOnce(&mut TagWriter) -> Result<()>,
) -> Result<usize> {
    let start = writer.position();
    body(writer)?;
    Ok(writer.position() - start)
}

fn encode_len(name: &str, len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| SaveError::SizeOverflow {
        name: name.to_string(),
    })
}
