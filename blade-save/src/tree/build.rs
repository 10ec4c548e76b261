//! Tag stream decoding

use crate::error::{Result, SaveError};
use crate::property::{
    ArrayValue, Property, PropertyKind, PropertyTag, PropertyValue, StructValue,
};
use crate::reader::TagReader;
use crate::registry::ArrayRegistry;
use crate::tree::size;
use crate::{MAX_NESTING_DEPTH, MAX_STATIC_ARRAY_ELEMENTS, TERMINATOR};

/// Decode top-level properties until the terminator or the end of the buffer.
///
/// The reader is left just past the terminator, so callers can check for
/// trailing bytes.
///
/// # Example
/// ```ignore
/// let mut reader = TagReader::at(&bytes, SaveHeader::SIZE);
/// let properties = build_tree(&mut reader, &registry)?;
/// ```
pub fn build_tree(reader: &mut TagReader<'_>, registry: &ArrayRegistry) -> Result<Vec<Property>> {
    let mut builder = TreeBuilder {
        reader,
        registry,
        depth: 0,
    };
    let mut properties = Vec::new();

    while !builder.reader.is_eof() {
        let Some(property) = builder.read_property(true)? else {
            break;
        };
        tracing::debug!(
            "Decoded {} ({}) ending at offset {}",
            property.name(),
            property.value.kind().type_name(),
            builder.reader.position()
        );
        properties.push(property);
    }

    Ok(properties)
}

/// Recursive-descent state for one decode
struct TreeBuilder<'r, 'a> {
    reader: &'r mut TagReader<'a>,
    registry: &'r ArrayRegistry,
    depth: usize,
}

impl TreeBuilder<'_, '_> {
    /// Read one tag, or `None` at a terminator.
    ///
    /// With `detect_static` set, a name registered as a static array rewinds
    /// and reads the whole run of same-named tags instead.
    fn read_property(&mut self, detect_static: bool) -> Result<Option<Property>> {
        let offset = self.reader.position();
        let name = self.reader.read_string()?;
        if name == TERMINATOR {
            return Ok(None);
        }

        if detect_static && self.registry.is_static(&name) {
            self.reader.revert_position();
            return self.read_static_array(name).map(Some);
        }

        let type_name = self.reader.read_string()?;
        let kind = PropertyKind::from_type_name(&type_name).ok_or_else(|| {
            SaveError::UnknownPropertyType {
                name: name.clone(),
                type_name,
                offset,
            }
        })?;
        let declared = self.reader.read_i32()?;
        let array_index = self.reader.read_i32()?;

        let value = self.read_value(&name, kind, offset)?;

        let computed = size::declared_size(&value);
        if usize::try_from(declared).ok() != Some(computed) {
            tracing::warn!(
                "{} at offset {} declares size {} but its value encodes to {}",
                name,
                offset,
                declared,
                computed
            );
        }

        Ok(Some(Property {
            tag: PropertyTag {
                name,
                kind,
                size: declared,
                array_index,
            },
            value,
        }))
    }

    fn read_value(&mut self, name: &str, kind: PropertyKind, offset: usize) -> Result<PropertyValue> {
        let value = match kind {
            PropertyKind::Int => PropertyValue::Int(self.reader.read_i32()?),
            PropertyKind::Float => PropertyValue::Float(self.reader.read_f32()?),
            PropertyKind::Bool => PropertyValue::Bool(self.reader.read_bool()?),
            PropertyKind::Byte => {
                let enum_name = self.reader.read_string()?;
                if enum_name == TERMINATOR {
                    PropertyValue::Byte(self.reader.read_u8()?)
                } else {
                    let value = self.reader.read_string()?;
                    PropertyValue::Enum { enum_name, value }
                }
            }
            PropertyKind::Str => PropertyValue::Str(self.reader.read_string()?),
            PropertyKind::Name => PropertyValue::Name(self.reader.read_string()?),
            PropertyKind::Struct => {
                let type_name = self.reader.read_string()?;
                let fields = self.read_fields(name, offset)?;
                PropertyValue::Struct(StructValue::named(type_name, fields))
            }
            PropertyKind::Array => self.read_dynamic_array(name, offset)?,
        };
        Ok(value)
    }

    /// Fields of a struct body up to and including its terminator
    fn read_fields(&mut self, name: &str, offset: usize) -> Result<Vec<Property>> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SaveError::NestingTooDeep {
                name: name.to_string(),
                limit: MAX_NESTING_DEPTH,
                offset,
            });
        }
        self.depth += 1;

        let mut fields = Vec::new();
        // EOF inside a struct surfaces as an error from the name read
        while let Some(field) = self.read_property(true)? {
            fields.push(field);
        }

        self.depth -= 1;
        Ok(fields)
    }

    fn read_dynamic_array(&mut self, name: &str, offset: usize) -> Result<PropertyValue> {
        let count = self.reader.read_i32()?;
        let metadata = self
            .registry
            .lookup(name)
            .ok_or_else(|| SaveError::MissingArrayMetadata {
                name: name.to_string(),
            })?;
        let element = metadata.element;

        let count = usize::try_from(count).map_err(|_| SaveError::InvalidEntryCount {
            name: name.to_string(),
            count,
            offset,
        })?;
        if count == 0 {
            return Ok(PropertyValue::Array(ArrayValue::Dynamic {
                element,
                items: Vec::new(),
            }));
        }

        // Every element is at least one byte
        let mut items = Vec::with_capacity(count.min(self.reader.remaining()));
        for _ in 0..count {
            let item = match element {
                PropertyKind::Int => PropertyValue::Int(self.reader.read_i32()?),
                PropertyKind::Float => PropertyValue::Float(self.reader.read_f32()?),
                PropertyKind::Bool => PropertyValue::Bool(self.reader.read_bool()?),
                PropertyKind::Byte => PropertyValue::Byte(self.reader.read_u8()?),
                PropertyKind::Str => PropertyValue::Str(self.reader.read_string()?),
                PropertyKind::Name => PropertyValue::Name(self.reader.read_string()?),
                PropertyKind::Struct => {
                    PropertyValue::Struct(StructValue::element(self.read_fields(name, offset)?))
                }
                PropertyKind::Array => {
                    return Err(SaveError::UnsupportedArrayElement {
                        name: name.to_string(),
                        element,
                    });
                }
            };
            items.push(item);
        }

        Ok(PropertyValue::Array(ArrayValue::Dynamic { element, items }))
    }

    /// Collect consecutive tags named `name` into one array.
    ///
    /// The cursor starts at the first element's name and ends at the first
    /// tag with a different name, which is left unread.
    fn read_static_array(&mut self, name: String) -> Result<Property> {
        let offset = self.reader.position();
        let element = self
            .registry
            .lookup(&name)
            .map_or(PropertyKind::Int, |metadata| metadata.element);

        let mut items = Vec::new();
        while !self.reader.is_eof() && self.reader.peek_string()? == name {
            if items.len() >= MAX_STATIC_ARRAY_ELEMENTS {
                return Err(SaveError::StaticArrayOverflow {
                    name,
                    limit: MAX_STATIC_ARRAY_ELEMENTS,
                    offset: self.reader.position(),
                });
            }
            let Some(item) = self.read_property(false)? else {
                break;
            };
            if item.value.kind() != element {
                tracing::warn!(
                    "{}[{}] at offset {} is {} but the array holds {}",
                    name,
                    item.tag.array_index,
                    offset,
                    item.value.kind().type_name(),
                    element.type_name()
                );
            }
            items.push(item);
        }

        tracing::trace!(
            "Static array {} has {} elements ({} bytes)",
            name,
            items.len(),
            self.reader.position() - offset
        );

        Ok(Property {
            tag: PropertyTag {
                name,
                kind: PropertyKind::Array,
                size: 0,
                array_index: 0,
            },
            value: PropertyValue::Array(ArrayValue::Static { element, items }),
        })
    }
}
