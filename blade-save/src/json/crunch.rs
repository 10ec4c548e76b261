//! JSON to property tree ("crunching")

use serde_json::{Map, Value};

use super::dump::has_enum_shape;
use crate::error::{Result, SaveError};
use crate::property::{ArrayValue, Property, PropertyKind, PropertyValue, StructValue};
use crate::registry::{ArrayMetadata, ArrayRegistry};
use crate::{BYTE_KEY_PREFIX, ENUM_KEY_PREFIX, NAME_KEY_PREFIX, STRUCT_TYPE_KEY, TERMINATOR};

/// Rebuild a property list from a JSON object produced by
/// [`crate::json::dump`] (and possibly edited since).
///
/// The first value that does not fit its key aborts the whole conversion.
pub fn crunch(json: &Value, registry: &ArrayRegistry) -> Result<Vec<Property>> {
    let Value::Object(object) = json else {
        return Err(SaveError::value_format("<root>", "object", json));
    };
    Cruncher { registry }.object(object)
}

struct Cruncher<'r> {
    registry: &'r ArrayRegistry,
}

impl Cruncher<'_> {
    fn object(&self, object: &Map<String, Value>) -> Result<Vec<Property>> {
        object
            .iter()
            .filter(|(key, _)| key.as_str() != STRUCT_TYPE_KEY)
            .map(|(key, value)| self.property(key, value))
            .collect()
    }

    fn property(&self, key: &str, value: &Value) -> Result<Property> {
        let registry = self.registry;
        if let Some(metadata) = registry.lookup(key) {
            return self.array(key, metadata, value);
        }

        let property = match value {
            Value::Bool(b) => Property::new(key, PropertyValue::Bool(*b)),
            Value::Number(n) if n.is_f64() => Property::new(key, PropertyValue::Float(float(key, value)?)),
            Value::Number(_) => match key.strip_prefix(BYTE_KEY_PREFIX) {
                Some(name) if !registry.is_byte_prefixed_int(key) => {
                    Property::new(name, PropertyValue::Byte(byte(key, value)?))
                }
                _ => Property::new(key, PropertyValue::Int(int(key, value)?)),
            },
            Value::String(s) => match key.strip_prefix(NAME_KEY_PREFIX) {
                Some(name) => Property::new(name, PropertyValue::Name(s.clone())),
                None => Property::new(key, PropertyValue::Str(s.clone())),
            },
            Value::Object(object) => match key.strip_prefix(ENUM_KEY_PREFIX) {
                Some(stripped) if has_enum_shape(object) => {
                    let name = if registry.is_enum_prefixed_name(key) {
                        key
                    } else {
                        stripped
                    };
                    Property::new(name, enum_value(key, object)?)
                }
                _ => {
                    let type_name = match struct_type(key, object)? {
                        Some(type_name) => type_name,
                        None => registry.struct_alias(key).to_string(),
                    };
                    let fields = self.object(object)?;
                    Property::new(key, PropertyValue::Struct(StructValue::named(type_name, fields)))
                }
            },
            Value::Array(_) => {
                return Err(SaveError::MissingArrayMetadata {
                    name: key.to_string(),
                });
            }
            Value::Null => return Err(SaveError::value_format(key, "a value", value)),
        };
        Ok(property)
    }

    fn array(&self, name: &str, metadata: &ArrayMetadata, value: &Value) -> Result<Property> {
        let element = metadata.element;
        let array = if metadata.is_static() {
            let items = match value {
                Value::Array(values) => values
                    .iter()
                    .enumerate()
                    .map(|(index, value)| -> Result<Property> {
                        let index = i32::try_from(index).map_err(|_| SaveError::SizeOverflow {
                            name: name.to_string(),
                        })?;
                        Ok(Property::indexed(name, index, self.static_element(name, metadata, value)?))
                    })
                    .collect::<Result<Vec<_>>>()?,
                Value::Object(entries) => entries
                    .iter()
                    .map(|(key, value)| -> Result<Property> {
                        let index = self.registry.index_of(name, key).ok_or_else(|| {
                            SaveError::UnknownIndexName {
                                array: name.to_string(),
                                key: key.clone(),
                            }
                        })?;
                        Ok(Property::indexed(name, index, self.static_element(name, metadata, value)?))
                    })
                    .collect::<Result<Vec<_>>>()?,
                other => return Err(SaveError::value_format(name, "array or object", other)),
            };
            ArrayValue::Static { element, items }
        } else {
            let Value::Array(values) = value else {
                return Err(SaveError::value_format(name, "array", value));
            };
            let items = values
                .iter()
                .map(|value| self.element(name, element, value))
                .collect::<Result<Vec<_>>>()?;
            ArrayValue::Dynamic { element, items }
        };
        Ok(Property::new(name, PropertyValue::Array(array)))
    }

    /// Value of one element of a static array
    fn static_element(&self, name: &str, metadata: &ArrayMetadata, value: &Value) -> Result<PropertyValue> {
        match (metadata.element, value) {
            (PropertyKind::Struct, Value::Object(object)) => {
                let type_name = match struct_type(name, object)? {
                    Some(type_name) => type_name,
                    None => self.registry.struct_alias(name).to_string(),
                };
                Ok(PropertyValue::Struct(StructValue::named(type_name, self.object(object)?)))
            }
            (PropertyKind::Byte, Value::Object(object)) if has_enum_shape(object) => {
                enum_value(name, object)
            }
            (element, value) => self.element(name, element, value),
        }
    }

    /// Bare element of a dynamic array
    fn element(&self, name: &str, element: PropertyKind, value: &Value) -> Result<PropertyValue> {
        let item = match element {
            PropertyKind::Int => PropertyValue::Int(int(name, value)?),
            PropertyKind::Float => PropertyValue::Float(float(name, value)?),
            PropertyKind::Bool => match value {
                Value::Bool(b) => PropertyValue::Bool(*b),
                other => return Err(SaveError::value_format(name, "boolean", other)),
            },
            PropertyKind::Byte => PropertyValue::Byte(byte(name, value)?),
            PropertyKind::Str => PropertyValue::Str(string(name, value)?),
            PropertyKind::Name => PropertyValue::Name(string(name, value)?),
            PropertyKind::Struct => {
                let Value::Object(object) = value else {
                    return Err(SaveError::value_format(name, "object", value));
                };
                // Array elements have no type name in the stream
                if let Some(type_name) = object.get(STRUCT_TYPE_KEY) {
                    return Err(SaveError::value_format(
                        name,
                        "array element without a struct type",
                        type_name,
                    ));
                }
                PropertyValue::Struct(StructValue::element(self.object(object)?))
            }
            PropertyKind::Array => {
                return Err(SaveError::UnsupportedArrayElement {
                    name: name.to_string(),
                    element,
                });
            }
        };
        Ok(item)
    }
}

fn int(name: &str, value: &Value) -> Result<i32> {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| SaveError::value_format(name, "32-bit integer", value))
}

fn byte(name: &str, value: &Value) -> Result<u8> {
    value
        .as_u64()
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| SaveError::value_format(name, "byte (0-255)", value))
}

fn float(name: &str, value: &Value) -> Result<f32> {
    value
        .as_f64()
        .map(|v| v as f32)
        .filter(|v| v.is_finite())
        .ok_or_else(|| SaveError::value_format(name, "32-bit float", value))
}

fn string(name: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SaveError::value_format(name, "string", value))
}

/// Explicit struct type name, if the object carries one
fn struct_type(name: &str, object: &Map<String, Value>) -> Result<Option<String>> {
    match object.get(STRUCT_TYPE_KEY) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(SaveError::value_format(name, "struct type name string", other)),
    }
}

fn enum_value(name: &str, object: &Map<String, Value>) -> Result<PropertyValue> {
    match object.iter().next() {
        // A terminator here would read back as a plain byte
        Some((enum_name, _)) if enum_name == TERMINATOR => Err(SaveError::value_format(
            name,
            "enum type name",
            &Value::String(enum_name.clone()),
        )),
        Some((enum_name, Value::String(value))) => Ok(PropertyValue::Enum {
            enum_name: enum_name.clone(),
            value: value.clone(),
        }),
        _ => Err(SaveError::value_format(
            name,
            "single enum name and value",
            &Value::Object(object.clone()),
        )),
    }
}
