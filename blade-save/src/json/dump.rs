//! Property tree to JSON

use serde_json::{Map, Number, Value};

use crate::error::{Result, SaveError};
use crate::property::{ArrayValue, Property, PropertyKind, PropertyValue, StructValue};
use crate::registry::ArrayRegistry;
use crate::{BYTE_KEY_PREFIX, ENUM_KEY_PREFIX, NAME_KEY_PREFIX, STRUCT_TYPE_KEY};

/// Convert a property list into a JSON object.
///
/// Fails with [`SaveError::AmbiguousKey`] when some property would come back
/// as a different kind or name after [`crate::json::crunch`].
pub fn dump(properties: &[Property], registry: &ArrayRegistry) -> Result<Value> {
    Dumper { registry }.object(properties).map(Value::Object)
}

struct Dumper<'r> {
    registry: &'r ArrayRegistry,
}

impl Dumper<'_> {
    fn object(&self, properties: &[Property]) -> Result<Map<String, Value>> {
        let mut map = Map::with_capacity(properties.len());
        for property in properties {
            let (key, value) = self.property(property)?;
            insert_unique(&mut map, key, value)?;
        }
        Ok(map)
    }

    fn property(&self, property: &Property) -> Result<(String, Value)> {
        let name = property.name();
        let registry = self.registry;

        // Only static array elements keep their index in JSON
        let is_static = matches!(property.value, PropertyValue::Array(ArrayValue::Static { .. }));
        if !is_static && property.tag.array_index != 0 {
            return Err(ambiguous(name, "array index is lost outside a static array"));
        }

        let (key, value) = match &property.value {
            PropertyValue::Array(array) => return self.array(name, array),
            PropertyValue::Int(v) => {
                if name.starts_with(BYTE_KEY_PREFIX) && !registry.is_byte_prefixed_int(name) {
                    return Err(ambiguous(name, "integer name reads back as a byte"));
                }
                (name.to_string(), Value::from(*v))
            }
            PropertyValue::Float(v) => (name.to_string(), float(name, *v)?),
            PropertyValue::Bool(v) => (name.to_string(), Value::Bool(*v)),
            PropertyValue::Byte(v) => {
                let key = format!("{BYTE_KEY_PREFIX}{name}");
                if registry.is_byte_prefixed_int(&key) {
                    return Err(ambiguous(name, "byte key reads back as an integer"));
                }
                (key, Value::from(*v))
            }
            PropertyValue::Enum { enum_name, value } => {
                let key = if registry.is_enum_prefixed_name(name) {
                    name.to_string()
                } else {
                    let key = format!("{ENUM_KEY_PREFIX}{name}");
                    if registry.is_enum_prefixed_name(&key) {
                        return Err(ambiguous(name, "enum key collides with a prefixed enum name"));
                    }
                    key
                };
                if enum_name == STRUCT_TYPE_KEY {
                    return Err(ambiguous(name, "enum type name is reserved"));
                }
                (key, enum_object(enum_name, value))
            }
            PropertyValue::Str(s) => {
                if name.starts_with(NAME_KEY_PREFIX) {
                    return Err(ambiguous(name, "string name reads back as a name property"));
                }
                (name.to_string(), Value::String(s.clone()))
            }
            PropertyValue::Name(s) => (format!("{NAME_KEY_PREFIX}{name}"), Value::String(s.clone())),
            PropertyValue::Struct(s) => {
                let object = self.structure(s, registry.struct_alias(name))?;
                if name.starts_with(ENUM_KEY_PREFIX) && has_enum_shape(&object) {
                    return Err(ambiguous(name, "struct reads back as an enum"));
                }
                (name.to_string(), Value::Object(object))
            }
        };

        if registry.lookup(&key).is_some() {
            return Err(ambiguous(&key, "key is registered as an array"));
        }
        Ok((key, value))
    }

    /// Struct fields, with the type name carried only when it is not the
    /// expected one
    fn structure(&self, value: &StructValue, expected: &str) -> Result<Map<String, Value>> {
        let mut map = Map::with_capacity(value.fields.len() + 1);
        if let Some(type_name) = value.type_name.as_deref().filter(|t| *t != expected) {
            map.insert(STRUCT_TYPE_KEY.to_string(), Value::String(type_name.to_string()));
        }
        for field in &value.fields {
            let (key, value) = self.property(field)?;
            insert_unique(&mut map, key, value)?;
        }
        Ok(map)
    }

    fn array(&self, name: &str, array: &ArrayValue) -> Result<(String, Value)> {
        let metadata = self
            .registry
            .lookup(name)
            .ok_or_else(|| SaveError::MissingArrayMetadata {
                name: name.to_string(),
            })?;
        if metadata.layout != array.layout() || metadata.element != array.element() {
            return Err(ambiguous(name, "array layout or element kind differs from the registry"));
        }

        let value = match array {
            ArrayValue::Dynamic { items, .. } => Value::Array(
                items
                    .iter()
                    .map(|item| self.element(name, item))
                    .collect::<Result<_>>()?,
            ),
            ArrayValue::Static { element, items } => self.static_array(name, *element, items)?,
        };
        Ok((name.to_string(), value))
    }

    fn static_array(&self, name: &str, element: PropertyKind, items: &[Property]) -> Result<Value> {
        for item in items {
            if item.name() != name {
                return Err(ambiguous(item.name(), "static array element is named differently"));
            }
            if item.value.kind() != element {
                return Err(ambiguous(name, "static array element kind differs from the registry"));
            }
            if item.tag.array_index < 0 {
                return Err(ambiguous(name, "static array element has a negative index"));
            }
        }

        let contiguous = items
            .iter()
            .enumerate()
            .all(|(i, item)| usize::try_from(item.tag.array_index).ok() == Some(i));
        let expected = self.registry.struct_alias(name);

        if contiguous && self.registry.index_names(name).is_none() {
            let values = items
                .iter()
                .map(|item| self.static_element(name, item, expected))
                .collect::<Result<_>>()?;
            return Ok(Value::Array(values));
        }

        let mut map = Map::with_capacity(items.len());
        for item in items {
            let key = self.registry.index_name(name, item.tag.array_index);
            let value = self.static_element(name, item, expected)?;
            insert_unique(&mut map, key, value)?;
        }
        Ok(Value::Object(map))
    }

    fn static_element(&self, name: &str, item: &Property, expected: &str) -> Result<Value> {
        match &item.value {
            PropertyValue::Struct(s) => self.structure(s, expected).map(Value::Object),
            PropertyValue::Enum { enum_name, value } => Ok(enum_object(enum_name, value)),
            other => self.element(name, other),
        }
    }

    /// Bare value inside an array
    fn element(&self, name: &str, item: &PropertyValue) -> Result<Value> {
        let value = match item {
            PropertyValue::Int(v) => Value::from(*v),
            PropertyValue::Float(v) => float(name, *v)?,
            PropertyValue::Bool(v) => Value::Bool(*v),
            PropertyValue::Byte(v) => Value::from(*v),
            PropertyValue::Str(s) | PropertyValue::Name(s) => Value::String(s.clone()),
            // Array elements never carry a type name
            PropertyValue::Struct(s) => {
                Value::Object(self.structure(s, s.type_name.as_deref().unwrap_or(""))?)
            }
            PropertyValue::Enum { .. } | PropertyValue::Array(_) => {
                return Err(SaveError::UnsupportedArrayElement {
                    name: name.to_string(),
                    element: item.kind(),
                });
            }
        };
        Ok(value)
    }
}

/// JSON number for a float, using its shortest decimal form
fn float(name: &str, value: f32) -> Result<Value> {
    let widened = value.to_string().parse::<f64>().ok();
    widened
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| SaveError::ValueFormat {
            property: name.to_string(),
            expected: "finite float",
            found: value.to_string(),
        })
}

fn enum_object(enum_name: &str, value: &str) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(enum_name.to_string(), Value::String(value.to_string()));
    Value::Object(map)
}

/// Single string member under any key but the struct type key
pub(super) fn has_enum_shape(object: &Map<String, Value>) -> bool {
    let mut members = object.iter();
    match (members.next(), members.next()) {
        (Some((key, Value::String(_))), None) => key != STRUCT_TYPE_KEY,
        _ => false,
    }
}

fn insert_unique(map: &mut Map<String, Value>, key: String, value: Value) -> Result<()> {
    if map.contains_key(&key) {
        return Err(ambiguous(&key, "duplicate key"));
    }
    map.insert(key, value);
    Ok(())
}

fn ambiguous(key: &str, reason: &'static str) -> SaveError {
    SaveError::AmbiguousKey {
        key: key.to_string(),
        reason,
    }
}
