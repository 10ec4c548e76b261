//! JSON bridge
//!
//! JSON has fewer types than the tag grammar, so the property kind is
//! carried in the key and the shape of each value:
//!
//! | Property            | JSON key               | JSON value                      |
//! |---------------------|------------------------|---------------------------------|
//! | Int                 | `Name`                 | integer                         |
//! | Float               | `Name`                 | number with a decimal point     |
//! | Bool                | `Name`                 | `true` / `false`                |
//! | Byte                | `bName`                | integer 0-255                   |
//! | Enum byte           | `eName`                | `{"EnumType": "Value"}`         |
//! | Str                 | `Name`                 | string                          |
//! | Name                | `ini_Name`             | string                          |
//! | Struct              | `Name`                 | object (`"$struct"` if renamed) |
//! | Dynamic array       | `Name`                 | array                           |
//! | Static array        | `Name`                 | array, or object keyed by index |
//!
//! - `dump` - Property tree to JSON
//! - `crunch` - JSON back to a property tree
//! - `tests` - Bridge round trips and ambiguity checks

mod crunch;
mod dump;

#[cfg(test)]
mod tests;

use std::io;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};

use crate::error::Result;

pub use crunch::crunch;
pub use dump::dump;

/// Render JSON text.
///
/// Floats are always written with a decimal point and never in exponent
/// form, so `5` stays distinguishable from `5.0` after a hand edit.
pub fn to_json_string(value: &Value, pretty: bool) -> Result<String> {
    let mut out = Vec::with_capacity(4096);
    if pretty {
        let formatter = DecimalFloats(PrettyFormatter::with_indent(b"  "));
        value.serialize(&mut Serializer::with_formatter(&mut out, formatter))?;
    } else {
        let formatter = DecimalFloats(CompactFormatter);
        value.serialize(&mut Serializer::with_formatter(&mut out, formatter))?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Parse JSON text
pub fn from_json_str(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Formatter adapter that prints `f64` in plain decimal notation
struct DecimalFloats<F>(F);

impl<F: Formatter> Formatter for DecimalFloats<F> {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let text = value.to_string();
        writer.write_all(text.as_bytes())?;
        if !text.contains('.') {
            writer.write_all(b".0")?;
        }
        Ok(())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_object_key(writer, first)
    }

    fn end_object_key<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_object_key(writer)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.0.end_object_value(writer)
    }
}
