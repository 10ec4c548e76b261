//! Array metadata registry
//!
//! The tag stream does not say how an array's elements are encoded, and a
//! static array has no tag of its own at all. Both directions of the codec
//! therefore consult a per-title table keyed by property name.
//!
//! Besides the array table the registry holds the other per-title naming
//! data the JSON bridge needs: index-name enumerations for static arrays,
//! expected struct type names, and the handful of property names that
//! collide with the JSON key prefixes.

mod titles;

use std::sync::OnceLock;

use hashbrown::{HashMap, HashSet};

use crate::package::Title;
use crate::property::{ArrayLayout, PropertyKind};

/// How one array-typed property is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayMetadata {
    pub element: PropertyKind,
    pub layout: ArrayLayout,
    /// Struct type name carried by each element of a static struct array
    pub struct_name: Option<&'static str>,
}

impl ArrayMetadata {
    /// Counted array behind an `ArrayProperty` tag
    pub const fn dynamic(element: PropertyKind) -> Self {
        Self {
            element,
            layout: ArrayLayout::Dynamic,
            struct_name: None,
        }
    }

    /// Run of same-named tags with no wrapper
    pub const fn fixed(element: PropertyKind) -> Self {
        Self {
            element,
            layout: ArrayLayout::Static,
            struct_name: None,
        }
    }

    pub const fn with_struct_name(mut self, name: &'static str) -> Self {
        self.struct_name = Some(name);
        self
    }

    pub fn is_static(&self) -> bool {
        self.layout == ArrayLayout::Static
    }
}

/// Immutable lookup tables for one title.
///
/// Built once with [`ArrayRegistry::for_title`] and shared read-only by every
/// decode and encode in the session.
#[derive(Debug, Clone, Default)]
pub struct ArrayRegistry {
    arrays: HashMap<String, ArrayMetadata>,
    index_names: HashMap<String, &'static [&'static str]>,
    struct_aliases: HashMap<String, &'static str>,
    byte_prefixed_ints: HashSet<String>,
    enum_prefixed_names: HashSet<String>,
}

impl ArrayRegistry {
    /// Registry with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// Tables for a supported title
    pub fn for_title(title: Title) -> Self {
        let mut registry = Self::empty();
        for &(name, metadata) in titles::arrays(title) {
            registry = registry.with_array(name, metadata);
        }
        for &(name, names) in titles::index_names(title) {
            registry = registry.with_index_names(name, names);
        }
        for &(name, alias) in titles::STRUCT_ALIASES {
            registry = registry.with_struct_alias(name, alias);
        }
        for &name in titles::BYTE_PREFIXED_INTS {
            registry = registry.with_byte_prefixed_int(name);
        }
        for &name in titles::ENUM_PREFIXED_NAMES {
            registry = registry.with_enum_prefixed_name(name);
        }
        registry
    }

    /// Process-wide tables for a title, built on first use
    pub fn shared(title: Title) -> &'static ArrayRegistry {
        static TABLES: [OnceLock<ArrayRegistry>; Title::ALL.len()] =
            [const { OnceLock::new() }; Title::ALL.len()];
        TABLES[title as usize].get_or_init(|| Self::for_title(title))
    }

    pub fn with_array(mut self, name: impl Into<String>, metadata: ArrayMetadata) -> Self {
        self.arrays.insert(name.into(), metadata);
        self
    }

    pub fn with_index_names(
        mut self,
        name: impl Into<String>,
        names: &'static [&'static str],
    ) -> Self {
        self.index_names.insert(name.into(), names);
        self
    }

    pub fn with_struct_alias(mut self, name: impl Into<String>, alias: &'static str) -> Self {
        self.struct_aliases.insert(name.into(), alias);
        self
    }

    pub fn with_byte_prefixed_int(mut self, name: impl Into<String>) -> Self {
        self.byte_prefixed_ints.insert(name.into());
        self
    }

    pub fn with_enum_prefixed_name(mut self, name: impl Into<String>) -> Self {
        self.enum_prefixed_names.insert(name.into());
        self
    }

    /// Metadata for an array-typed property name
    pub fn lookup(&self, name: &str) -> Option<&ArrayMetadata> {
        self.arrays.get(name)
    }

    /// Whether `name` is encoded as a headerless run of tags
    pub fn is_static(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(ArrayMetadata::is_static)
    }

    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Index-name enumeration for a static array, if it has one
    pub fn index_names(&self, array: &str) -> Option<&'static [&'static str]> {
        self.index_names.get(array).copied()
    }

    /// Symbolic name for element `index` of `array`.
    ///
    /// Falls back to `Element{index + 1}` when the array has no enumeration
    /// or the index lies outside it.
    pub fn index_name(&self, array: &str, index: i32) -> String {
        self.index_names(array)
            .and_then(|names| usize::try_from(index).ok().and_then(|i| names.get(i)))
            .map_or_else(|| format!("Element{}", i64::from(index) + 1), |name| (*name).to_string())
    }

    /// Inverse of [`ArrayRegistry::index_name`]
    pub fn index_of(&self, array: &str, key: &str) -> Option<i32> {
        let named = self
            .index_names(array)
            .and_then(|names| names.iter().position(|name| *name == key));
        if let Some(pos) = named {
            return i32::try_from(pos).ok();
        }
        let digits = key.strip_prefix("Element")?;
        if digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let ordinal: i64 = digits.parse().ok()?;
        i32::try_from(ordinal - 1).ok()
    }

    /// Struct type name a property is expected to carry.
    ///
    /// Static struct arrays use their element struct name; other structs use
    /// the alias table. Everything else expects the empty name.
    pub fn struct_alias(&self, name: &str) -> &'static str {
        if let Some(alias) = self.struct_aliases.get(name) {
            return alias;
        }
        self.lookup(name).and_then(|m| m.struct_name).unwrap_or("")
    }

    /// Int property whose name starts with the byte key prefix
    pub fn is_byte_prefixed_int(&self, name: &str) -> bool {
        self.byte_prefixed_ints.contains(name)
    }

    /// Enum byte whose name already starts with the enum key prefix
    pub fn is_enum_prefixed_name(&self, name: &str) -> bool {
        self.enum_prefixed_names.contains(name)
    }
}
