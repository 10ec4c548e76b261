//! Hand-assembled tag streams for tests

use crate::property::{ArrayValue, Property, PropertyKind, PropertyValue, StructValue};

/// Byte builder for tag streams
#[derive(Default)]
pub(crate) struct StreamBuilder {
    buf: Vec<u8>,
}

impl StreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn i32(self, value: i32) -> Self {
        self.raw(&value.to_le_bytes())
    }

    pub fn u32(self, value: u32) -> Self {
        self.raw(&value.to_le_bytes())
    }

    pub fn f32(self, value: f32) -> Self {
        self.raw(&value.to_le_bytes())
    }

    pub fn u8(self, value: u8) -> Self {
        self.raw(&[value])
    }

    pub fn string(self, value: &str) -> Self {
        if value.is_empty() {
            return self.i32(0);
        }
        self.i32(value.len() as i32 + 1).raw(value.as_bytes()).u8(0)
    }

    pub fn header(self, name: &str, type_name: &str, size: i32, index: i32) -> Self {
        self.string(name).string(type_name).i32(size).i32(index)
    }

    pub fn int(self, name: &str, value: i32) -> Self {
        self.header(name, "IntProperty", 4, 0).i32(value)
    }

    pub fn int_at(self, name: &str, index: i32, value: i32) -> Self {
        self.header(name, "IntProperty", 4, index).i32(value)
    }

    /// Struct tag; `fields` must include the closing terminator
    pub fn structure(self, name: &str, index: i32, type_name: &str, fields: StreamBuilder) -> Self {
        let fields = fields.build();
        self.header(name, "StructProperty", fields.len() as i32, index)
            .string(type_name)
            .raw(&fields)
    }

    pub fn terminator(self) -> Self {
        self.string("None")
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Tree touching every value kind and both array layouts
pub(crate) fn sample_tree() -> Vec<Property> {
    let stats = |index: i32, level: i32| {
        Property::indexed(
            "Stats",
            index,
            PropertyValue::Struct(StructValue::named(
                "PlayerSavedStats",
                vec![
                    Property::new("Level", PropertyValue::Int(level)),
                    Property::new("Health", PropertyValue::Float(125.5)),
                ],
            )),
        )
    };
    let gem = |name: &str, level: i32| {
        PropertyValue::Struct(StructValue::element(vec![
            Property::new("GemName", PropertyValue::Name(name.into())),
            Property::new("Level", PropertyValue::Int(level)),
            Property::new("bNew", PropertyValue::Bool(true)),
        ]))
    };

    vec![
        Property::new("Gold", PropertyValue::Int(100)),
        Property::new("Experience", PropertyValue::Int(-1)),
        Property::new("Scale", PropertyValue::Float(2.0)),
        Property::new("bTutorialDone", PropertyValue::Bool(true)),
        Property::new("bHardMode", PropertyValue::Bool(false)),
        Property::new("Difficulty", PropertyValue::Byte(3)),
        Property::new(
            "eCurrentPlayerType",
            PropertyValue::Enum {
                enum_name: "ePlayerCharacterType".into(),
                value: "EPCT_Isa".into(),
            },
        ),
        Property::new("PlayerName", PropertyValue::Str("Siris".into())),
        Property::new("EmptyNote", PropertyValue::Str(String::new())),
        Property::new("CurrentMap", PropertyValue::Name("Castle_P".into())),
        Property::new(
            "Stats",
            PropertyValue::Array(ArrayValue::Static {
                element: PropertyKind::Struct,
                items: vec![stats(0, 12), stats(1, 40)],
            }),
        ),
        Property::new(
            "GameFlagList",
            PropertyValue::Array(ArrayValue::Dynamic {
                element: PropertyKind::Int,
                items: vec![PropertyValue::Int(1), PropertyValue::Int(7)],
            }),
        ),
        Property::new(
            "BossElementalRandList",
            PropertyValue::Array(ArrayValue::Dynamic {
                element: PropertyKind::Float,
                items: vec![PropertyValue::Float(0.25)],
            }),
        ),
        Property::new(
            "PurchasedPerks",
            PropertyValue::Array(ArrayValue::Dynamic {
                element: PropertyKind::Name,
                items: vec![PropertyValue::Name("Perk_A".into()), PropertyValue::Name(String::new())],
            }),
        ),
        Property::new(
            "PlayerUnequippedGems",
            PropertyValue::Array(ArrayValue::Dynamic {
                element: PropertyKind::Struct,
                items: vec![gem("Gem_Fire", 2), gem("Gem_Ice", 5)],
            }),
        ),
        Property::new(
            "CurrentStoreGems",
            PropertyValue::Array(ArrayValue::Dynamic {
                element: PropertyKind::Struct,
                items: Vec::new(),
            }),
        ),
        Property::new(
            "GameOptions",
            PropertyValue::Struct(StructValue::named(
                "PersistGameOptions",
                vec![
                    Property::new("MusicVolume", PropertyValue::Float(0.75)),
                    Property::new(
                        "Data",
                        PropertyValue::Struct(StructValue::named("ItemEnhanceData", Vec::new())),
                    ),
                ],
            )),
        ),
    ]
}
