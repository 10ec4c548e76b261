//! Tests for the JSON bridge

use serde_json::{Value, json};

use super::{crunch, dump, from_json_str, to_json_string};
use crate::error::SaveError;
use crate::package::Title;
use crate::property::{ArrayValue, Property, PropertyKind, PropertyValue, StructValue};
use crate::registry::ArrayRegistry;
use crate::testing::sample_tree;

fn ib3() -> ArrayRegistry {
    ArrayRegistry::for_title(Title::Ib3)
}

fn compact(properties: &[Property]) -> String {
    to_json_string(&dump(properties, &ib3()).unwrap(), false).unwrap()
}

fn stats(index: i32, type_name: &str, level: i32) -> Property {
    Property::indexed(
        "Stats",
        index,
        PropertyValue::Struct(StructValue::named(
            type_name,
            vec![Property::new("Level", PropertyValue::Int(level))],
        )),
    )
}

fn static_array(name: &str, element: PropertyKind, items: Vec<Property>) -> Property {
    Property::new(name, PropertyValue::Array(ArrayValue::Static { element, items }))
}

#[test]
fn test_sample_tree_round_trip() {
    let registry = ib3();
    let tree = sample_tree();
    let json = dump(&tree, &registry).unwrap();
    assert_eq!(crunch(&json, &registry).unwrap(), tree);
}

#[test]
fn test_text_round_trip() {
    let registry = ib3();
    let tree = sample_tree();
    for pretty in [true, false] {
        let text = to_json_string(&dump(&tree, &registry).unwrap(), pretty).unwrap();
        let parsed = from_json_str(&text).unwrap();
        assert_eq!(crunch(&parsed, &registry).unwrap(), tree);
    }
}

#[test]
fn test_key_conventions() {
    let tree = vec![
        Property::new("Gold", PropertyValue::Int(100)),
        Property::new("Difficulty", PropertyValue::Byte(3)),
        Property::new(
            "Mode",
            PropertyValue::Enum {
                enum_name: "eFoo".into(),
                value: "Bar".into(),
            },
        ),
        Property::new("CurrentMap", PropertyValue::Name("Castle_P".into())),
        Property::new("PlayerName", PropertyValue::Str("Siris".into())),
        Property::new("bOk", PropertyValue::Bool(true)),
    ];
    assert_eq!(
        compact(&tree),
        r#"{"Gold":100,"bDifficulty":3,"eMode":{"eFoo":"Bar"},"ini_CurrentMap":"Castle_P","PlayerName":"Siris","bOk":true}"#
    );
}

#[test]
fn test_enum_and_plain_byte_stay_distinct() {
    let registry = ib3();
    let tree = vec![
        Property::new("Mode", PropertyValue::Byte(7)),
        Property::new(
            "Mode",
            PropertyValue::Enum {
                enum_name: "eFoo".into(),
                value: "Bar".into(),
            },
        ),
    ];
    let json = dump(&tree, &registry).unwrap();
    assert_eq!(json, json!({"bMode": 7, "eMode": {"eFoo": "Bar"}}));
    assert_eq!(crunch(&json, &registry).unwrap(), tree);
}

#[test]
fn test_enum_prefixed_name_keeps_its_key() {
    let registry = ib3();
    let tree = vec![Property::new(
        "eCurrentPlayerType",
        PropertyValue::Enum {
            enum_name: "ePlayerCharacterType".into(),
            value: "EPCT_Siris".into(),
        },
    )];
    let json = dump(&tree, &registry).unwrap();
    assert_eq!(
        json,
        json!({"eCurrentPlayerType": {"ePlayerCharacterType": "EPCT_Siris"}})
    );
    assert_eq!(crunch(&json, &registry).unwrap(), tree);

    // The unprefixed name would produce the same key
    let clash = vec![Property::new(
        "CurrentPlayerType",
        PropertyValue::Enum {
            enum_name: "ePlayerCharacterType".into(),
            value: "EPCT_Siris".into(),
        },
    )];
    assert!(matches!(
        dump(&clash, &registry),
        Err(SaveError::AmbiguousKey { .. })
    ));
}

#[test]
fn test_byte_prefixed_int() {
    let registry = ib3();
    let tree = vec![Property::new("bWasEncrypted", PropertyValue::Int(1))];
    let json = dump(&tree, &registry).unwrap();
    assert_eq!(json, json!({"bWasEncrypted": 1}));
    assert_eq!(crunch(&json, &registry).unwrap(), tree);

    let byte = vec![Property::new("WasEncrypted", PropertyValue::Byte(1))];
    assert!(matches!(
        dump(&byte, &registry),
        Err(SaveError::AmbiguousKey { .. })
    ));
}

#[test]
fn test_float_formatting() {
    let tree = vec![
        Property::new("Whole", PropertyValue::Float(5.0)),
        Property::new("Tenth", PropertyValue::Float(0.1)),
        Property::new("Huge", PropertyValue::Float(1e20)),
        Property::new("Tiny", PropertyValue::Float(1e-7)),
        Property::new("Negative", PropertyValue::Float(-2.5)),
    ];
    assert_eq!(
        compact(&tree),
        r#"{"Whole":5.0,"Tenth":0.1,"Huge":100000000000000000000.0,"Tiny":0.0000001,"Negative":-2.5}"#
    );

    let registry = ib3();
    let text = compact(&tree);
    let back = crunch(&from_json_str(&text).unwrap(), &registry).unwrap();
    assert_eq!(back, tree);
}

#[test]
fn test_non_finite_float_is_rejected() {
    for value in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        let tree = vec![Property::new("Speed", PropertyValue::Float(value))];
        assert!(matches!(
            dump(&tree, &ib3()),
            Err(SaveError::ValueFormat { ref property, .. }) if property == "Speed"
        ));
    }
}

#[test]
fn test_integral_float_reads_back_as_float() {
    let tree = crunch(&json!({"Scale": 2.0, "Count": 2}), &ib3()).unwrap();
    assert_eq!(tree[0].value, PropertyValue::Float(2.0));
    assert_eq!(tree[1].value, PropertyValue::Int(2));
}

#[test]
fn test_keyed_static_array() {
    let registry = ib3();
    let tree = vec![static_array(
        "NumConsumable",
        PropertyKind::Int,
        vec![
            Property::indexed("NumConsumable", 0, PropertyValue::Int(4)),
            Property::indexed("NumConsumable", 2, PropertyValue::Int(1)),
            Property::indexed("NumConsumable", 60, PropertyValue::Int(9)),
        ],
    )];
    let json = dump(&tree, &registry).unwrap();
    assert_eq!(
        json,
        json!({"NumConsumable": {"TRA_Random": 4, "TRA_Random_Gold": 1, "Element61": 9}})
    );
    assert_eq!(crunch(&json, &registry).unwrap(), tree);
}

#[test]
fn test_positional_static_array() {
    let registry = ib3();
    let tree = vec![static_array(
        "Stats",
        PropertyKind::Struct,
        vec![
            stats(0, "PlayerSavedStats", 1),
            stats(1, "PlayerSavedStats", 2),
        ],
    )];
    let json = dump(&tree, &registry).unwrap();
    assert_eq!(json, json!({"Stats": [{"Level": 1}, {"Level": 2}]}));
    assert_eq!(crunch(&json, &registry).unwrap(), tree);
}

#[test]
fn test_sparse_static_array_uses_element_keys() {
    let registry = ib3();
    let tree = vec![static_array(
        "Stats",
        PropertyKind::Struct,
        vec![
            stats(0, "PlayerSavedStats", 1),
            stats(2, "OldStats", 3),
        ],
    )];
    let json = dump(&tree, &registry).unwrap();
    assert_eq!(
        json,
        json!({"Stats": {
            "Element1": {"Level": 1},
            "Element3": {"$struct": "OldStats", "Level": 3}
        }})
    );
    assert_eq!(crunch(&json, &registry).unwrap(), tree);
}

#[test]
fn test_unknown_index_name() {
    let err = crunch(&json!({"SavedCheevo": {"NotAnAchievement": {}}}), &ib3()).unwrap_err();
    assert!(matches!(
        err,
        SaveError::UnknownIndexName { ref array, ref key }
            if array == "SavedCheevo" && key == "NotAnAchievement"
    ));
}

#[test]
fn test_struct_type_names() {
    let registry = ib3();
    let tree = vec![
        Property::new(
            "Loadout",
            PropertyValue::Struct(StructValue::named("LoadoutData", Vec::new())),
        ),
        Property::new("Empty", PropertyValue::Struct(StructValue::named("", Vec::new()))),
        Property::new(
            "Data",
            PropertyValue::Struct(StructValue::named("ItemEnhanceData", Vec::new())),
        ),
    ];
    let json = dump(&tree, &registry).unwrap();
    assert_eq!(
        json,
        json!({"Loadout": {"$struct": "LoadoutData"}, "Empty": {}, "Data": {}})
    );
    assert_eq!(crunch(&json, &registry).unwrap(), tree);
}

#[test]
fn test_dynamic_arrays() {
    let registry = ib3();
    let json = json!({
        "GameFlagList": [3, 5],
        "BossElementalRandList": [0.5, 1],
        "BossesGeneratedThisBloodline": ["Raidriar"],
        "PlayerInventory": [{"ini_ItemName": "Sword", "Level": 2}]
    });
    let tree = crunch(&json, &registry).unwrap();

    assert_eq!(
        tree[0].value,
        PropertyValue::Array(ArrayValue::Dynamic {
            element: PropertyKind::Int,
            items: vec![PropertyValue::Int(3), PropertyValue::Int(5)]
        })
    );
    assert_eq!(
        tree[1].value,
        PropertyValue::Array(ArrayValue::Dynamic {
            element: PropertyKind::Float,
            items: vec![PropertyValue::Float(0.5), PropertyValue::Float(1.0)]
        })
    );
    assert_eq!(
        tree[2].value,
        PropertyValue::Array(ArrayValue::Dynamic {
            element: PropertyKind::Str,
            items: vec![PropertyValue::Str("Raidriar".into())]
        })
    );
    let PropertyValue::Array(ArrayValue::Dynamic { items, .. }) = &tree[3].value else {
        panic!("expected dynamic array");
    };
    assert_eq!(
        items[0],
        PropertyValue::Struct(StructValue::element(vec![
            Property::new("ItemName", PropertyValue::Name("Sword".into())),
            Property::new("Level", PropertyValue::Int(2)),
        ]))
    );
}

#[test]
fn test_ambiguous_trees_are_rejected() {
    let registry = ib3();
    let cases = vec![
        vec![Property::new("bFlags", PropertyValue::Int(1))],
        vec![Property::new("ini_Path", PropertyValue::Str("x".into()))],
        vec![
            Property::new("Gold", PropertyValue::Int(1)),
            Property::new("Gold", PropertyValue::Int(2)),
        ],
        vec![Property::new("Stats", PropertyValue::Int(1))],
        vec![Property::new(
            "eLooksLikeEnum",
            PropertyValue::Struct(StructValue::named(
                "",
                vec![Property::new("Only", PropertyValue::Str("one".into()))],
            )),
        )],
        vec![static_array(
            "NumConsumable",
            PropertyKind::Int,
            vec![Property::indexed("NumConsumable", 0, PropertyValue::Float(1.0))],
        )],
        vec![Property::indexed("Foo", 2, PropertyValue::Int(5))],
        vec![Property::new(
            "GameOptions",
            PropertyValue::Struct(StructValue::named(
                "PersistGameOptions",
                vec![Property::indexed("MusicVolume", 1, PropertyValue::Float(0.5))],
            )),
        )],
    ];
    for tree in cases {
        let result = dump(&tree, &registry);
        assert!(
            matches!(result, Err(SaveError::AmbiguousKey { .. })),
            "{tree:?} gave {result:?}"
        );
    }
}

#[test]
fn test_value_format_errors_name_the_property() {
    let registry = ib3();
    let cases = [
        (json!({"GameFlagList": ["x"]}), "GameFlagList"),
        (json!({"bDifficulty": 300}), "bDifficulty"),
        (json!({"Gold": 3_000_000_000u64}), "Gold"),
        (json!({"Note": null}), "Note"),
        (json!({"GameFlagList": 4}), "GameFlagList"),
        (json!({"Thing": {"$struct": 5}}), "Thing"),
        (json!({"eMode": {"None": "Hard"}}), "eMode"),
        (json!({"ShowConsumableBadge": [{"None": "Shown"}]}), "ShowConsumableBadge"),
        (json!({"PlayerInventory": [{"$struct": "X", "Level": 1}]}), "PlayerInventory"),
    ];
    for (json, name) in cases {
        match crunch(&json, &registry) {
            Err(SaveError::ValueFormat { property, .. }) => assert_eq!(property, name),
            other => panic!("{json} gave {other:?}"),
        }
    }
}

#[test]
fn test_unregistered_array() {
    let err = crunch(&json!({"Mystery": [1, 2]}), &ib3()).unwrap_err();
    assert!(matches!(err, SaveError::MissingArrayMetadata { ref name } if name == "Mystery"));
}

#[test]
fn test_root_must_be_object() {
    let err = crunch(&Value::Array(Vec::new()), &ib3()).unwrap_err();
    assert!(matches!(err, SaveError::ValueFormat { .. }));
    assert!(matches!(
        from_json_str("{not json"),
        Err(SaveError::Json(_))
    ));
}

#[test]
fn test_array_elements_never_carry_a_type_name() {
    let registry = ib3();
    let named = Property::new(
        "PlayerInventory",
        PropertyValue::Array(ArrayValue::Dynamic {
            element: PropertyKind::Struct,
            items: vec![PropertyValue::Struct(StructValue::named(
                "InventoryItem",
                vec![Property::new("Level", PropertyValue::Int(1))],
            ))],
        }),
    );
    let json = dump(&[named], &registry).unwrap();
    assert_eq!(json, json!({"PlayerInventory": [{"Level": 1}]}));

    let tree = crunch(&json, &registry).unwrap();
    let PropertyValue::Array(ArrayValue::Dynamic { items, .. }) = &tree[0].value else {
        panic!("expected a dynamic array, got {:?}", tree[0].value);
    };
    assert_eq!(
        items[0],
        PropertyValue::Struct(StructValue::element(vec![Property::new(
            "Level",
            PropertyValue::Int(1)
        )]))
    );
}
