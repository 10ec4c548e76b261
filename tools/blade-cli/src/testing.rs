//! Save files built in code for command tests

use std::path::{Path, PathBuf};

use blade_save::{Property, PropertyValue, SaveFile, SaveHeader, Title};

/// Plaintext IB3 save holding `Gold` and `PlayerName`
pub(crate) fn small_save() -> Vec<u8> {
    let header = SaveHeader::default_for(Title::Ib3);
    let save = SaveFile {
        title: Title::Ib3,
        header,
        encrypted: false,
        prefix: header.to_bytes().to_vec(),
        properties: vec![
            Property::new("Gold", PropertyValue::Int(100)),
            Property::new("PlayerName", PropertyValue::Str("Siris".into())),
        ],
    };
    save.to_bytes(None).unwrap()
}

pub(crate) fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
