//! Save file container: header, title detection and the payload cipher
//! boundary
//!
//! A save starts with two little-endian `u32` fields. Plaintext saves carry a
//! format version and [`NO_MAGIC`], then the tag stream. Encrypted saves keep
//! part of the header in the clear and encrypt the rest of the file; once
//! decrypted, the payload starts with a short prefix before the tag stream.
//!
//! | Title | On disk                          | Decrypted prefix |
//! |-------|----------------------------------|------------------|
//! | IB3   | `5`, `NO_MAGIC`, tags            | -                |
//! | IB1   | `4`, `NO_MAGIC`, tags (PC)       | -                |
//! | IB1   | version, `IB1_SAVE_MAGIC`, data  | 4 bytes          |
//! | IB2   | `IB2_SAVE_MAGIC`, data           | 8 bytes          |
//! | VOTE  | `IB2_SAVE_MAGIC`, data           | 8 bytes          |

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SaveError};
use crate::json;
use crate::property::Property;
use crate::reader::TagReader;
use crate::registry::ArrayRegistry;
use crate::tree::{build_tree, write_tree};
use crate::writer::TagWriter;

/// Plaintext IB3 save version
pub const SAVE_VERSION_IB3: u32 = 5;

/// Plaintext IB1 (PC) save version
pub const SAVE_VERSION_PC: u32 = 4;

/// Second header field of a plaintext save
pub const NO_MAGIC: u32 = 0xFFFF_FFFF;

/// Second header field of an encrypted IB1 save
pub const IB1_SAVE_MAGIC: u32 = 0xC0DE_DBAD;

/// First header field of an encrypted IB2 or VOTE save
pub const IB2_SAVE_MAGIC: u32 = 0x2A4F_0F61;

/// Cipher block size; encrypted payloads are zero-padded to a multiple of it
pub const CIPHER_BLOCK_SIZE: usize = 16;

/// Supported game titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Title {
    Ib1,
    Ib2,
    Ib3,
    Vote,
}

impl Title {
    pub const ALL: [Title; 4] = [Title::Ib1, Title::Ib2, Title::Ib3, Title::Vote];

    pub fn as_str(self) -> &'static str {
        match self {
            Title::Ib1 => "ib1",
            Title::Ib2 => "ib2",
            Title::Ib3 => "ib3",
            Title::Vote => "vote",
        }
    }

    /// Clear header bytes kept in front of an encrypted payload
    pub fn encrypted_header_len(self) -> usize {
        match self {
            Title::Ib1 => 8,
            Title::Ib2 | Title::Ib3 | Title::Vote => 4,
        }
    }

    /// Bytes between the start of a decrypted payload and the first tag
    pub fn decrypted_prefix_len(self) -> usize {
        match self {
            Title::Ib1 => 4,
            Title::Ib2 | Title::Ib3 | Title::Vote => 8,
        }
    }

    /// Decrypted prefix written when there is no original to copy it from
    fn default_decrypted_prefix(self) -> Vec<u8> {
        match self {
            Title::Ib1 => NO_MAGIC.to_le_bytes().to_vec(),
            Title::Ib2 | Title::Ib3 | Title::Vote => {
                let mut prefix = 0u32.to_le_bytes().to_vec();
                prefix.extend_from_slice(&NO_MAGIC.to_le_bytes());
                prefix
            }
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Title {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Title::ALL
            .into_iter()
            .find(|title| title.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown title '{s}' (expected ib1, ib2, ib3 or vote)"))
    }
}

/// The first eight bytes of a save file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveHeader {
    pub version: u32,
    pub magic: u32,
}

impl SaveHeader {
    pub const SIZE: usize = 8;

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(SaveError::InvalidHeader {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        let mut reader = TagReader::new(bytes);
        Ok(Self {
            version: reader.read_u32()?,
            magic: reader.read_u32()?,
        })
    }

    /// Header used when no original save is available as a template
    pub fn default_for(title: Title) -> Self {
        match title {
            Title::Ib3 => Self {
                version: SAVE_VERSION_IB3,
                magic: NO_MAGIC,
            },
            Title::Ib1 => Self {
                version: SAVE_VERSION_PC,
                magic: NO_MAGIC,
            },
            Title::Ib2 | Title::Vote => Self {
                version: IB2_SAVE_MAGIC,
                magic: 0,
            },
        }
    }

    pub fn is_encrypted(&self) -> bool {
        !matches!(self.version, SAVE_VERSION_IB3 | SAVE_VERSION_PC) || self.magic != NO_MAGIC
    }

    /// Title of a plaintext save
    pub fn plaintext_title(&self) -> Option<Title> {
        if self.is_encrypted() {
            return None;
        }
        match self.version {
            SAVE_VERSION_IB3 => Some(Title::Ib3),
            SAVE_VERSION_PC => Some(Title::Ib1),
            _ => None,
        }
    }

    /// Title family of an encrypted save.
    ///
    /// IB2 and VOTE share a header; this returns `Ib2` for both and the
    /// payload has to be decrypted to tell them apart.
    pub fn encrypted_title(&self) -> Option<Title> {
        if !self.is_encrypted() {
            return None;
        }
        if self.magic == IB1_SAVE_MAGIC {
            Some(Title::Ib1)
        } else if self.version == IB2_SAVE_MAGIC {
            Some(Title::Ib2)
        } else {
            None
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[..4].copy_from_slice(&self.version.to_le_bytes());
        bytes[4..].copy_from_slice(&self.magic.to_le_bytes());
        bytes
    }

    fn unknown_title(&self) -> SaveError {
        SaveError::UnknownTitle {
            version: self.version,
            magic: self.magic,
        }
    }

    fn encrypted_payload(&self) -> SaveError {
        SaveError::EncryptedPayload {
            version: self.version,
            magic: self.magic,
        }
    }
}

/// Block cipher applied to encrypted payloads.
///
/// The codec only ever sees plaintext. Implementations own the per-title
/// keys and modes.
pub trait PayloadCipher {
    /// Decrypt everything after the clear header bytes
    fn decrypt(&self, title: Title, payload: &[u8]) -> Result<Vec<u8>>;

    /// Encrypt a plaintext payload, including its decrypted prefix
    fn encrypt(&self, title: Title, plaintext: &[u8]) -> Result<Vec<u8>>;
}

/// A decoded save file
#[derive(Debug, Clone, PartialEq)]
pub struct SaveFile {
    pub title: Title,
    pub header: SaveHeader,
    pub encrypted: bool,
    /// Bytes in front of the first tag once decrypted (the whole header for
    /// plaintext saves)
    pub prefix: Vec<u8>,
    pub properties: Vec<Property>,
}

impl SaveFile {
    /// Decode a save, detecting the title from its header unless one is
    /// given. Encrypted saves need a cipher.
    pub fn parse(
        bytes: &[u8],
        title: Option<Title>,
        cipher: Option<&dyn PayloadCipher>,
    ) -> Result<Self> {
        let header = SaveHeader::parse(bytes)?;

        if !header.is_encrypted() {
            let title = title
                .or_else(|| header.plaintext_title())
                .ok_or_else(|| header.unknown_title())?;
            tracing::debug!("Plaintext {} save, {} bytes", title, bytes.len());
            let properties = decode_body(bytes, SaveHeader::SIZE, title)?;
            return Ok(Self {
                title,
                header,
                encrypted: false,
                prefix: header.to_bytes().to_vec(),
                properties,
            });
        }

        let cipher = cipher.ok_or_else(|| header.encrypted_payload())?;
        let family = title
            .or_else(|| header.encrypted_title())
            .ok_or_else(|| header.unknown_title())?;
        let (title, plaintext) = decrypt(&header, bytes, family, title.is_some(), cipher)?;
        tracing::debug!(
            "Encrypted {} save, {} bytes decrypted",
            title,
            plaintext.len()
        );

        let prefix_len = title.decrypted_prefix_len();
        if plaintext.len() < prefix_len {
            return Err(SaveError::InvalidHeader {
                expected: prefix_len,
                actual: plaintext.len(),
            });
        }
        let properties = decode_body(&plaintext, prefix_len, title)?;
        Ok(Self {
            title,
            header,
            encrypted: true,
            prefix: plaintext[..prefix_len].to_vec(),
            properties,
        })
    }

    /// Rebuild a save from JSON, taking the header (and with it the title
    /// and encryption) from a template
    pub fn from_json(text: &str, header: SaveHeader, title: Option<Title>) -> Result<Self> {
        let encrypted = header.is_encrypted();
        let title = title
            .or_else(|| header.plaintext_title())
            .or_else(|| header.encrypted_title())
            .ok_or_else(|| header.unknown_title())?;

        let value = json::from_json_str(text)?;
        let properties = json::crunch(&value, ArrayRegistry::shared(title))?;

        let prefix = if encrypted {
            title.default_decrypted_prefix()
        } else {
            header.to_bytes().to_vec()
        };
        Ok(Self {
            title,
            header,
            encrypted,
            prefix,
            properties,
        })
    }

    /// JSON text of the property tree
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let value = json::dump(&self.properties, ArrayRegistry::shared(self.title))?;
        json::to_json_string(&value, pretty)
    }

    /// Encode the save, encrypting it again if it was encrypted
    pub fn to_bytes(&self, cipher: Option<&dyn PayloadCipher>) -> Result<Vec<u8>> {
        let mut writer = TagWriter::with_capacity(64 * 1024);
        writer.write_bytes(&self.prefix);
        write_tree(&mut writer, &self.properties)?;
        let plaintext = writer.into_inner();

        if !self.encrypted {
            return Ok(plaintext);
        }

        let cipher = cipher.ok_or_else(|| self.header.encrypted_payload())?;
        let ciphertext = cipher.encrypt(self.title, &plaintext)?;
        let clear = self.title.encrypted_header_len();
        let mut out = Vec::with_capacity(clear + ciphertext.len());
        out.extend_from_slice(&self.header.to_bytes()[..clear]);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }
}

fn decode_body(bytes: &[u8], offset: usize, title: Title) -> Result<Vec<Property>> {
    let mut reader = TagReader::at(bytes, offset);
    let properties = build_tree(&mut reader, ArrayRegistry::shared(title))?;

    let trailing = &bytes[reader.position()..];
    if trailing.iter().any(|&b| b != 0) || trailing.len() >= CIPHER_BLOCK_SIZE {
        tracing::warn!(
            "Ignoring {} trailing bytes after the closing terminator",
            trailing.len()
        );
    } else if !trailing.is_empty() {
        tracing::debug!("Skipping {} bytes of cipher padding", trailing.len());
    }
    Ok(properties)
}

/// Decrypt the payload, telling IB2 from VOTE by which key yields a
/// plausible decrypted prefix
fn decrypt(
    header: &SaveHeader,
    bytes: &[u8],
    family: Title,
    explicit: bool,
    cipher: &dyn PayloadCipher,
) -> Result<(Title, Vec<u8>)> {
    let clear = family.encrypted_header_len();
    let payload = &bytes[clear.min(bytes.len())..];

    if explicit || family != Title::Ib2 {
        return Ok((family, cipher.decrypt(family, payload)?));
    }

    for title in [Title::Ib2, Title::Vote] {
        let plaintext = cipher.decrypt(title, payload)?;
        if looks_decrypted(&plaintext) {
            return Ok((title, plaintext));
        }
    }
    Err(header.unknown_title())
}

/// A decrypted IB2-family payload starts with `0` or `NO_MAGIC`, or has
/// `NO_MAGIC` as its second field
fn looks_decrypted(plaintext: &[u8]) -> bool {
    let Ok(header) = SaveHeader::parse(plaintext) else {
        return false;
    };
    header.version == 0 || header.version == NO_MAGIC || header.magic == NO_MAGIC
}

/// Decode a plaintext save into JSON text
pub fn deserialize(input: &[u8]) -> Result<String> {
    SaveFile::parse(input, None, None)?.to_json(true)
}

/// Encode JSON text into a plaintext save using `template` as its header
pub fn serialize(json: &str, template: SaveHeader) -> Result<Vec<u8>> {
    SaveFile::from_json(json, template, None)?.to_bytes(None)
}

/// Outcome of [`verify_round_trip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTripReport {
    pub title: Title,
    pub properties: usize,
    pub original_len: usize,
    pub rewritten_len: usize,
    /// First byte offset where the rewritten file differs
    pub first_difference: Option<usize>,
}

impl RoundTripReport {
    pub fn is_identical(&self) -> bool {
        self.first_difference.is_none()
    }
}

/// Push a save through the whole pipeline (bytes, tree, JSON text, tree,
/// bytes) and compare the result with the input
pub fn verify_round_trip(
    bytes: &[u8],
    title: Option<Title>,
    cipher: Option<&dyn PayloadCipher>,
) -> Result<RoundTripReport> {
    let save = SaveFile::parse(bytes, title, cipher)?;
    let text = save.to_json(false)?;

    let mut rebuilt = SaveFile::from_json(&text, save.header, Some(save.title))?;
    rebuilt.prefix = save.prefix.clone();
    let rewritten = rebuilt.to_bytes(cipher)?;

    let first_difference = bytes
        .iter()
        .zip(&rewritten)
        .position(|(a, b)| a != b)
        .or_else(|| (bytes.len() != rewritten.len()).then_some(bytes.len().min(rewritten.len())));
    if let Some(offset) = first_difference {
        tracing::warn!("Round trip differs from the original at offset {}", offset);
    }

    Ok(RoundTripReport {
        title: save.title,
        properties: save.properties.len(),
        original_len: bytes.len(),
        rewritten_len: rewritten.len(),
        first_difference,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyValue;
    use crate::testing::{StreamBuilder, sample_tree};

    /// Stand-in cipher: XOR with a per-title byte, zero padded to the block
    /// size
    struct XorCipher;

    impl XorCipher {
        fn key(title: Title) -> u8 {
            match title {
                Title::Ib1 => 0x11,
                Title::Ib2 => 0x22,
                Title::Ib3 => 0x33,
                Title::Vote => 0x44,
            }
        }
    }

    impl PayloadCipher for XorCipher {
        fn decrypt(&self, title: Title, payload: &[u8]) -> Result<Vec<u8>> {
            if payload.len() % CIPHER_BLOCK_SIZE != 0 {
                return Err(SaveError::Cipher("payload is not block aligned".into()));
            }
            Ok(payload.iter().map(|b| b ^ Self::key(title)).collect())
        }

        fn encrypt(&self, title: Title, plaintext: &[u8]) -> Result<Vec<u8>> {
            let mut padded = plaintext.to_vec();
            padded.resize(plaintext.len().div_ceil(CIPHER_BLOCK_SIZE) * CIPHER_BLOCK_SIZE, 0);
            Ok(padded.iter().map(|b| b ^ Self::key(title)).collect())
        }
    }

    fn gold_save() -> Vec<u8> {
        StreamBuilder::new()
            .u32(SAVE_VERSION_IB3)
            .u32(NO_MAGIC)
            .int("Gold", 100)
            .terminator()
            .build()
    }

    fn encrypted_save(title: Title, header: &[u8], prefix: &[u8], body: &[u8]) -> Vec<u8> {
        let mut plaintext = prefix.to_vec();
        plaintext.extend_from_slice(body);
        let mut out = header.to_vec();
        out.extend(XorCipher.encrypt(title, &plaintext).unwrap());
        out
    }

    #[test]
    fn test_gold_end_to_end() {
        let bytes = gold_save();
        assert_eq!(&bytes[..8], &[5, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);

        let text = deserialize(&bytes).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!({"Gold": 100}));

        let header = SaveHeader::parse(&bytes).unwrap();
        assert_eq!(serialize(&text, header).unwrap(), bytes);
    }

    #[test]
    fn test_header_classification() {
        let ib3 = SaveHeader::default_for(Title::Ib3);
        assert!(!ib3.is_encrypted());
        assert_eq!(ib3.plaintext_title(), Some(Title::Ib3));
        assert_eq!(ib3.to_bytes(), [5, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);

        let pc = SaveHeader::default_for(Title::Ib1);
        assert_eq!(pc.plaintext_title(), Some(Title::Ib1));

        let ib1 = SaveHeader {
            version: 3,
            magic: IB1_SAVE_MAGIC,
        };
        assert!(ib1.is_encrypted());
        assert_eq!(ib1.plaintext_title(), None);
        assert_eq!(ib1.encrypted_title(), Some(Title::Ib1));

        let ib2 = SaveHeader::default_for(Title::Ib2);
        assert!(ib2.is_encrypted());
        assert_eq!(ib2.encrypted_title(), Some(Title::Ib2));

        let odd = SaveHeader {
            version: 5,
            magic: 0,
        };
        assert!(odd.is_encrypted());
        assert_eq!(odd.encrypted_title(), None);
    }

    #[test]
    fn test_short_header() {
        assert!(matches!(
            SaveHeader::parse(&[5, 0, 0]),
            Err(SaveError::InvalidHeader {
                expected: 8,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_title_strings() {
        for title in Title::ALL {
            assert_eq!(title.to_string().parse::<Title>(), Ok(title));
        }
        assert_eq!("IB3".parse::<Title>(), Ok(Title::Ib3));
        assert!("ib4".parse::<Title>().is_err());
    }

    #[test]
    fn test_encrypted_without_cipher() {
        let mut bytes = IB2_SAVE_MAGIC.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        assert!(matches!(
            deserialize(&bytes),
            Err(SaveError::EncryptedPayload { .. })
        ));
    }

    #[test]
    fn test_unknown_plaintext_title() {
        let bytes = StreamBuilder::new().u32(9).u32(0).terminator().build();
        assert!(matches!(
            SaveFile::parse(&bytes, None, Some(&XorCipher)),
            Err(SaveError::UnknownTitle { version: 9, .. })
        ));
    }

    #[test]
    fn test_encrypted_ib1_round_trip() {
        let body = StreamBuilder::new().int("Gold", 7).terminator().build();
        let header = SaveHeader {
            version: 3,
            magic: IB1_SAVE_MAGIC,
        };
        let bytes = encrypted_save(
            Title::Ib1,
            &header.to_bytes(),
            &NO_MAGIC.to_le_bytes(),
            &body,
        );

        let save = SaveFile::parse(&bytes, None, Some(&XorCipher)).unwrap();
        assert_eq!(save.title, Title::Ib1);
        assert!(save.encrypted);
        assert_eq!(save.properties[0].value, PropertyValue::Int(7));
        assert_eq!(save.to_bytes(Some(&XorCipher)).unwrap(), bytes);

        let report = verify_round_trip(&bytes, None, Some(&XorCipher)).unwrap();
        assert!(report.is_identical(), "{report:?}");
    }

    #[test]
    fn test_vote_detected_by_trial_decryption() {
        let body = StreamBuilder::new().int("LastVote", 1).terminator().build();
        let mut prefix = 0u32.to_le_bytes().to_vec();
        prefix.extend_from_slice(&NO_MAGIC.to_le_bytes());
        let bytes = encrypted_save(
            Title::Vote,
            &IB2_SAVE_MAGIC.to_le_bytes(),
            &prefix,
            &body,
        );

        let save = SaveFile::parse(&bytes, None, Some(&XorCipher)).unwrap();
        assert_eq!(save.title, Title::Vote);
        assert_eq!(save.prefix, prefix);
        assert_eq!(save.to_bytes(Some(&XorCipher)).unwrap(), bytes);

        // An explicit title skips detection
        let forced = SaveFile::parse(&bytes, Some(Title::Ib2), Some(&XorCipher));
        assert!(forced.is_err());
    }

    #[test]
    fn test_encode_encrypted_needs_cipher() {
        let text = r#"{"Gold": 1}"#;
        let save = SaveFile::from_json(text, SaveHeader::default_for(Title::Ib2), None).unwrap();
        assert!(save.encrypted);
        assert!(matches!(
            save.to_bytes(None),
            Err(SaveError::EncryptedPayload { .. })
        ));

        let bytes = save.to_bytes(Some(&XorCipher)).unwrap();
        assert_eq!(&bytes[..4], &IB2_SAVE_MAGIC.to_le_bytes());
        let reread = SaveFile::parse(&bytes, Some(Title::Ib2), Some(&XorCipher)).unwrap();
        assert_eq!(reread.properties, save.properties);
    }

    #[test]
    fn test_verify_sample_tree() {
        let mut writer = TagWriter::new();
        writer.write_bytes(&SaveHeader::default_for(Title::Ib3).to_bytes());
        write_tree(&mut writer, &sample_tree()).unwrap();
        let bytes = writer.into_inner();

        let report = verify_round_trip(&bytes, None, None).unwrap();
        assert!(report.is_identical(), "{report:?}");
        assert_eq!(report.title, Title::Ib3);
        assert_eq!(report.properties, sample_tree().len());
        assert_eq!(report.rewritten_len, bytes.len());
    }

    #[test]
    fn test_verify_reports_lost_bytes() {
        let mut bytes = gold_save();
        bytes.extend_from_slice(&[1, 2, 3]);
        let report = verify_round_trip(&bytes, None, None).unwrap();
        assert_eq!(report.first_difference, Some(gold_save().len()));
        assert!(!report.is_identical());
    }
}
