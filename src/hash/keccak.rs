use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tiny_keccak::{Hasher as _, Keccak};

use crate::field::FieldElement;

/// Size of a Keccak-256 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Keccak-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Digest {
    bytes: [u8; DIGEST_SIZE],
}

impl Digest {
    /// Constructs a digest from raw bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the canonical byte representation of the digest.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.bytes
    }

    /// Consumes the digest and returns the underlying byte array.
    pub const fn into_bytes(self) -> [u8; DIGEST_SIZE] {
        self.bytes
    }

    /// Reduces the digest, read as a big-endian integer, into the field.
    pub fn to_field(&self) -> FieldElement {
        FieldElement::from_be_bytes_reduced(&self.bytes)
    }

    /// Returns a helper that formats the digest as lowercase hexadecimal.
    pub fn to_hex(&self) -> HexOutput {
        HexOutput(self.bytes)
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest(0x{})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.bytes))
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let mut bytes = [0u8; DIGEST_SIZE];
        hex::decode_to_slice(encoded.trim_start_matches("0x"), &mut bytes)
            .map_err(serde::de::Error::custom)?;
        Ok(Self { bytes })
    }
}

/// Hexadecimal representation of a digest.
#[derive(Clone, Copy)]
pub struct HexOutput([u8; DIGEST_SIZE]);

impl fmt::Display for HexOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for HexOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Incremental Keccak-256 hasher.
#[derive(Clone)]
pub struct Hasher {
    inner: Keccak,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Creates a fresh hasher.
    pub fn new() -> Self {
        Self {
            inner: Keccak::v256(),
        }
    }

    /// Absorbs raw bytes.
    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        self.inner.update(bytes);
        self
    }

    /// Absorbs a field element in its 32-byte encoding.
    pub fn update_element(&mut self, element: FieldElement) -> &mut Self {
        self.update(&element.to_bytes())
    }

    /// Absorbs a sequence of field elements.
    pub fn update_elements(&mut self, elements: &[FieldElement]) -> &mut Self {
        for element in elements {
            self.update_element(*element);
        }
        self
    }

    /// Finalises the hasher.
    pub fn finalize(self) -> Digest {
        let mut bytes = [0u8; DIGEST_SIZE];
        self.inner.finalize(&mut bytes);
        Digest { bytes }
    }
}

/// Keccak-256 of `bytes`.
pub fn hash(bytes: &[u8]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hasher.finalize()
}

/// Keccak-256 of `left || right`.
pub fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update(&left.bytes).update(&right.bytes);
    hasher.finalize()
}

/// Keccak-256 of the concatenated encodings of `elements`.
pub fn hash_elements(elements: &[FieldElement]) -> Digest {
    let mut hasher = Hasher::new();
    hasher.update_elements(elements);
    hasher.finalize()
}
