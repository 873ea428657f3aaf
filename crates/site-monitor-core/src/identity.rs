//! Stable identifiers for monitored URLs.
//!
//! Snapshots are keyed by a 32-bit FNV-1a hash of the URL text, rendered in
//! decimal. The result only contains ASCII digits, so it can be used directly
//! as a file name fragment.

use std::fmt;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a over raw bytes.
#[must_use]
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Hash-derived identifier for a monitored URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Derive the identifier for `url`. No normalization is applied, so
    /// `https://example.com` and `https://example.com/` are distinct targets.
    #[must_use]
    pub fn for_url(url: &str) -> Self {
        Self(fnv1a_32(url.as_bytes()).to_string())
    }

    /// Decimal string form used in snapshot file names.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
