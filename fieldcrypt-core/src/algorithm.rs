//! Algorithm tag: the closed enumeration of supported symmetric ciphers.

use serde::{Deserialize, Serialize};

/// Closed enumeration of symmetric algorithms. New code should prefer
/// [`AlgorithmTag::Aes`]; the others are retained for compatibility with
/// legacy cipher-texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmTag {
    Aes,
    Des,
    Rc2,
    Rijndael,
    TripleDes,
}

impl AlgorithmTag {
    /// All tags in the closed enumeration, for error messages and iteration.
    pub const ALL: [AlgorithmTag; 5] = [
        AlgorithmTag::Aes,
        AlgorithmTag::Des,
        AlgorithmTag::Rc2,
        AlgorithmTag::Rijndael,
        AlgorithmTag::TripleDes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmTag::Aes => "AES",
            AlgorithmTag::Des => "DES",
            AlgorithmTag::Rc2 => "RC2",
            AlgorithmTag::Rijndael => "Rijndael",
            AlgorithmTag::TripleDes => "TripleDES",
        }
    }

    /// Valid key lengths in bytes for this tag.
    ///
    /// Rijndael shares AES's key-size set: a 128-bit-block Rijndael
    /// configuration *is* AES.
    pub fn valid_key_sizes(self) -> &'static [usize] {
        match self {
            AlgorithmTag::Aes | AlgorithmTag::Rijndael => &[16, 24, 32],
            AlgorithmTag::Des => &[8],
            AlgorithmTag::TripleDes => &[16, 24],
            AlgorithmTag::Rc2 => &[8],
        }
    }

    /// Fixed block size / IV size in bytes for this tag.
    pub fn iv_size(self) -> usize {
        match self {
            AlgorithmTag::Aes | AlgorithmTag::Rijndael => 16,
            AlgorithmTag::Des | AlgorithmTag::TripleDes | AlgorithmTag::Rc2 => 8,
        }
    }

    pub fn is_valid_key_size(self, len: usize) -> bool {
        self.valid_key_sizes().contains(&len)
    }
}

impl std::fmt::Display for AlgorithmTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
