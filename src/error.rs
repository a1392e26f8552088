/*!
Error types for the one fallible boundary in this crate: loading a cartridge
image. Everything downstream of a successfully parsed `Cartridge` is emulated
hardware behavior and must not fail.
*/

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CartridgeError {
    #[error("iNES data too small: need at least {needed} bytes, got {actual}")]
    TooSmall { needed: usize, actual: usize },

    #[error("invalid iNES header magic (expected \"NES\\x1A\")")]
    BadMagic,

    #[error("unsupported iNES format version (NES 2.0 is not supported)")]
    UnsupportedVersion,

    #[error("mapper {0} is not implemented; only mapper 0 (NROM) is supported")]
    UnsupportedMapper(u16),

    #[error("truncated iNES data in {section}: expected {expected} bytes, found {actual}")]
    Truncated {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("PRG/CHR/PRG-RAM size field overflowed while computing byte length")]
    SizeOverflow,
}
