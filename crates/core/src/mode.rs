//! Numeric mode and byte-order tokens
//!
//! These are the wire-visible vocabulary of the packed-array encoding.
//! The mode names (`int8` … `float64`) and byte-order names (`little|big`)
//! appear verbatim as attributes on encoded-array elements in migrated
//! documents, so parsing and display must round-trip exactly.

use crate::error::{MigrateError, Result};
use std::fmt;
use std::str::FromStr;

/// Numeric element type of a packed array
///
/// Each mode maps to a fixed element byte width and a signed/unsigned/float
/// interpretation. Unknown tokens fail with `InvalidMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// 8-bit signed integer
    Int8,
    /// 8-bit unsigned integer
    Uint8,
    /// 16-bit signed integer
    Int16,
    /// 16-bit unsigned integer
    Uint16,
    /// 32-bit signed integer
    Int32,
    /// 32-bit unsigned integer
    Uint32,
    /// 64-bit signed integer
    Int64,
    /// 64-bit unsigned integer
    Uint64,
    /// 32-bit IEEE 754 float
    Float32,
    /// 64-bit IEEE 754 float
    Float64,
}

/// All supported modes, in wire-name order
pub const ALL_MODES: [Mode; 10] = [
    Mode::Int8,
    Mode::Uint8,
    Mode::Int16,
    Mode::Uint16,
    Mode::Int32,
    Mode::Uint32,
    Mode::Int64,
    Mode::Uint64,
    Mode::Float32,
    Mode::Float64,
];

impl Mode {
    /// Element width in bytes
    #[inline]
    pub const fn width(&self) -> usize {
        match self {
            Mode::Int8 | Mode::Uint8 => 1,
            Mode::Int16 | Mode::Uint16 => 2,
            Mode::Int32 | Mode::Uint32 | Mode::Float32 => 4,
            Mode::Int64 | Mode::Uint64 | Mode::Float64 => 8,
        }
    }

    /// Whether this is a floating-point mode
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Mode::Float32 | Mode::Float64)
    }

    /// Whether this is an integer mode (signed or unsigned)
    #[inline]
    pub const fn is_integer(&self) -> bool {
        !self.is_float()
    }

    /// Wire name of the mode (`int8` … `float64`)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mode::Int8 => "int8",
            Mode::Uint8 => "uint8",
            Mode::Int16 => "int16",
            Mode::Uint16 => "uint16",
            Mode::Int32 => "int32",
            Mode::Uint32 => "uint32",
            Mode::Int64 => "int64",
            Mode::Uint64 => "uint64",
            Mode::Float32 => "float32",
            Mode::Float64 => "float64",
        }
    }
}

impl FromStr for Mode {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int8" => Ok(Mode::Int8),
            "uint8" => Ok(Mode::Uint8),
            "int16" => Ok(Mode::Int16),
            "uint16" => Ok(Mode::Uint16),
            "int32" => Ok(Mode::Int32),
            "uint32" => Ok(Mode::Uint32),
            "int64" => Ok(Mode::Int64),
            "uint64" => Ok(Mode::Uint64),
            "float32" => Ok(Mode::Float32),
            "float64" => Ok(Mode::Float64),
            other => Err(MigrateError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte order of a packed array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Little-endian (least significant byte first)
    Little,
    /// Big-endian (most significant byte first)
    Big,
}

impl Endianness {
    /// Wire name of the byte order (`little|big`)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Endianness::Little => "little",
            Endianness::Big => "big",
        }
    }
}

impl FromStr for Endianness {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "little" => Ok(Endianness::Little),
            "big" => Ok(Endianness::Big),
            other => Err(MigrateError::InvalidEndianness(other.to_string())),
        }
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_widths() {
        assert_eq!(Mode::Int8.width(), 1);
        assert_eq!(Mode::Uint8.width(), 1);
        assert_eq!(Mode::Int16.width(), 2);
        assert_eq!(Mode::Uint16.width(), 2);
        assert_eq!(Mode::Int32.width(), 4);
        assert_eq!(Mode::Uint32.width(), 4);
        assert_eq!(Mode::Int64.width(), 8);
        assert_eq!(Mode::Uint64.width(), 8);
        assert_eq!(Mode::Float32.width(), 4);
        assert_eq!(Mode::Float64.width(), 8);
    }

    #[test]
    fn test_mode_classification() {
        assert!(Mode::Float32.is_float());
        assert!(Mode::Float64.is_float());
        assert!(!Mode::Int32.is_float());

        assert!(Mode::Uint32.is_integer());
        assert!(!Mode::Float64.is_integer());
    }

    #[test]
    fn test_mode_parse_roundtrip() {
        for mode in ALL_MODES {
            let parsed: Mode = mode.as_str().parse().unwrap();
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn test_mode_parse_unknown() {
        let err = "float128".parse::<Mode>().unwrap_err();
        assert!(matches!(err, MigrateError::InvalidMode(s) if s == "float128"));
    }

    #[test]
    fn test_endianness_parse_roundtrip() {
        for e in [Endianness::Little, Endianness::Big] {
            let parsed: Endianness = e.as_str().parse().unwrap();
            assert_eq!(parsed, e);
        }
    }

    #[test]
    fn test_endianness_parse_unknown() {
        let err = "middle".parse::<Endianness>().unwrap_err();
        assert!(matches!(err, MigrateError::InvalidEndianness(s) if s == "middle"));
    }

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(Mode::Float32.to_string(), "float32");
        assert_eq!(Endianness::Little.to_string(), "little");
        assert_eq!(Endianness::Big.to_string(), "big");
    }
}
