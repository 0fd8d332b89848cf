//! Numeric packing and transport encoding
//!
//! Packs homogeneous numeric sequences into fixed-width binary under an
//! explicit mode and byte order, and wraps the bytes in a reversible
//! text transport encoding (base64) for embedding in documents.
//!
//! Round-trip law: `unpack(pack(v, m, e), v.len(), m, e) == v` — exact for
//! integer modes, within representation error for float modes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use sff_core::{Endianness, MigrateError, Mode, Result};

/// Pack values into fixed-width binary
///
/// Integer modes truncate toward zero; values are expected to be integral
/// and in range for the chosen mode (the mesh codec only routes dense
/// indices and coordinates here).
pub fn pack(values: &[f64], mode: Mode, endianness: Endianness) -> Vec<u8> {
    match endianness {
        Endianness::Little => pack_with::<LittleEndian>(values, mode),
        Endianness::Big => pack_with::<BigEndian>(values, mode),
    }
}

/// Unpack exactly `count` elements from binary
///
/// Fails with `TruncatedData` unless `bytes` holds exactly
/// `count * mode.width()` bytes. `count` comes from a document attribute,
/// so the length arithmetic must not be allowed to overflow.
pub fn unpack(bytes: &[u8], count: usize, mode: Mode, endianness: Endianness) -> Result<Vec<f64>> {
    let expected = count
        .checked_mul(mode.width())
        .ok_or_else(|| MigrateError::Parse(format!("element count {} overflows", count)))?;
    if bytes.len() != expected {
        return Err(MigrateError::TruncatedData {
            expected,
            actual: bytes.len(),
        });
    }
    let values = match endianness {
        Endianness::Little => unpack_with::<LittleEndian>(bytes, mode),
        Endianness::Big => unpack_with::<BigEndian>(bytes, mode),
    };
    Ok(values)
}

/// Encode bytes for text transport (base64)
pub fn transport_encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode text transport back to bytes
pub fn transport_decode(text: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(text)
        .map_err(|e| MigrateError::Transport(e.to_string()))
}

fn pack_with<E: ByteOrder>(values: &[f64], mode: Mode) -> Vec<u8> {
    let width = mode.width();
    let mut buf = vec![0u8; values.len() * width];
    for (chunk, &v) in buf.chunks_exact_mut(width).zip(values) {
        match mode {
            Mode::Int8 => chunk[0] = (v as i8) as u8,
            Mode::Uint8 => chunk[0] = v as u8,
            Mode::Int16 => E::write_i16(chunk, v as i16),
            Mode::Uint16 => E::write_u16(chunk, v as u16),
            Mode::Int32 => E::write_i32(chunk, v as i32),
            Mode::Uint32 => E::write_u32(chunk, v as u32),
            Mode::Int64 => E::write_i64(chunk, v as i64),
            Mode::Uint64 => E::write_u64(chunk, v as u64),
            Mode::Float32 => E::write_f32(chunk, v as f32),
            Mode::Float64 => E::write_f64(chunk, v),
        }
    }
    buf
}

fn unpack_with<E: ByteOrder>(bytes: &[u8], mode: Mode) -> Vec<f64> {
    bytes
        .chunks_exact(mode.width())
        .map(|chunk| match mode {
            Mode::Int8 => (chunk[0] as i8) as f64,
            Mode::Uint8 => chunk[0] as f64,
            Mode::Int16 => E::read_i16(chunk) as f64,
            Mode::Uint16 => E::read_u16(chunk) as f64,
            Mode::Int32 => E::read_i32(chunk) as f64,
            Mode::Uint32 => E::read_u32(chunk) as f64,
            Mode::Int64 => E::read_i64(chunk) as f64,
            Mode::Uint64 => E::read_u64(chunk) as f64,
            Mode::Float32 => E::read_f32(chunk) as f64,
            Mode::Float64 => E::read_f64(chunk),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sff_core::ALL_MODES;

    // === Packing ===

    #[test]
    fn test_pack_uint32_little() {
        let bytes = pack(&[1.0, 258.0], Mode::Uint32, Endianness::Little);
        assert_eq!(bytes, vec![1, 0, 0, 0, 2, 1, 0, 0]);
    }

    #[test]
    fn test_pack_uint32_big() {
        let bytes = pack(&[1.0, 258.0], Mode::Uint32, Endianness::Big);
        assert_eq!(bytes, vec![0, 0, 0, 1, 0, 0, 1, 2]);
    }

    #[test]
    fn test_pack_int8_negative() {
        let bytes = pack(&[-1.0, 127.0], Mode::Int8, Endianness::Little);
        assert_eq!(bytes, vec![0xFF, 0x7F]);
    }

    #[test]
    fn test_pack_width() {
        for mode in ALL_MODES {
            let bytes = pack(&[0.0, 1.0, 2.0], mode, Endianness::Little);
            assert_eq!(bytes.len(), 3 * mode.width(), "mode {}", mode);
        }
    }

    // === Unpacking ===

    #[test]
    fn test_unpack_exact_count_required() {
        let bytes = pack(&[1.0, 2.0, 3.0], Mode::Uint16, Endianness::Little);
        let err = unpack(&bytes, 4, Mode::Uint16, Endianness::Little).unwrap_err();
        assert!(matches!(
            err,
            MigrateError::TruncatedData {
                expected: 8,
                actual: 6
            }
        ));
        // Excess bytes are rejected too
        let err = unpack(&bytes, 2, Mode::Uint16, Endianness::Little).unwrap_err();
        assert!(matches!(err, MigrateError::TruncatedData { .. }));
    }

    #[test]
    fn test_unpack_overflowing_count_is_an_error() {
        // A count whose byte length exceeds usize must fail cleanly, not
        // overflow the length arithmetic.
        let err = unpack(&[], usize::MAX, Mode::Float64, Endianness::Little).unwrap_err();
        assert!(matches!(err, MigrateError::Parse(msg) if msg.contains("overflows")));
    }

    #[test]
    fn test_roundtrip_integers_exact() {
        let values = [0.0, 1.0, 255.0, 65535.0, 1048576.0];
        for mode in [Mode::Int32, Mode::Uint32, Mode::Int64, Mode::Uint64] {
            for endianness in [Endianness::Little, Endianness::Big] {
                let bytes = pack(&values, mode, endianness);
                let back = unpack(&bytes, values.len(), mode, endianness).unwrap();
                assert_eq!(back, values, "mode {} {}", mode, endianness);
            }
        }
    }

    #[test]
    fn test_roundtrip_float64_exact() {
        let values = [-1.5, 0.0, 3.25, 1e300];
        let bytes = pack(&values, Mode::Float64, Endianness::Big);
        let back = unpack(&bytes, values.len(), Mode::Float64, Endianness::Big).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_roundtrip_float32_within_representation() {
        let values = [1.0 / 3.0, 2.718281828, -0.1];
        let bytes = pack(&values, Mode::Float32, Endianness::Little);
        let back = unpack(&bytes, values.len(), Mode::Float32, Endianness::Little).unwrap();
        for (a, b) in values.iter().zip(&back) {
            assert!((a - b).abs() < 1e-6, "{} vs {}", a, b);
        }
    }

    // === Transport ===

    #[test]
    fn test_transport_roundtrip() {
        let bytes = vec![0u8, 1, 2, 253, 254, 255];
        let text = transport_encode(&bytes);
        assert_eq!(transport_decode(&text).unwrap(), bytes);
    }

    #[test]
    fn test_transport_decode_invalid() {
        let err = transport_decode("not valid base64!!!").unwrap_err();
        assert!(matches!(err, MigrateError::Transport(_)));
    }

    proptest! {
        #[test]
        fn prop_roundtrip_u16_values(values in prop::collection::vec(0u16..=u16::MAX, 0..64)) {
            let as_f64: Vec<f64> = values.iter().map(|&v| v as f64).collect();
            for endianness in [Endianness::Little, Endianness::Big] {
                let bytes = pack(&as_f64, Mode::Uint16, endianness);
                let back = unpack(&bytes, as_f64.len(), Mode::Uint16, endianness).unwrap();
                prop_assert_eq!(&back, &as_f64);
            }
        }

        #[test]
        fn prop_roundtrip_f64_transport(values in prop::collection::vec(-1e12f64..1e12, 0..64)) {
            let bytes = pack(&values, Mode::Float64, Endianness::Little);
            let decoded = transport_decode(&transport_encode(&bytes)).unwrap();
            let back = unpack(&decoded, values.len(), Mode::Float64, Endianness::Little).unwrap();
            prop_assert_eq!(&back, &values);
        }
    }
}
