//! CRC32 checksums over log frames
//!
//! Every frame in the record log carries a CRC32 trailer covering all
//! bytes before it, and every read verifies it. A mismatch aborts the
//! read with a corruption error.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided bytes.
///
/// Deterministic: the same input always produces the same output.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies that the computed checksum matches the expected value.
pub fn verify_checksum(data: &[u8], expected: u32) -> bool {
    compute_checksum(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_deterministic() {
        let data = b"record log frame bytes";
        assert_eq!(compute_checksum(data), compute_checksum(data));
    }

    #[test]
    fn test_checksum_detects_bit_flip() {
        let mut data = vec![0x10, 0x20, 0x30, 0x40];
        let original = compute_checksum(&data);
        data[1] ^= 0x01;
        assert_ne!(original, compute_checksum(&data));
    }

    #[test]
    fn test_verify_checksum() {
        let data = b"frame";
        let checksum = compute_checksum(data);
        assert!(verify_checksum(data, checksum));
        assert!(!verify_checksum(data, checksum.wrapping_add(1)));
    }
}
