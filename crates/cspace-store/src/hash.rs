//! Payload checksums.
//!
//! FNV-1a over the raw payload bytes. Not cryptographic; it only has to
//! catch truncation and bit rot.

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

/// 64-bit FNV-1a hash of `bytes`.
pub fn checksum(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |hash, &b| (hash ^ b as u64).wrapping_mul(FNV_PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_offset_basis() {
        assert_eq!(checksum(&[]), FNV_OFFSET);
    }

    #[test]
    fn matches_published_vector() {
        // FNV-1a 64 of "a".
        assert_eq!(checksum(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn byte_order_matters() {
        assert_ne!(checksum(&[1, 2]), checksum(&[2, 1]));
    }
}
