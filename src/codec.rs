//! Packing of raw record bytes into fixed-width plaintext coefficients.
//!
//! The byte sequence is treated as one big-endian bitstream and re-sliced
//! into `limit`-bit coefficients; the final coefficient is shifted up so the
//! stream stays aligned when it is read back. `coeffs_to_bytes` is the left
//! inverse of `bytes_to_coeffs` for an output buffer of the original length.

use crate::params::coefficients_per_element;

/// Re-slices `bytes` into `limit`-bit coefficients, each below the
/// plaintext modulus. Output length is
/// `coefficients_per_element(limit, bytes.len())`.
pub fn bytes_to_coeffs(limit: u32, bytes: &[u8]) -> Vec<u64> {
    assert!(limit >= 1 && limit <= 60);

    let size_out = coefficients_per_element(limit, bytes.len() as u64);
    let mut output = vec![0u64; size_out as usize];
    if output.is_empty() {
        return output;
    }

    let mut room = limit;
    let mut target = 0usize;

    for byte in bytes {
        let mut src = *byte as u64;
        let mut rest = 8u32;
        while rest != 0 {
            if room == 0 {
                target += 1;
                room = limit;
            }
            let shift = rest.min(room);
            output[target] = (output[target] << shift) | (src >> (8 - shift));
            src = (src << shift) & 0xff;
            room -= shift;
            rest -= shift;
        }
    }

    // left-align the partial trailing coefficient
    output[target] <<= room;
    output
}

/// Concatenates the low `limit` bits of each coefficient back into a byte
/// stream, writing until `output` is full or the coefficients run out.
pub fn coeffs_to_bytes(limit: u32, coeffs: &[u64], output: &mut [u8]) {
    assert!(limit >= 1 && limit <= 60);

    let mut room = 8u32;
    let mut j = 0usize;

    for coeff in coeffs {
        let mut src = *coeff;
        let mut rest = limit;
        while rest != 0 && j < output.len() {
            let shift = rest.min(room);
            // the write below truncates to a byte; bits pushed past the top
            // are stale stream content and fall away on the next shift
            output[j] = (((output[j] as u32) << shift) as u8) | ((src >> (limit - shift)) as u8);
            src <<= shift;
            room -= shift;
            rest -= shift;
            if room == 0 {
                j += 1;
                room = 8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn round_trip_all_widths() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for limit in 1u32..=60 {
            for len in [1usize, 2, 3, 7, 8, 64, 1000] {
                let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
                let coeffs = bytes_to_coeffs(limit, &bytes);
                assert_eq!(
                    coeffs.len() as u64,
                    coefficients_per_element(limit, len as u64)
                );
                assert!(coeffs.iter().all(|c| *c >> limit == 0));

                let mut back = vec![0u8; len];
                coeffs_to_bytes(limit, &coeffs, &mut back);
                assert_eq!(back, bytes, "limit = {}, len = {}", limit, len);
            }
        }
    }

    #[test]
    fn known_bit_layout() {
        // 0xAB 0xCD = 1010_1011_1100_1101, sliced into 6-bit coefficients:
        // 101010 111100 1101(00 pad)
        let coeffs = bytes_to_coeffs(6, &[0xAB, 0xCD]);
        assert_eq!(coeffs, vec![0b101010, 0b111100, 0b110100]);

        let mut back = vec![0u8; 2];
        coeffs_to_bytes(6, &coeffs, &mut back);
        assert_eq!(back, vec![0xAB, 0xCD]);
    }

    #[test]
    fn write_stops_at_full_buffer() {
        let bytes: Vec<u8> = (0..32).collect();
        let coeffs = bytes_to_coeffs(10, &bytes);

        let mut short = vec![0u8; 16];
        coeffs_to_bytes(10, &coeffs, &mut short);
        assert_eq!(short, bytes[..16]);
    }

    #[test]
    fn width_divides_stream_exactly() {
        // 8 * 15 bytes = 120 bits = 15 x 8-bit coefficients, no padding
        let bytes: Vec<u8> = (1..=15).collect();
        let coeffs = bytes_to_coeffs(8, &bytes);
        assert_eq!(coeffs, (1..=15u64).collect::<Vec<_>>());
    }
}
