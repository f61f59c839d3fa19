//! Clear-text stand-in for the homomorphic backend.
//!
//! A "ciphertext" is the coefficient vector itself, reduced modulo the
//! plaintext modulus; encryption and decryption are the identity and the
//! external product is exact gadget recomposition times the stored bit.
//! This keeps every protocol code path (decomposition, external product,
//! mux, expansion, fold, wire framing) executable and checkable without any
//! lattice arithmetic. It provides no privacy and exists for tests and
//! benches only.

use crate::error::{PirError, Result};
use crate::modulus::Modulus;
use crate::scheme::HeScheme;

/// Coefficient-vector backend over `Z_t`, `t = 2^logt + 1`.
#[derive(Clone, Debug)]
pub struct ClearScheme {
    degree: usize,
    modulus: Modulus,
}

/// A clear "ciphertext": `degree` coefficients below the modulus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClearCiphertext(pub Vec<u64>);

impl ClearScheme {
    pub fn new(degree: usize, logt: u32) -> Self {
        assert!(logt >= 1 && logt <= 60);
        Self {
            degree,
            modulus: Modulus::new((1u64 << logt) + 1),
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn modulus(&self) -> u64 {
        self.modulus.p
    }

    fn embed(&self, coeffs: &[u64]) -> ClearCiphertext {
        assert!(coeffs.len() <= self.degree);
        let mut v: Vec<u64> = coeffs.iter().map(|c| c % self.modulus.p).collect();
        v.resize(self.degree, 0);
        ClearCiphertext(v)
    }

    /// Rows of a gadget "encryption" of `bit`: row `j` is the constant
    /// vector `bit * base^j`, so that pairing rows with base-ary digits
    /// recomposes `bit` times the decomposed ciphertext.
    fn gadget_rows(&self, bit: u64, base: u64, count: usize) -> Vec<ClearCiphertext> {
        assert!(bit <= 1);
        let mut rows = Vec::with_capacity(count);
        let mut power = 1u64;
        for j in 0..count {
            let scalar = (bit * power) % self.modulus.p;
            rows.push(ClearCiphertext(vec![scalar; self.degree]));
            if j + 1 < count {
                power = power.checked_mul(base).expect("gadget base overflow");
            }
        }
        rows
    }
}

impl HeScheme for ClearScheme {
    type Ciphertext = ClearCiphertext;

    fn add(&self, a: &ClearCiphertext, b: &ClearCiphertext) -> ClearCiphertext {
        let mut out = a.clone();
        self.add_assign(&mut out, b);
        out
    }

    fn sub(&self, a: &ClearCiphertext, b: &ClearCiphertext) -> ClearCiphertext {
        assert_eq!(a.0.len(), b.0.len(), "ciphertext shape mismatch");
        let mut out = a.clone();
        self.modulus.sub_vec(&mut out.0, &b.0);
        out
    }

    fn add_assign(&self, a: &mut ClearCiphertext, b: &ClearCiphertext) {
        assert_eq!(a.0.len(), b.0.len(), "ciphertext shape mismatch");
        self.modulus.add_vec(&mut a.0, &b.0);
    }

    /// Base-ary digits, component-wise. The top digit absorbs whatever the
    /// lower `count - 1` digits cannot express, so recomposition is always
    /// exact regardless of `base^count` against the modulus.
    fn decompose(&self, ct: &ClearCiphertext, base: u64, count: usize) -> Vec<ClearCiphertext> {
        assert!(count >= 1 && base >= 2);

        let mut digits = vec![ClearCiphertext(vec![0u64; ct.0.len()]); count];
        for (i, c) in ct.0.iter().enumerate() {
            let mut rest = *c;
            for digit in digits.iter_mut().take(count - 1) {
                digit.0[i] = rest % base;
                rest /= base;
            }
            digits[count - 1].0[i] = rest;
        }
        digits
    }

    fn external_product(
        &self,
        rows: &[ClearCiphertext],
        digits: &[ClearCiphertext],
    ) -> ClearCiphertext {
        assert_eq!(rows.len(), digits.len(), "gadget shape mismatch");

        let mut acc = ClearCiphertext(vec![0u64; self.degree]);
        for (row, digit) in rows.iter().zip(digits) {
            for (a, (r, d)) in acc.0.iter_mut().zip(row.0.iter().zip(&digit.0)) {
                *a = self.modulus.add(*a, self.modulus.mul(*r, d % self.modulus.p));
            }
        }
        acc
    }

    fn trivial(&self, coeffs: &[u64]) -> ClearCiphertext {
        self.embed(coeffs)
    }

    fn trivial_gsw(&self, bit: u64, base: u64, count: usize) -> Vec<ClearCiphertext> {
        self.gadget_rows(bit, base, count)
    }

    fn encrypt(&self, coeffs: &[u64]) -> ClearCiphertext {
        self.embed(coeffs)
    }

    fn decrypt(&self, ct: &ClearCiphertext) -> Vec<u64> {
        ct.0.clone()
    }

    fn encrypt_gsw(&self, bit: u64, base: u64, count: usize) -> Vec<ClearCiphertext> {
        self.gadget_rows(bit, base, count)
    }

    /// There is no key here; the server-side decomposition needs no help
    /// from the client, so ship a gadget encoding of 1 as a placeholder of
    /// the right shape.
    fn encrypt_secret_key(&self, base: u64, count: usize) -> Vec<ClearCiphertext> {
        self.gadget_rows(1, base, count)
    }

    fn ciphertext_len(&self) -> usize {
        self.degree * 8
    }

    fn save_ciphertext(&self, ct: &ClearCiphertext, out: &mut Vec<u8>) {
        debug_assert_eq!(ct.0.len(), self.degree);
        for c in &ct.0 {
            out.extend_from_slice(&c.to_le_bytes());
        }
    }

    fn load_ciphertext(&self, bytes: &[u8]) -> Result<ClearCiphertext> {
        if bytes.len() != self.ciphertext_len() {
            return Err(PirError::Serialization(format!(
                "ciphertext blob of {} bytes, expected {}",
                bytes.len(),
                self.ciphertext_len()
            )));
        }
        let coeffs = bytes
            .chunks_exact(8)
            .map(|c| u64::from_le_bytes(c.try_into().unwrap()))
            .collect();
        Ok(ClearCiphertext(coeffs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn decompose_recomposes_exactly() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let scheme = ClearScheme::new(32, 60);
        for _ in 0..50 {
            let m: Vec<u64> = (0..32).map(|_| rng.gen_range(0..scheme.modulus())).collect();
            let ct = scheme.encrypt(&m);
            let digits = scheme.decompose(&ct, 16, 5);
            assert_eq!(digits.len(), 5);

            let one = scheme.trivial_gsw(1, 16, 5);
            let back = scheme.external_product(&one, &digits);
            assert_eq!(scheme.decrypt(&back), m);

            let zero = scheme.trivial_gsw(0, 16, 5);
            let nothing = scheme.external_product(&zero, &digits);
            assert!(scheme.decrypt(&nothing).iter().all(|c| *c == 0));
        }
    }

    #[test]
    fn add_sub_round_trip() {
        let scheme = ClearScheme::new(16, 20);
        let a = scheme.encrypt(&(0..16u64).collect::<Vec<_>>());
        let b = scheme.encrypt(&(100..116u64).collect::<Vec<_>>());
        let sum = scheme.add(&a, &b);
        let back = scheme.sub(&sum, &b);
        assert_eq!(scheme.decrypt(&back), scheme.decrypt(&a));
    }

    #[test]
    fn ciphertext_blob_round_trip() {
        let scheme = ClearScheme::new(16, 20);
        let ct = scheme.encrypt(&(0..16u64).map(|i| i * 31).collect::<Vec<_>>());
        let mut blob = Vec::new();
        scheme.save_ciphertext(&ct, &mut blob);
        assert_eq!(blob.len(), scheme.ciphertext_len());
        assert_eq!(scheme.load_ciphertext(&blob).unwrap(), ct);

        assert!(scheme.load_ciphertext(&blob[1..]).is_err());
    }
}
