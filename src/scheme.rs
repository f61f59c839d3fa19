//! Capability interface to the homomorphic-encryption collaborator.
//!
//! The protocol treats ciphertexts as opaque algebraic values: it needs
//! add/subtract, a gadget decomposition, the external product against GSW
//! rows, trivial (noiseless) encodings on the server, encryption and
//! decryption on the client, and fixed-length save/load for the wire. A
//! lattice backend implements this against its own ring arithmetic; the
//! [`crate::mock::ClearScheme`] backend implements it with bare coefficient
//! vectors so the protocol logic is testable without lattice code.
//!
//! A real deployment splits these capabilities by key possession: the
//! server side only ever calls the evaluator and trivial-encoding methods,
//! the client the secret-key ones. The trait keeps them together so one
//! object can play both roles in tests.

use crate::error::Result;

pub trait HeScheme {
    type Ciphertext: Clone;

    // evaluator capabilities (no key material)

    fn add(&self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Self::Ciphertext;

    fn sub(&self, a: &Self::Ciphertext, b: &Self::Ciphertext) -> Self::Ciphertext;

    fn add_assign(&self, a: &mut Self::Ciphertext, b: &Self::Ciphertext);

    /// Gadget-decomposes `ct` into `count` digit ciphertexts under a
    /// `base`-ary radix. The digits recompose to `ct` and pair positionally
    /// with the rows of a GSW ciphertext built under the same `(base,
    /// count)`.
    fn decompose(&self, ct: &Self::Ciphertext, base: u64, count: usize) -> Vec<Self::Ciphertext>;

    /// External product: combines GSW `rows` with the matching gadget
    /// `digits` of a regular ciphertext. For rows encrypting bit `b` the
    /// result carries `b` times the recomposed ciphertext.
    fn external_product(
        &self,
        rows: &[Self::Ciphertext],
        digits: &[Self::Ciphertext],
    ) -> Self::Ciphertext;

    /// Noiseless public embedding of plaintext coefficients; how the server
    /// lifts stored plaintexts into the ciphertext domain without a key.
    fn trivial(&self, coeffs: &[u64]) -> Self::Ciphertext;

    /// Noiseless GSW encoding of a constant bit, the seed of the oblivious
    /// expansion (position zero gets bit 1, every other position bit 0).
    fn trivial_gsw(&self, bit: u64, base: u64, count: usize) -> Vec<Self::Ciphertext>;

    // secret-key capabilities (client only)

    fn encrypt(&self, coeffs: &[u64]) -> Self::Ciphertext;

    fn decrypt(&self, ct: &Self::Ciphertext) -> Vec<u64>;

    /// GSW encryption of a single selection bit under gadget `(base, count)`.
    fn encrypt_gsw(&self, bit: u64, base: u64, count: usize) -> Vec<Self::Ciphertext>;

    /// GSW encryption of the scheme's own secret key, shipped to the server
    /// so the gadget decomposition step can run under encryption.
    fn encrypt_secret_key(&self, base: u64, count: usize) -> Vec<Self::Ciphertext>;

    // wire capabilities

    /// Serialized length of one ciphertext. Fixed per parameter set; wire
    /// blobs carry no inline lengths.
    fn ciphertext_len(&self) -> usize;

    fn save_ciphertext(&self, ct: &Self::Ciphertext, out: &mut Vec<u8>);

    /// Loads one ciphertext from exactly [`Self::ciphertext_len`] bytes.
    fn load_ciphertext(&self, bytes: &[u8]) -> Result<Self::Ciphertext>;
}
