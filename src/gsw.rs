//! The oblivious selector: GSW ciphertexts and the external-product mux.

use crate::scheme::HeScheme;

/// A GSW encryption of one selection bit: `gsw_decomp_size` opaque
/// ciphertext rows under a gadget decomposition.
///
/// Only ever used as the control input of the external product; never
/// combined with plain ciphertext add/subtract. Each GSW ciphertext is owned
/// by exactly one query-dimension slot.
#[derive(Clone, Debug, PartialEq)]
pub struct GswCiphertext<C> {
    pub rows: Vec<C>,
}

impl<C> GswCiphertext<C> {
    pub fn new(rows: Vec<C>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Homomorphic conditional swap of `(c0, c1)` under an encrypted bit.
///
/// Computes `diff = c1 - c0` and `sum = c1 + c0`, gadget-decomposes `diff`
/// into `count` digits under `base`, runs the external product against the
/// choice bit (`selected = b * diff`), then sets `c0' = c0 + selected` and
/// `c1' = sum - c0'`. Post-condition: `(c0', c1')` is `(c0, c1)` for bit 0
/// and `(c1, c0)` for bit 1, and the executor cannot tell which.
///
/// Callers that need a plain select read only `c0` afterwards. A row count
/// differing from `count` is a caller bug, not a runtime condition.
pub fn mux_inplace<S: HeScheme>(
    scheme: &S,
    c0: &mut S::Ciphertext,
    c1: &mut S::Ciphertext,
    choice_bit: &GswCiphertext<S::Ciphertext>,
    base: u64,
    count: usize,
) {
    assert_eq!(choice_bit.len(), count, "GSW row count / gadget mismatch");

    let diff = scheme.sub(c1, c0);
    let sum = scheme.add(c1, c0);

    let digits = scheme.decompose(&diff, base, count);
    let selected = scheme.external_product(&choice_bit.rows, &digits);

    scheme.add_assign(c0, &selected);
    *c1 = scheme.sub(&sum, c0);
}

/// Conditional swap of two whole GSW ciphertexts, row by row under the same
/// control bit. GSW ciphertexts are row-wise linear, so swapping every row
/// pair swaps the encrypted bits.
pub fn gsw_mux_inplace<S: HeScheme>(
    scheme: &S,
    g0: &mut GswCiphertext<S::Ciphertext>,
    g1: &mut GswCiphertext<S::Ciphertext>,
    choice_bit: &GswCiphertext<S::Ciphertext>,
    base: u64,
    count: usize,
) {
    assert_eq!(g0.len(), g1.len(), "GSW operands of unequal shape");

    for (r0, r1) in g0.rows.iter_mut().zip(g1.rows.iter_mut()) {
        mux_inplace(scheme, r0, r1, choice_bit, base, count);
    }
}
