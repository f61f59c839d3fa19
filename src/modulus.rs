use itertools::izip;
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// Arithmetic modulo a u64 value `p < 2^62`, with Barrett reduction.
///
/// Backs the coefficient arithmetic of the clear-text reference scheme; a
/// lattice backend carries its own modular arithmetic and never sees this.
#[derive(Clone, PartialEq, Debug)]
pub struct Modulus {
    pub p: u64,
    barret_hi: u64,
    barret_lo: u64,
}

impl Modulus {
    pub fn new(p: u64) -> Self {
        assert!(p >= 2 && (p >> 62 == 0));

        // Barrett constant 2^128 / p, split into two u64 limbs
        let r = ((BigUint::from(1u128) << 128usize) / p).to_u128().unwrap();
        Self {
            p,
            barret_hi: (r >> 64) as u64,
            barret_lo: r as u64,
        }
    }

    /// Reduces `a` in [0, p^2) to [0, 2p) in constant time. Garbage out for
    /// larger inputs; callers with full-range values reduce with `%` first.
    fn lazy_reduce_u128(&self, a: u128) -> u64 {
        let alo = a as u64;
        let ahi = (a >> 64) as u64;

        let alo_lo = ((alo as u128) * (self.barret_lo as u128)) >> 64;
        let alo_hi = (alo as u128) * (self.barret_hi as u128);
        let ahi_lo = (ahi as u128) * (self.barret_lo as u128);
        let ahi_hi = (ahi as u128) * (self.barret_hi as u128);

        let num = ((alo_hi + ahi_lo + alo_lo) >> 64) + ahi_hi;
        (a - num * (self.p as u128)) as u64
    }

    /// `a < p ? a : a - p`, constant time; `a` must be in [0, 2p).
    const fn reduce_ct(x: u64, p: u64) -> u64 {
        debug_assert!(x < 2 * p);

        let (y, _) = x.overflowing_sub(p);
        let xy = (x ^ p) ^ (y ^ p);
        let (c, _) = ((x ^ xy) >> 63).overflowing_sub(1);
        (c & y) | ((!c) & x)
    }

    pub fn reduce_u128(&self, a: u128) -> u64 {
        Self::reduce_ct(self.lazy_reduce_u128(a), self.p)
    }

    pub fn add(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.p && b < self.p);
        Self::reduce_ct(a + b, self.p)
    }

    pub fn sub(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.p && b < self.p);
        Self::reduce_ct(a + (self.p - b), self.p)
    }

    pub fn mul(&self, a: u64, b: u64) -> u64 {
        debug_assert!(a < self.p && b < self.p);
        self.reduce_u128((a as u128) * (b as u128))
    }

    pub fn neg(&self, a: u64) -> u64 {
        debug_assert!(a < self.p);
        Self::reduce_ct(self.p - a, self.p)
    }

    pub fn add_vec(&self, a: &mut [u64], b: &[u64]) {
        izip!(a.iter_mut(), b).for_each(|(ab, b)| *ab = self.add(*ab, *b))
    }

    pub fn sub_vec(&self, a: &mut [u64], b: &[u64]) {
        izip!(a.iter_mut(), b).for_each(|(ab, b)| *ab = self.sub(*ab, *b))
    }

    pub fn modulus(&self) -> u64 {
        self.p
    }
}
