//! Waksman-style oblivious expansion network.
//!
//! A compact sequence of encrypted swap bits routes a selector seed (bit 1
//! at position 0, bit 0 everywhere else) to a secret target position,
//! producing a one-hot encrypted selection vector without the evaluator
//! learning the target. The network is a recursion over index ranges:
//! mux consecutive pairs, send the even outputs to the upper half and the
//! odd ones (plus an unpaired leftover) to the lower half, recurse on each
//! half with disjoint bit sub-slices.

use rayon::prelude::*;

use crate::error::{PirError, Result};
use crate::gsw::GswCiphertext;

/// Number of control bits one expansion of `length` elements consumes.
/// Fixed by the recursive halving structure; the wire format depends on it.
pub fn count_swapbits(length: usize) -> usize {
    if length <= 1 {
        return 0;
    }
    let half = length / 2;
    half + count_swapbits(half) + count_swapbits(length - half)
}

/// Clear-side routing: the swap-bit assignment that steers the seed at
/// position 0 to `target`, in the exact order the evaluator consumes bits
/// (stage bits, then the upper half's, then the lower half's).
///
/// Only the first pair of each segment can hold the seed, so only that
/// pair's bit is ever live; all other bits encrypt 0 and merely shuffle
/// zeros. Output length is `count_swapbits(length)`.
pub fn route_swapbits(target: u64, length: usize) -> Vec<u64> {
    assert!((target as usize) < length);

    let mut bits = Vec::with_capacity(count_swapbits(length));
    route_rec(target as usize, length, &mut bits);
    bits
}

fn route_rec(target: usize, length: usize, bits: &mut Vec<u64>) {
    if length <= 1 {
        return;
    }
    let half = length / 2;
    let stage = bits.len();
    bits.resize(stage + half, 0);

    if target < half {
        // seed stays on the even slot of pair 0 and enters the upper half
        route_rec(target, half, bits);
        bits.resize(bits.len() + count_swapbits(length - half), 0);
    } else {
        // swap the seed onto the odd slot; it enters the lower half
        bits[stage] = 1;
        bits.resize(bits.len() + count_swapbits(half), 0);
        route_rec(target - half, length - half, bits);
    }
}

/// Evaluates the network in place over `input` under `swapbits`, applying
/// `mux` (a conditional swap under one encrypted bit) to each pair.
///
/// Generic over the element type so the same network reorders both regular
/// ciphertexts and whole GSW ciphertexts (row-wise mux). A bit count that
/// disagrees with `count_swapbits(input.len())` signals an incompatible
/// peer and is rejected.
pub fn eval_waksman_network<T, C, F>(
    input: &mut [T],
    swapbits: &[GswCiphertext<C>],
    mux: &F,
) -> Result<()>
where
    T: Clone + Send,
    C: Sync,
    F: Fn(&mut T, &mut T, &GswCiphertext<C>) + Sync,
{
    let expected = count_swapbits(input.len());
    if swapbits.len() != expected {
        return Err(PirError::Protocol(format!(
            "expansion of {} elements needs {} swap bits, got {}",
            input.len(),
            expected,
            swapbits.len()
        )));
    }
    let consumed = eval_rec(input, swapbits, mux);
    debug_assert_eq!(consumed, expected);
    Ok(())
}

fn eval_rec<T, C, F>(input: &mut [T], swapbits: &[GswCiphertext<C>], mux: &F) -> usize
where
    T: Clone + Send,
    C: Sync,
    F: Fn(&mut T, &mut T, &GswCiphertext<C>) + Sync,
{
    let length = input.len();
    if length <= 1 {
        return 0;
    }
    let half = length / 2;

    // the pair muxes touch disjoint ciphertext pairs
    input
        .par_chunks_exact_mut(2)
        .zip(swapbits[..half].par_iter())
        .for_each(|(pair, bit)| {
            let (c0, c1) = pair.split_at_mut(1);
            mux(&mut c0[0], &mut c1[0], bit);
        });

    // regroup: evens up, odds and the unpaired leftover down
    let mut regrouped = Vec::with_capacity(length);
    regrouped.extend((0..half).map(|i| input[2 * i].clone()));
    regrouped.extend((0..half).map(|i| input[2 * i + 1].clone()));
    if length % 2 == 1 {
        regrouped.push(input[length - 1].clone());
    }
    for (slot, v) in input.iter_mut().zip(regrouped) {
        *slot = v;
    }

    let (upper, lower) = input.split_at_mut(half);
    let mut used = half;
    let (up_used, down_used) = rayon::join(
        || eval_rec(upper, &swapbits[used..used + count_swapbits(half)], mux),
        || eval_rec(lower, &swapbits[used + count_swapbits(half)..], mux),
    );
    used += up_used + down_used;
    used
}
