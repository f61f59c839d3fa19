//! Mixed-radix index arithmetic for the plaintext hypercube.

/// Decomposes `desired_index` into one coordinate per hypercube dimension,
/// most-significant dimension first, by successive division against the
/// suffix products of `nvec`.
///
/// Exactly invertible: [`flat_index`] over the result reproduces
/// `desired_index` for every index below `nvec.iter().product()`.
pub fn compute_indices(desired_index: u64, nvec: &[u64]) -> Vec<u64> {
    let mut product: u64 = nvec.iter().product();
    debug_assert!(desired_index < product);

    let mut j = desired_index;
    let mut result = Vec::with_capacity(nvec.len());

    for n in nvec {
        product /= n;
        let ji = j / product;
        result.push(ji);
        j -= ji * product;
    }

    result
}

/// Re-encodes per-dimension coordinates into the flat plaintext index.
pub fn flat_index(indices: &[u64], nvec: &[u64]) -> u64 {
    assert_eq!(indices.len(), nvec.len());

    let mut flat = 0u64;
    for (i, n) in indices.iter().zip(nvec) {
        debug_assert!(i < n);
        flat = flat * n + i;
    }
    flat
}

/// Index of the plaintext holding the record `ele_index`.
pub fn plaintext_index(ele_index: u64, elements_per_plaintext: u64) -> u64 {
    ele_index / elements_per_plaintext
}

/// Position of the record `ele_index` inside its plaintext.
pub fn plaintext_offset(ele_index: u64, elements_per_plaintext: u64) -> u64 {
    ele_index % elements_per_plaintext
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_over_full_cubes() {
        for nvec in [
            vec![1u64],
            vec![5],
            vec![2, 2],
            vec![256, 4, 4, 4],
            vec![3, 5, 7],
            vec![8, 1, 9],
        ] {
            let product: u64 = nvec.iter().product();
            for i in 0..product {
                let coords = compute_indices(i, &nvec);
                assert_eq!(coords.len(), nvec.len());
                assert!(coords.iter().zip(&nvec).all(|(c, n)| c < n));
                assert_eq!(flat_index(&coords, &nvec), i);
            }
        }
    }

    #[test]
    fn most_significant_dimension_first() {
        // flat 4000 over [256, 4, 4, 4]: 4000 = 62*64 + 2*16 + 0*4 + 0
        assert_eq!(compute_indices(4000, &[256, 4, 4, 4]), vec![62, 2, 0, 0]);
    }

    #[test]
    fn plaintext_slotting() {
        assert_eq!(plaintext_index(0, 8), 0);
        assert_eq!(plaintext_offset(0, 8), 0);
        assert_eq!(plaintext_index(19, 8), 2);
        assert_eq!(plaintext_offset(19, 8), 3);
    }
}
