use serde::{Deserialize, Serialize};

use crate::error::{PirError, Result};
use crate::utils::div_ceil;

/// Fixed protocol constants: gadget bases, decomposition sizes and the
/// hypercube growth targets.
///
/// Carried as an explicit struct (not process-wide constants) so several
/// parameter sets can coexist, e.g. a small set for tests next to the
/// production one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProtocolPolicy {
    /// Size of the first hypercube dimension. Deliberately wide: it keeps
    /// the oblivious expansion tree shallow where expansion is cheapest.
    pub first_dim: u64,
    /// Target arity for every dimension after the first.
    pub dim: u64,
    /// Gadget base for the encrypted-secret-key GSW ciphertext.
    pub gsw_base: u64,
    /// Base for plaintext decomposition. Carried for the negotiation
    /// exchange; unused by the folding logic here.
    pub plain_base: u64,
    /// Radix for the gadget decomposition performed inside the mux.
    pub secret_base: u64,
    /// Number of digit ciphertexts per gadget decomposition, and the row
    /// count of every GSW ciphertext.
    pub gsw_decomp_size: usize,
    /// Decomposition bit count used by relinearization in the backend.
    pub dbc: u32,
}

impl Default for ProtocolPolicy {
    fn default() -> Self {
        Self {
            first_dim: 256,
            dim: 4,
            gsw_base: 16,
            plain_base: 30,
            secret_base: 16,
            gsw_decomp_size: 5,
            dbc: 6,
        }
    }
}

/// Negotiated parameter set, derived once at setup and immutable afterwards.
///
/// Shared read-only by client and server; every wire length is a function of
/// these fields, so both sides must hold identical copies before any blob is
/// decoded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PirParams {
    /// Number of plaintexts the database packs into.
    pub n: u64,
    /// Number of hypercube dimensions.
    pub d: u32,
    /// Size of each dimension; `nvec.iter().product() >= n`.
    pub nvec: Vec<u64>,
    /// Reserved ciphertext-to-plaintext ratio; always 0, never read by the
    /// folding logic.
    pub expansion_ratio: u32,
    pub dbc: u32,
    pub gsw_base: u64,
    pub plain_base: u64,
    pub secret_base: u64,
    pub gsw_decomp_size: usize,
    /// Polynomial degree, i.e. coefficients per plaintext.
    pub poly_degree: usize,
    /// Plaintext coefficient bit width.
    pub logt: u32,
    pub ele_num: u64,
    pub ele_size: u64,
    /// Database records packed into a single plaintext.
    pub elements_per_plaintext: u64,
}

impl PirParams {
    /// Plaintext modulus, a power of two plus one.
    pub fn plaintext_modulus(&self) -> u64 {
        (1u64 << self.logt) + 1
    }
}

/// Coefficients needed to hold one record of `ele_size` bytes.
pub fn coefficients_per_element(logt: u32, ele_size: u64) -> u64 {
    div_ceil(8 * ele_size, logt as u64)
}

/// Number of database records that fit in a single plaintext.
///
/// Fails if one record does not fit even a single plaintext.
pub fn elements_per_ptxt(logt: u32, poly_degree: u64, ele_size: u64) -> Result<u64> {
    let coeff_per_ele = coefficients_per_element(logt, ele_size);
    let ele_per_ptxt = poly_degree / coeff_per_ele;
    if ele_per_ptxt == 0 {
        return Err(PirError::Config(format!(
            "element of {} bytes needs {} coefficients but a plaintext holds {}",
            ele_size, coeff_per_ele, poly_degree
        )));
    }
    Ok(ele_per_ptxt)
}

/// Number of plaintexts needed to represent the whole database.
pub fn plaintexts_per_db(logt: u32, poly_degree: u64, ele_num: u64, ele_size: u64) -> Result<u64> {
    let ele_per_ptxt = elements_per_ptxt(logt, poly_degree, ele_size)?;
    Ok(div_ceil(ele_num, ele_per_ptxt))
}

/// Builds the hypercube dimension vector for `plaintext_num` plaintexts.
///
/// The first dimension is fixed at `policy.first_dim`; `policy.dim` is
/// appended while the running quotient stays at or above it; if the product
/// still undershoots, the last dimension is incremented (recomputing the
/// full product each step) until it covers `plaintext_num`. The possibly
/// skewed last dimension is part of the wire format and must not be
/// rebalanced.
pub fn get_dimensions(plaintext_num: u64, policy: &ProtocolPolicy) -> Vec<u64> {
    assert!(plaintext_num > 0);
    assert!(policy.first_dim > 1 && policy.dim > 1);

    let mut dimensions = vec![policy.first_dim];

    let mut i = plaintext_num / policy.first_dim;
    while i >= policy.dim {
        dimensions.push(policy.dim);
        i /= policy.dim;
    }

    let mut product: u64 = dimensions.iter().product();
    while product < plaintext_num {
        *dimensions.last_mut().unwrap() += 1;
        product = dimensions.iter().product();
    }

    dimensions
}

/// Assembles the full parameter set for a database of `ele_num` records of
/// `ele_size` bytes each, packed into degree-`poly_degree` plaintexts with
/// `logt`-bit coefficients.
pub fn gen_params(
    ele_num: u64,
    ele_size: u64,
    poly_degree: usize,
    logt: u32,
    policy: &ProtocolPolicy,
) -> Result<PirParams> {
    assert!(logt >= 1 && logt <= 60);

    let elements_per_plaintext = elements_per_ptxt(logt, poly_degree as u64, ele_size)?;
    let plaintext_num = plaintexts_per_db(logt, poly_degree as u64, ele_num, ele_size)?;
    let nvec = get_dimensions(plaintext_num, policy);

    Ok(PirParams {
        n: plaintext_num,
        d: nvec.len() as u32,
        nvec,
        expansion_ratio: 0,
        dbc: policy.dbc,
        gsw_base: policy.gsw_base,
        plain_base: policy.plain_base,
        secret_base: policy.secret_base,
        gsw_decomp_size: policy.gsw_decomp_size,
        poly_degree,
        logt,
        ele_num,
        ele_size,
        elements_per_plaintext,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizing_helpers() {
        assert_eq!(coefficients_per_element(60, 30000), 4000);
        assert_eq!(elements_per_ptxt(60, 4096, 30000).unwrap(), 1);
        assert_eq!(plaintexts_per_db(60, 4096, 1 << 14, 30000).unwrap(), 1 << 14);

        assert_eq!(coefficients_per_element(12, 96), 64);
        assert_eq!(elements_per_ptxt(12, 4096, 96).unwrap(), 64);
    }

    #[test]
    fn oversized_element_is_a_config_error() {
        assert!(elements_per_ptxt(12, 64, 1000).is_err());
        assert!(gen_params(16, 1000, 64, 12, &ProtocolPolicy::default()).is_err());
    }

    #[test]
    fn dimensions_cover_the_plaintext_count() {
        let policy = ProtocolPolicy::default();
        for n in [1u64, 7, 255, 256, 257, 1000, 1 << 10, 16384, 100_000] {
            let nvec = get_dimensions(n, &policy);
            let product: u64 = nvec.iter().product();
            assert!(product >= n, "n = {}, nvec = {:?}", n, nvec);
            assert!(nvec[0] >= policy.first_dim);
        }
    }

    #[test]
    fn dimensions_match_the_reference_policy() {
        let policy = ProtocolPolicy::default();
        // 16384 / 256 = 64 -> append 4 three times, product exact
        assert_eq!(get_dimensions(1 << 14, &policy), vec![256, 4, 4, 4]);
        // quotient below arity, last (= first) dimension grows one by one
        assert_eq!(get_dimensions(512, &policy), vec![512]);
        // undershoot after appends, skew lands on the last dimension
        assert_eq!(get_dimensions(6000, &policy), vec![256, 4, 6]);
    }

    #[test]
    fn last_dimension_is_tight_once_the_cube_is_saturated() {
        let policy = ProtocolPolicy::default();
        for n in [257u64, 300, 512, 6000, 20000] {
            let mut nvec = get_dimensions(n, &policy);
            *nvec.last_mut().unwrap() -= 1;
            let product: u64 = nvec.iter().product();
            assert!(product < n, "n = {}, shrunk nvec = {:?}", n, nvec);
        }
    }

    #[test]
    fn gen_params_assembles_policy_constants() {
        let policy = ProtocolPolicy::default();
        let params = gen_params(1 << 14, 30000, 4096, 60, &policy).unwrap();
        assert_eq!(params.n, 1 << 14);
        assert_eq!(params.nvec, vec![256, 4, 4, 4]);
        assert_eq!(params.d, 4);
        assert_eq!(params.gsw_base, 16);
        assert_eq!(params.secret_base, 16);
        assert_eq!(params.gsw_decomp_size, 5);
        assert_eq!(params.expansion_ratio, 0);
        assert_eq!(params.plaintext_modulus(), (1 << 60) + 1);
    }
}
