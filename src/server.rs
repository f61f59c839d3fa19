//! Server side of the protocol: database preprocessing into the plaintext
//! hypercube and homomorphic reply generation.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::client::PirQuery;
use crate::codec::bytes_to_coeffs;
use crate::error::{PirError, Result};
use crate::gsw::{gsw_mux_inplace, GswCiphertext};
use crate::params::PirParams;
use crate::scheme::HeScheme;
use crate::waksman::{count_swapbits, eval_waksman_network};

/// The folded hypercube; collapses to a single ciphertext once every
/// dimension is consumed.
pub type PirReply<C> = Vec<C>;

pub struct PirServer<S: HeScheme> {
    params: Arc<PirParams>,
    scheme: S,
    /// Plaintext hypercube, row-major over `nvec`, padded with zero
    /// plaintexts up to the full cube. Read-only after preprocessing.
    db: Vec<Vec<u64>>,
    enc_sk: Option<GswCiphertext<S::Ciphertext>>,
}

impl<S> PirServer<S>
where
    S: HeScheme + Sync,
    S::Ciphertext: Send + Sync,
{
    pub fn new(params: &Arc<PirParams>, scheme: S) -> Self {
        Self {
            params: params.clone(),
            scheme,
            db: Vec::new(),
            enc_sk: None,
        }
    }

    /// Packs the flat record array into plaintexts: `elements_per_plaintext`
    /// consecutive records form one chunk whose bytes become one
    /// coefficient stream. The cube is padded with zero plaintexts so every
    /// hypercube cell is backed.
    pub fn set_database(&mut self, db: &[u8], ele_num: u64, ele_size: u64) -> Result<()> {
        if ele_num != self.params.ele_num || ele_size != self.params.ele_size {
            return Err(PirError::Config(format!(
                "database of {} x {} bytes against parameters for {} x {}",
                ele_num, ele_size, self.params.ele_num, self.params.ele_size
            )));
        }
        if db.len() as u64 != ele_num * ele_size {
            return Err(PirError::Config(format!(
                "flat database of {} bytes, expected {}",
                db.len(),
                ele_num * ele_size
            )));
        }

        let chunk_bytes = (self.params.elements_per_plaintext * ele_size) as usize;
        let degree = self.params.poly_degree;
        let logt = self.params.logt;

        let mut plaintexts: Vec<Vec<u64>> = db
            .par_chunks(chunk_bytes)
            .map(|chunk| {
                let mut coeffs = bytes_to_coeffs(logt, chunk);
                debug_assert!(coeffs.len() <= degree);
                coeffs.resize(degree, 0);
                coeffs
            })
            .collect();

        debug_assert_eq!(plaintexts.len() as u64, self.params.n);

        let cube: u64 = self.params.nvec.iter().product();
        plaintexts.resize(cube as usize, vec![0u64; degree]);

        info!(
            plaintexts = self.params.n,
            cube,
            dimensions = ?self.params.nvec,
            "database preprocessed"
        );
        self.db = plaintexts;
        Ok(())
    }

    /// Installs the client's encrypted-secret-key GSW ciphertext. Set once
    /// per session and immutable afterwards; the backend consumes it inside
    /// the gadget decomposition.
    pub fn set_enc_sk(&mut self, enc_sk: GswCiphertext<S::Ciphertext>) -> Result<()> {
        if enc_sk.len() != self.params.gsw_decomp_size {
            return Err(PirError::Protocol(format!(
                "enc_sk of {} rows, expected {}",
                enc_sk.len(),
                self.params.gsw_decomp_size
            )));
        }
        self.enc_sk = Some(enc_sk);
        Ok(())
    }

    /// Checks the query against the negotiated shape: one swap-bit sequence
    /// per dimension, `count_swapbits(n_k)` GSW ciphertexts each, every GSW
    /// ciphertext carrying `gsw_decomp_size` rows.
    fn validate_query(&self, query: &PirQuery<S::Ciphertext>) -> Result<()> {
        if query.dims.len() != self.params.nvec.len() {
            return Err(PirError::Protocol(format!(
                "query with {} dimensions, expected {}",
                query.dims.len(),
                self.params.nvec.len()
            )));
        }
        for (k, (dim, n)) in query.dims.iter().zip(&self.params.nvec).enumerate() {
            let expected = count_swapbits(*n as usize);
            if dim.len() != expected {
                return Err(PirError::Protocol(format!(
                    "dimension {} with {} swap bits, expected {}",
                    k,
                    dim.len(),
                    expected
                )));
            }
            if let Some(bad) = dim.iter().find(|g| g.len() != self.params.gsw_decomp_size) {
                return Err(PirError::Protocol(format!(
                    "dimension {} carries a GSW ciphertext of {} rows, expected {}",
                    k,
                    bad.len(),
                    self.params.gsw_decomp_size
                )));
            }
        }
        Ok(())
    }

    /// Expands one dimension's swap bits into a one-hot GSW selector of
    /// length `n`: a trivial selector seed (bit 1 at position 0) routed
    /// through the Waksman network, muxing whole GSW ciphertexts row-wise.
    fn expand_dimension(
        &self,
        swapbits: &[GswCiphertext<S::Ciphertext>],
        n: usize,
    ) -> Result<Vec<GswCiphertext<S::Ciphertext>>> {
        let base = self.params.secret_base;
        let l = self.params.gsw_decomp_size;

        let mut slots: Vec<GswCiphertext<S::Ciphertext>> = (0..n)
            .map(|i| {
                let bit = if i == 0 { 1 } else { 0 };
                GswCiphertext::new(self.scheme.trivial_gsw(bit, base, l))
            })
            .collect();

        eval_waksman_network(&mut slots, swapbits, &|g0, g1, bit| {
            gsw_mux_inplace(&self.scheme, g0, g1, bit, base, l)
        })?;
        Ok(slots)
    }

    /// Sums `external_product(selector[i], slice_i)` over one dimension for
    /// every remaining index, shrinking the working set by that dimension.
    fn fold_dimension<G>(
        &self,
        selector: &[GswCiphertext<S::Ciphertext>],
        stride: usize,
        slice: G,
    ) -> Vec<S::Ciphertext>
    where
        G: Fn(usize) -> S::Ciphertext + Sync,
    {
        let base = self.params.secret_base;
        let l = self.params.gsw_decomp_size;

        (0..stride)
            .into_par_iter()
            .map(|r| {
                let mut acc: Option<S::Ciphertext> = None;
                for (i, bit) in selector.iter().enumerate() {
                    let ct = slice(i * stride + r);
                    let digits = self.scheme.decompose(&ct, base, l);
                    let term = self.scheme.external_product(&bit.rows, &digits);
                    match acc.as_mut() {
                        Some(a) => self.scheme.add_assign(a, &term),
                        None => acc = Some(term),
                    }
                }
                acc.expect("dimension of size zero")
            })
            .collect()
    }

    /// Answers one query: for each dimension, most-significant first,
    /// expand the compact swap bits into a one-hot GSW selector, then fold
    /// the hypercube along that dimension. Dimension zero folds the stored
    /// plaintexts through their trivial embedding; later dimensions fold
    /// the surviving working ciphertexts.
    pub fn generate_reply(&self, query: &PirQuery<S::Ciphertext>) -> Result<PirReply<S::Ciphertext>> {
        if self.db.is_empty() {
            return Err(PirError::Config("no database loaded".into()));
        }
        if self.enc_sk.is_none() {
            return Err(PirError::Protocol("enc_sk not installed".into()));
        }
        self.validate_query(query)?;

        let nvec = &self.params.nvec;
        let mut stride: usize = nvec[1..].iter().map(|n| *n as usize).product();

        debug!(dimension = 0, size = nvec[0], "expanding and folding");
        let selector = self.expand_dimension(&query.dims[0], nvec[0] as usize)?;
        let mut work = self.fold_dimension(&selector, stride, |idx| {
            self.scheme.trivial(&self.db[idx])
        });

        for (k, n) in nvec.iter().enumerate().skip(1) {
            let n = *n as usize;
            stride /= n;
            debug!(dimension = k, size = n, "expanding and folding");

            let selector = self.expand_dimension(&query.dims[k], n)?;
            let folded = self.fold_dimension(&selector, stride, |idx| work[idx].clone());
            work = folded;
        }

        debug_assert_eq!(work.len(), 1);
        Ok(work)
    }
}
