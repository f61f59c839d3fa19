//! Client side of the protocol: compact query construction and reply
//! decoding.

use std::sync::Arc;

use tracing::debug;

use crate::codec::coeffs_to_bytes;
use crate::error::{PirError, Result};
use crate::gsw::GswCiphertext;
use crate::indices::{compute_indices, plaintext_index, plaintext_offset};
use crate::params::PirParams;
use crate::scheme::HeScheme;
use crate::server::PirReply;
use crate::waksman::route_swapbits;

/// One retrieval query: per hypercube dimension, the encrypted swap bits
/// that obliviously route the selector seed to the queried coordinate.
#[derive(Clone, Debug)]
pub struct PirQuery<C> {
    pub dims: Vec<Vec<GswCiphertext<C>>>,
}

/// What the client must remember between sending a query and decoding the
/// reply. Single use: a retry must build a fresh query.
#[derive(Clone, Debug)]
pub struct QueryState {
    pub ele_index: u64,
    pub fv_index: u64,
    pub fv_offset: u64,
}

pub struct PirClient<S: HeScheme> {
    params: Arc<PirParams>,
    scheme: S,
}

impl<S: HeScheme> PirClient<S> {
    pub fn new(params: &Arc<PirParams>, scheme: S) -> Self {
        Self {
            params: params.clone(),
            scheme,
        }
    }

    /// Index of the plaintext holding record `ele_index`.
    pub fn get_fv_index(&self, ele_index: u64) -> u64 {
        plaintext_index(ele_index, self.params.elements_per_plaintext)
    }

    /// Position of record `ele_index` inside its plaintext.
    pub fn get_fv_offset(&self, ele_index: u64) -> u64 {
        plaintext_offset(ele_index, self.params.elements_per_plaintext)
    }

    /// Builds the encrypted query for plaintext `desired_index`: the
    /// hypercube coordinates of the target, each turned into swap-bit GSW
    /// ciphertexts for the expansion network. Query size is the fixed
    /// swap-bit count per dimension, independent of the target.
    pub fn generate_query(&self, desired_index: u64) -> PirQuery<S::Ciphertext> {
        let product: u64 = self.params.nvec.iter().product();
        assert!(desired_index < product, "target outside the hypercube");

        let indices = compute_indices(desired_index, &self.params.nvec);
        debug!(desired_index, ?indices, "generating query");

        let dims = indices
            .iter()
            .zip(&self.params.nvec)
            .map(|(coord, n)| {
                route_swapbits(*coord, *n as usize)
                    .iter()
                    .map(|bit| {
                        GswCiphertext::new(self.scheme.encrypt_gsw(
                            *bit,
                            self.params.secret_base,
                            self.params.gsw_decomp_size,
                        ))
                    })
                    .collect()
            })
            .collect();

        PirQuery { dims }
    }

    /// Per-query entry point: query plus the state needed to decode the
    /// reply for record `ele_index`.
    pub fn build_query(&self, ele_index: u64) -> (PirQuery<S::Ciphertext>, QueryState) {
        assert!(ele_index < self.params.ele_num, "record index out of range");

        let fv_index = self.get_fv_index(ele_index);
        let fv_offset = self.get_fv_offset(ele_index);
        let query = self.generate_query(fv_index);

        (
            query,
            QueryState {
                ele_index,
                fv_index,
                fv_offset,
            },
        )
    }

    /// GSW encryption of the secret key material the server needs for the
    /// gadget decomposition step; installed once per server session.
    pub fn enc_sk(&self) -> GswCiphertext<S::Ciphertext> {
        GswCiphertext::new(
            self.scheme
                .encrypt_secret_key(self.params.gsw_base, self.params.gsw_decomp_size),
        )
    }

    /// Decrypts the folded reply and unpacks the queried record's bytes.
    pub fn decode_reply(&self, reply: &PirReply<S::Ciphertext>, state: &QueryState) -> Result<Vec<u8>> {
        if state.ele_index >= self.params.ele_num {
            return Err(PirError::Protocol(format!(
                "query state for record {} of a {}-record database",
                state.ele_index, self.params.ele_num
            )));
        }
        let ct = reply
            .first()
            .ok_or_else(|| PirError::Protocol("empty reply".into()))?;

        let coeffs = self.scheme.decrypt(ct);

        let chunk_len = (self.params.elements_per_plaintext * self.params.ele_size) as usize;
        let mut bytes = vec![0u8; chunk_len];
        coeffs_to_bytes(self.params.logt, &coeffs, &mut bytes);

        let start = (state.fv_offset * self.params.ele_size) as usize;
        Ok(bytes[start..start + self.params.ele_size as usize].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ClearScheme;
    use crate::params::{gen_params, ProtocolPolicy};
    use crate::waksman::count_swapbits;

    fn small_params() -> Arc<PirParams> {
        let policy = ProtocolPolicy {
            first_dim: 8,
            dim: 4,
            ..ProtocolPolicy::default()
        };
        // 512 records of 96 bytes, one record per plaintext slot group
        Arc::new(gen_params(512, 96, 64, 12, &policy).unwrap())
    }

    #[test]
    fn query_shape_follows_the_dimensions() {
        let params = small_params();
        let scheme = ClearScheme::new(params.poly_degree, params.logt);
        let client = PirClient::new(&params, scheme);

        let (query, state) = client.build_query(37);
        assert_eq!(query.dims.len(), params.nvec.len());
        for (dim, n) in query.dims.iter().zip(&params.nvec) {
            assert_eq!(dim.len(), count_swapbits(*n as usize));
            assert!(dim.iter().all(|g| g.len() == params.gsw_decomp_size));
        }
        assert_eq!(state.ele_index, 37);
        assert_eq!(
            state.fv_index,
            37 / params.elements_per_plaintext
        );
    }

    #[test]
    fn decode_rejects_state_outside_the_database() {
        let params = small_params();
        let scheme = ClearScheme::new(params.poly_degree, params.logt);
        let client = PirClient::new(&params, scheme.clone());

        let reply = vec![scheme.trivial(&vec![0u64; params.poly_degree])];
        let (_, mut state) = client.build_query(0);
        state.ele_index = params.ele_num;
        assert!(matches!(
            client.decode_reply(&reply, &state),
            Err(PirError::Protocol(_))
        ));
    }

    #[test]
    fn enc_sk_has_gadget_shape() {
        let params = small_params();
        let scheme = ClearScheme::new(params.poly_degree, params.logt);
        let client = PirClient::new(&params, scheme);
        assert_eq!(client.enc_sk().len(), params.gsw_decomp_size);
    }
}
