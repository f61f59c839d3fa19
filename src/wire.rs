//! Fixed-length wire blobs for ciphertexts, GSW ciphertexts, queries and
//! parameters.
//!
//! Nothing is self-describing: a blob is a bare concatenation of
//! fixed-length ciphertext encodings, so the receiver must already know the
//! per-ciphertext length, the dimension count and each dimension's
//! ciphertext count from the out-of-band parameter exchange. Parameters
//! themselves cross the wire through `bincode`.

use crate::client::PirQuery;
use crate::error::{PirError, Result};
use crate::gsw::GswCiphertext;
use crate::params::PirParams;
use crate::scheme::HeScheme;

/// Concatenates fixed-length ciphertext blobs.
pub fn serialize_ciphertexts<S: HeScheme>(scheme: &S, cts: &[S::Ciphertext]) -> Vec<u8> {
    let mut out = Vec::with_capacity(cts.len() * scheme.ciphertext_len());
    for ct in cts {
        scheme.save_ciphertext(ct, &mut out);
    }
    out
}

/// Splits `bytes` into exactly `count` ciphertexts of the scheme's fixed
/// blob length.
pub fn deserialize_ciphertexts<S: HeScheme>(
    scheme: &S,
    count: usize,
    bytes: &[u8],
) -> Result<Vec<S::Ciphertext>> {
    let len = scheme.ciphertext_len();
    if bytes.len() != count * len {
        return Err(PirError::Serialization(format!(
            "blob of {} bytes, expected {} ciphertexts of {} bytes",
            bytes.len(),
            count,
            len
        )));
    }
    bytes
        .chunks_exact(len)
        .map(|chunk| scheme.load_ciphertext(chunk))
        .collect()
}

/// A GSW ciphertext is the concatenation of its constituent rows in order.
pub fn serialize_gsw<S: HeScheme>(scheme: &S, gsw: &GswCiphertext<S::Ciphertext>) -> Vec<u8> {
    serialize_ciphertexts(scheme, &gsw.rows)
}

/// Rebuilds a GSW ciphertext from `rows` fixed-length ciphertext blobs.
pub fn deserialize_gsw<S: HeScheme>(
    scheme: &S,
    rows: usize,
    bytes: &[u8],
) -> Result<GswCiphertext<S::Ciphertext>> {
    Ok(GswCiphertext::new(deserialize_ciphertexts(
        scheme, rows, bytes,
    )?))
}

/// Frames the client's encrypted-secret-key material: a single GSW
/// ciphertext, sent once per session.
pub fn serialize_enc_sk<S: HeScheme>(
    scheme: &S,
    enc_sk: &GswCiphertext<S::Ciphertext>,
) -> Vec<u8> {
    serialize_gsw(scheme, enc_sk)
}

/// Rebuilds the encrypted secret key; `rows` is the negotiated
/// `gsw_decomp_size`.
pub fn deserialize_enc_sk<S: HeScheme>(
    scheme: &S,
    rows: usize,
    bytes: &[u8],
) -> Result<GswCiphertext<S::Ciphertext>> {
    deserialize_gsw(scheme, rows, bytes)
}

/// A query is the concatenation, dimension by dimension, of its GSW
/// ciphertexts in coordinate order.
pub fn serialize_query<S: HeScheme>(scheme: &S, query: &PirQuery<S::Ciphertext>) -> Vec<u8> {
    let mut out = Vec::new();
    for dim in &query.dims {
        for gsw in dim {
            for row in &gsw.rows {
                scheme.save_ciphertext(row, &mut out);
            }
        }
    }
    out
}

/// Rebuilds a query from a flat blob. `counts[k]` is dimension `k`'s GSW
/// ciphertext count and `rows` the row count of every GSW ciphertext; both
/// come from the negotiated parameters, never from the blob.
pub fn deserialize_query<S: HeScheme>(
    scheme: &S,
    counts: &[usize],
    rows: usize,
    bytes: &[u8],
) -> Result<PirQuery<S::Ciphertext>> {
    let ct_len = scheme.ciphertext_len();
    let total: usize = counts.iter().map(|c| c * rows * ct_len).sum();
    if bytes.len() != total {
        return Err(PirError::Serialization(format!(
            "query blob of {} bytes, expected {}",
            bytes.len(),
            total
        )));
    }

    let mut dims = Vec::with_capacity(counts.len());
    let mut cursor = 0usize;
    for count in counts {
        let mut dim = Vec::with_capacity(*count);
        for _ in 0..*count {
            let end = cursor + rows * ct_len;
            dim.push(deserialize_gsw(scheme, rows, &bytes[cursor..end])?);
            cursor = end;
        }
        dims.push(dim);
    }
    Ok(PirQuery { dims })
}

pub fn serialize_params(params: &PirParams) -> Result<Vec<u8>> {
    Ok(bincode::serialize(params)?)
}

pub fn deserialize_params(bytes: &[u8]) -> Result<PirParams> {
    Ok(bincode::deserialize(bytes)?)
}
