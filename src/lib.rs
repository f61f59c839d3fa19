//! Single-server private information retrieval over a plaintext hypercube.
//!
//! A client retrieves one record from a remote database without revealing
//! which one: the database is packed into plaintexts arranged as a
//! multi-dimensional hypercube, the query is a compact set of encrypted
//! swap bits per dimension, the server obliviously expands each set into a
//! one-hot GSW selector through a Waksman-style network and folds the cube
//! down to a single ciphertext with the external-product mux.
//!
//! The homomorphic primitives themselves stay behind the [`scheme::HeScheme`]
//! capability trait; [`mock::ClearScheme`] is a no-crypto reference backend
//! for tests and benches.

pub mod client;
pub mod codec;
pub mod error;
pub mod gsw;
pub mod indices;
pub mod mock;
pub mod modulus;
pub mod params;
pub mod scheme;
pub mod server;
pub mod utils;
pub mod waksman;
pub mod wire;

pub use client::{PirClient, PirQuery, QueryState};
pub use error::{PirError, Result};
pub use gsw::GswCiphertext;
pub use params::{gen_params, PirParams, ProtocolPolicy};
pub use scheme::HeScheme;
pub use server::{PirReply, PirServer};
