//! Local account credentials.
//!
//! [`Keypair`] holds a devnet secret and its derived address; [`Keystore`]
//! persists it under the tally home directory. Nothing here is real
//! cryptography — see the module docs on [`keypair`].

pub mod keypair;
pub mod store;

pub use keypair::{validate_address, Keypair, ADDRESS_HEX_LEN, ADDRESS_PREFIX};
pub use store::Keystore;
