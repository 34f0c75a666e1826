//! Attachment storage on the local filesystem with signed download links.

mod cap_std_store;
mod url_signer;

pub use cap_std_store::CapStdObjectStore;
pub use url_signer::{UrlSigner, UrlSignerError};
