//! # kc-crypto
//!
//! Cryptographic primitives used to sign SAML service-provider metadata,
//! built on aws-lc-rs.
//!
//! The crate is intentionally small: message digests for XML-DSig
//! references, RSA PKCS#1 v1.5 signatures over canonicalized `SignedInfo`,
//! PEM decoding for keys and certificates handed over by the key manager
//! and certificate subject names for `ds:KeyName`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod algorithm;
pub mod error;
pub mod hash;
pub mod pem;
pub mod rsa;
pub mod x509;

pub use algorithm::{HashAlgorithm, RsaAlgorithm};
pub use error::CryptoError;
pub use hash::{digest, sha256, sha384, sha512};
pub use pem::{decode_pem, pem_to_der};
pub use rsa::{rsa_public_key, rsa_sign, rsa_verify};
pub use x509::certificate_subject;
