//! XML Signature support for SP metadata.
//!
//! Metadata is signed with an enveloped XML-DSig signature placed as the
//! first child of `md:EntityDescriptor`, canonicalized with exclusive C14N.
//!
//! # Signing Algorithms
//!
//! - RSA-SHA1 (legacy)
//! - RSA-SHA256 (default)
//! - RSA-SHA384
//! - RSA-SHA512

mod signer;

pub use signer::*;

use kc_crypto::{HashAlgorithm, RsaAlgorithm};

use crate::error::SpidResult;
use crate::types::{canonicalization_algorithms, digest_algorithms, signature_algorithms};

/// Signature algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    /// RSA with SHA-1.
    RsaSha1,
    /// RSA with SHA-256.
    #[default]
    RsaSha256,
    /// RSA with SHA-384.
    RsaSha384,
    /// RSA with SHA-512.
    RsaSha512,
}

impl SignatureAlgorithm {
    /// Returns the URI for this signature algorithm.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::RsaSha1 => signature_algorithms::RSA_SHA1,
            Self::RsaSha256 => signature_algorithms::RSA_SHA256,
            Self::RsaSha384 => signature_algorithms::RSA_SHA384,
            Self::RsaSha512 => signature_algorithms::RSA_SHA512,
        }
    }

    /// Parses the configuration name (`RSA_SHA256`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "RSA_SHA1" => Some(Self::RsaSha1),
            "RSA_SHA256" => Some(Self::RsaSha256),
            "RSA_SHA384" => Some(Self::RsaSha384),
            "RSA_SHA512" => Some(Self::RsaSha512),
            _ => None,
        }
    }

    /// Returns the digest algorithm matching this algorithm's hash.
    #[must_use]
    pub const fn digest_algorithm(&self) -> DigestAlgorithm {
        match self {
            Self::RsaSha1 => DigestAlgorithm::Sha1,
            Self::RsaSha256 => DigestAlgorithm::Sha256,
            Self::RsaSha384 => DigestAlgorithm::Sha384,
            Self::RsaSha512 => DigestAlgorithm::Sha512,
        }
    }

    /// Returns the RSA algorithm used to compute `SignatureValue`.
    #[must_use]
    pub const fn rsa_algorithm(&self) -> RsaAlgorithm {
        match self {
            Self::RsaSha1 => RsaAlgorithm::Rs1,
            Self::RsaSha256 => RsaAlgorithm::Rs256,
            Self::RsaSha384 => RsaAlgorithm::Rs384,
            Self::RsaSha512 => RsaAlgorithm::Rs512,
        }
    }
}

/// Reference digest algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    /// SHA-1.
    Sha1,
    /// SHA-256.
    #[default]
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the URI for this digest algorithm.
    #[must_use]
    pub const fn uri(&self) -> &'static str {
        match self {
            Self::Sha1 => digest_algorithms::SHA1,
            Self::Sha256 => digest_algorithms::SHA256,
            Self::Sha384 => digest_algorithms::SHA384,
            Self::Sha512 => digest_algorithms::SHA512,
        }
    }

    /// Returns the hash function.
    #[must_use]
    pub const fn hash_algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Sha1 => HashAlgorithm::Sha1,
            Self::Sha256 => HashAlgorithm::Sha256,
            Self::Sha384 => HashAlgorithm::Sha384,
            Self::Sha512 => HashAlgorithm::Sha512,
        }
    }
}

/// How the signing key is named in `ds:KeyInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyNameTransformer {
    /// No `ds:KeyName`.
    None,
    /// The key ID as `ds:KeyName`.
    #[default]
    KeyId,
    /// The certificate subject DN as `ds:KeyName`.
    CertSubject,
}

impl KeyNameTransformer {
    /// Parses the configuration name (`NONE`, `KEY_ID`, `CERT_SUBJECT`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "NONE" => Some(Self::None),
            "KEY_ID" => Some(Self::KeyId),
            "CERT_SUBJECT" => Some(Self::CertSubject),
            _ => None,
        }
    }

    /// Returns the `ds:KeyName` for a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the subject of `certificate_der` is requested
    /// and the certificate cannot be parsed.
    pub fn key_name(
        &self,
        key_id: Option<&str>,
        certificate_der: Option<&[u8]>,
    ) -> SpidResult<Option<String>> {
        Ok(match self {
            Self::None => None,
            Self::KeyId => key_id.filter(|kid| !kid.is_empty()).map(String::from),
            Self::CertSubject => certificate_der
                .map(kc_crypto::certificate_subject)
                .transpose()?,
        })
    }
}

/// Configuration for signature creation.
#[derive(Debug, Clone, Default)]
pub struct SignatureConfig {
    /// The signature algorithm to use.
    pub algorithm: SignatureAlgorithm,
    /// The reference digest algorithm.
    pub digest: DigestAlgorithm,
    /// `ds:KeyName` policy.
    pub key_name_transformer: KeyNameTransformer,
}

impl SignatureConfig {
    /// Creates a configuration with the given algorithm and its matching
    /// digest.
    #[must_use]
    pub const fn with_algorithm(algorithm: SignatureAlgorithm) -> Self {
        Self {
            algorithm,
            digest: algorithm.digest_algorithm(),
            key_name_transformer: KeyNameTransformer::KeyId,
        }
    }

    /// Overrides the digest algorithm.
    #[must_use]
    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    /// Sets the key name transformer.
    #[must_use]
    pub fn with_key_name_transformer(mut self, transformer: KeyNameTransformer) -> Self {
        self.key_name_transformer = transformer;
        self
    }

    /// Canonicalization algorithm URI for `SignedInfo` and the reference.
    #[must_use]
    pub const fn canonicalization_uri(&self) -> &'static str {
        canonicalization_algorithms::EXCLUSIVE_C14N
    }
}
