//! Algorithm definitions.
//!
//! SPID federations require SHA-256 or stronger; SHA-1 is kept only
//! because Keycloak still offers `RSA_SHA1` as a metadata signing option.

/// Message digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    /// SHA-1, legacy use only.
    Sha1,

    /// SHA-256.
    #[default]
    Sha256,

    /// SHA-384.
    Sha384,

    /// SHA-512.
    Sha512,
}

/// RSA PKCS#1 v1.5 signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RsaAlgorithm {
    /// RSA PKCS#1 v1.5 with SHA-1, legacy use only.
    Rs1,

    /// RSA PKCS#1 v1.5 with SHA-256.
    #[default]
    Rs256,

    /// RSA PKCS#1 v1.5 with SHA-384.
    Rs384,

    /// RSA PKCS#1 v1.5 with SHA-512.
    Rs512,
}

impl RsaAlgorithm {
    /// Returns the hash algorithm used by this signature algorithm.
    #[must_use]
    pub const fn hash_algorithm(self) -> HashAlgorithm {
        match self {
            Self::Rs1 => HashAlgorithm::Sha1,
            Self::Rs256 => HashAlgorithm::Sha256,
            Self::Rs384 => HashAlgorithm::Sha384,
            Self::Rs512 => HashAlgorithm::Sha512,
        }
    }
}
