//! Hash functions.

use aws_lc_rs::digest as lc_digest;

use crate::algorithm::HashAlgorithm;

/// Computes a hash of the input data.
#[must_use]
pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Vec<u8> {
    let alg = match algorithm {
        HashAlgorithm::Sha1 => &lc_digest::SHA1_FOR_LEGACY_USE_ONLY,
        HashAlgorithm::Sha256 => &lc_digest::SHA256,
        HashAlgorithm::Sha384 => &lc_digest::SHA384,
        HashAlgorithm::Sha512 => &lc_digest::SHA512,
    };

    lc_digest::digest(alg, data).as_ref().to_vec()
}

/// Computes a SHA-256 hash of the input data.
#[must_use]
pub fn sha256(data: &[u8]) -> Vec<u8> {
    digest(HashAlgorithm::Sha256, data)
}

/// Computes a SHA-384 hash of the input data.
#[must_use]
pub fn sha384(data: &[u8]) -> Vec<u8> {
    digest(HashAlgorithm::Sha384, data)
}

/// Computes a SHA-512 hash of the input data.
#[must_use]
pub fn sha512(data: &[u8]) -> Vec<u8> {
    digest(HashAlgorithm::Sha512, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digests_produce_correct_length() {
        assert_eq!(sha256(b"test").len(), 32);
        assert_eq!(sha384(b"test").len(), 48);
        assert_eq!(sha512(b"test").len(), 64);
    }

    #[test]
    fn sha256_known_vector() {
        let hex: String = sha256(b"abc").iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha1_for_legacy_signatures() {
        assert_eq!(digest(HashAlgorithm::Sha1, b"abc").len(), 20);
    }

    #[test]
    fn different_inputs_produce_different_hashes() {
        assert_ne!(sha256(b"hello"), sha256(b"world"));
    }
}
