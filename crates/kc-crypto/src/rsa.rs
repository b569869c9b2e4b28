//! RSA PKCS#1 v1.5 signatures.
//!
//! XML-DSig `rsa-sha1`, `rsa-sha256`, `rsa-sha384` and `rsa-sha512` all
//! map onto the PKCS#1 v1.5 padding schemes below.

use aws_lc_rs::{
    rand::SystemRandom,
    signature::{self, KeyPair, RsaKeyPair, UnparsedPublicKey},
};

use crate::algorithm::RsaAlgorithm;
use crate::error::CryptoError;

fn load_key_pair(key_der: &[u8]) -> Result<RsaKeyPair, CryptoError> {
    RsaKeyPair::from_pkcs8(key_der)
        .or_else(|_| RsaKeyPair::from_der(key_der))
        .map_err(|e| CryptoError::InvalidKey(format!("Invalid RSA key: {e}")))
}

/// Signs data using RSA PKCS#1 v1.5.
///
/// # Arguments
///
/// * `key_der` - RSA private key in DER format (PKCS#8 or PKCS#1)
/// * `data` - Data to sign
/// * `algorithm` - Signature algorithm
///
/// # Errors
///
/// Returns an error if the key cannot be parsed or signing fails.
pub fn rsa_sign(
    key_der: &[u8],
    data: &[u8],
    algorithm: RsaAlgorithm,
) -> Result<Vec<u8>, CryptoError> {
    let key_pair = load_key_pair(key_der)?;

    let rng = SystemRandom::new();
    let mut sig = vec![0u8; key_pair.public_modulus_len()];

    let padding = match algorithm {
        RsaAlgorithm::Rs1 => &signature::RSA_PKCS1_SHA1_FOR_LEGACY_USE_ONLY,
        RsaAlgorithm::Rs256 => &signature::RSA_PKCS1_SHA256,
        RsaAlgorithm::Rs384 => &signature::RSA_PKCS1_SHA384,
        RsaAlgorithm::Rs512 => &signature::RSA_PKCS1_SHA512,
    };

    key_pair
        .sign(padding, &rng, data, &mut sig)
        .map_err(|e| CryptoError::Signing(format!("RSA signing failed: {e}")))?;

    Ok(sig)
}

/// Returns the PKCS#1 `RSAPublicKey` DER of a private key.
///
/// # Errors
///
/// Returns an error if the key cannot be parsed.
pub fn rsa_public_key(key_der: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let key_pair = load_key_pair(key_der)?;
    Ok(key_pair.public_key().as_ref().to_vec())
}

/// Verifies an RSA PKCS#1 v1.5 signature.
///
/// `public_key_der` is a PKCS#1 `RSAPublicKey`, as returned by
/// [`rsa_public_key`]. Returns `false` for a signature that does not match.
#[must_use]
pub fn rsa_verify(
    public_key_der: &[u8],
    data: &[u8],
    sig: &[u8],
    algorithm: RsaAlgorithm,
) -> bool {
    let verification_alg: &dyn signature::VerificationAlgorithm = match algorithm {
        RsaAlgorithm::Rs1 => &signature::RSA_PKCS1_2048_8192_SHA1_FOR_LEGACY_USE_ONLY,
        RsaAlgorithm::Rs256 => &signature::RSA_PKCS1_2048_8192_SHA256,
        RsaAlgorithm::Rs384 => &signature::RSA_PKCS1_2048_8192_SHA384,
        RsaAlgorithm::Rs512 => &signature::RSA_PKCS1_2048_8192_SHA512,
    };

    UnparsedPublicKey::new(verification_alg, public_key_der)
        .verify(data, sig)
        .is_ok()
}
